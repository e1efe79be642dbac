// src/graph.rs

use crate::model::{DjStats, Role, UserTagMap, Username};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A node in the tag graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNode {
    pub name: Username,
    pub role: Role,
}

/// Directed commenter→tagged-user graph with a by-name index. Consumers
/// read it to size, color and filter nodes; nothing here is mutated after
/// `build_graph` returns.
#[derive(Debug)]
pub struct TagGraph {
    pub graph: DiGraph<TagNode, ()>,
    index: HashMap<Username, NodeIndex>,
}

impl TagGraph {
    fn new() -> Self {
        TagGraph {
            graph: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    fn ensure_node(&mut self, name: &Username, role: Role) -> NodeIndex {
        match self.index.get(name) {
            Some(&idx) => {
                // Dj wins over Commenter and never reverts.
                if role == Role::Dj {
                    self.graph[idx].role = Role::Dj;
                }
                idx
            }
            None => {
                let idx = self.graph.add_node(TagNode {
                    name: name.clone(),
                    role,
                });
                self.index.insert(name.clone(), idx);
                idx
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn role(&self, name: &str) -> Option<Role> {
        self.index.get(name).map(|&idx| self.graph[idx].role)
    }

    /// Everyone with an edge pointing at `name`, i.e. every commenter who
    /// tagged them.
    pub fn in_neighbors(&self, name: &str) -> BTreeSet<Username> {
        match self.index.get(name) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, Direction::Incoming)
                .map(|n| self.graph[n].name.clone())
                .collect(),
            None => BTreeSet::new(),
        }
    }
}

/// Build the directed graph from the parsed relation. Commenters become
/// `Commenter` nodes, their tags become `Dj` nodes, and tagging someone who
/// already commented upgrades them in place. Repeated tags collapse into a
/// single edge per ordered pair.
pub fn build_graph(tags_by_commenter: &UserTagMap) -> TagGraph {
    let mut tag_graph = TagGraph::new();

    for (commenter, tags) in tags_by_commenter {
        let from = tag_graph.ensure_node(commenter, Role::Commenter);
        for dj in tags {
            let to = tag_graph.ensure_node(dj, Role::Dj);
            tag_graph.graph.update_edge(from, to, ());
        }
    }

    tag_graph
}

/// Per-dj aggregates for sizing and detail display: duplicate-inclusive
/// mention totals and the set of distinct commenters who cast them.
pub fn compute_dj_stats(tags_by_commenter: &UserTagMap) -> BTreeMap<Username, DjStats> {
    let mut stats: BTreeMap<Username, DjStats> = BTreeMap::new();

    for (commenter, tags) in tags_by_commenter {
        for dj in tags {
            let entry = stats.entry(dj.clone()).or_default();
            entry.mentions += 1;
            entry.unique_taggers.insert(commenter.clone());
        }
    }

    stats
}
