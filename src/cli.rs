// src/cli.rs

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the comments export text file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Number of entries to show in each leaderboard
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Handle to print an individual tag summary for (repeatable)
    #[arg(long = "artist")]
    pub artists: Vec<String>,

    /// Block parsing strategy
    #[arg(long, value_enum, default_value_t = Strategy::MarkerSplit)]
    pub strategy: Strategy,
}

#[derive(clap::ValueEnum, Clone, Debug, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Split blocks at every "<username>'s profile picture" marker line
    MarkerSplit,
    /// Assume exactly four non-blank lines per comment and read the fourth
    FixedOffset,
}
