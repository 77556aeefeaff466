use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI для SSE-поиска Shades
#[derive(Parser, Debug)]
#[command(name = "shades", version, about = "Shades SSE search CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Index files and run an encrypted keyword search
    Search {
        /// Files to index
        files: Vec<PathBuf>,
        /// Query terms (whitespace-separated)
        #[arg(short = 'q', long)]
        query: String,
        /// Use BXT (cross-tags) instead of SKS; required for multi-term
        /// queries
        #[arg(long, default_value_t = false)]
        bxt: bool,
    },
    /// Dump tokens of a file (tokenizer debugging)
    Tokens {
        file: PathBuf,
    },
}
