use anyhow::Result;
use clap::Parser;

mod cli;
mod cmd_search;
mod cmd_tokens;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    env_logger::init();

    let cli = cli::Cli::parse();
    match cli.cmd {
        cli::Cmd::Search {
            files,
            query,
            bxt,
        } => cmd_search::exec(files, query, bxt),

        cli::Cmd::Tokens { file } => cmd_tokens::exec(file),
    }
}
