use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use shades::fti::{lower, Tokenizer};

pub fn exec(file: PathBuf) -> Result<()> {
    let text = fs::read_to_string(&file).with_context(|| format!("read {}", file.display()))?;

    for token in Tokenizer::new(&text, lower, &[]) {
        println!("{:8} {}", token.offset, token.data);
    }
    Ok(())
}
