use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use shades::fti::{lower, Tokenizer};
use shades::{Bxt, KeywordIndex, Sks, Sse};

/// Стоп-слова индексации по умолчанию.
const STOPWORDS: &[&str] = &[
    "the", "of", "to", "and", "a", "in", "is", "it", "you", "that", "he", "was", "for", "on",
    "are", "with", "as", "I", "his", "they", "be", "at", "one", "have", "this",
];

pub fn exec(files: Vec<PathBuf>, query: String, bxt: bool) -> Result<()> {
    if files.is_empty() {
        return Err(anyhow!("no input files"));
    }
    let terms: Vec<&str> = query.split_whitespace().collect();

    // Обратный индекс: слово -> номера файлов (без дублей внутри файла).
    let mut db = KeywordIndex::new();
    for (ind, f) in files.iter().enumerate() {
        let text = fs::read_to_string(f).with_context(|| format!("read {}", f.display()))?;

        let mut seen = HashSet::new();
        for token in Tokenizer::new(&text, lower, STOPWORDS) {
            if seen.insert(token.data.clone()) {
                db.entry(token.data).or_insert_with(Vec::new).push(ind as u64);
            }
        }
    }

    let matches = if bxt {
        Bxt::setup(&db)?.search(&terms)?
    } else {
        Sks::setup(&db)?.search(&terms)?
    };

    if matches.is_empty() {
        println!("no matches");
        return Ok(());
    }
    for ind in matches {
        println!("{}", files[ind as usize].display());
    }
    Ok(())
}
