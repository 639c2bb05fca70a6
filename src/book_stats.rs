/*
cargo run --bin book_stats

cargo run --bin book_stats -- data/books/merged_bible_references.json
*/

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;

use bible_xref::analyze;
use bible_xref::merge::VerseMap;

/// Report book-level verse counts for an already-merged artifact.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Merged cross-reference JSON file
    #[arg(default_value = "merged_bible_references.json")]
    merged: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match load_merged(&cli.merged) {
        Ok(verses) => {
            println!("Loaded {} verses from {}", verses.len(), cli.merged.display());
            analyze::report(&verses);
        }
        Err(e) => eprintln!("Cannot load {}: {e:#}", cli.merged.display()),
    }
    Ok(())
}

fn load_merged(path: &Path) -> Result<VerseMap> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing {} as a verse mapping", path.display()))
}
