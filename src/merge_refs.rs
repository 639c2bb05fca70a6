/*
cargo run --bin merge_refs --release

cargo run --bin merge_refs -- \
    --input-dir data/books \
    --output data/books/merged_bible_references.json
*/

use std::{fs, path::PathBuf};

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn, LevelFilter};
use simplelog::{Config, WriteLogger};

use bible_xref::analyze;
use bible_xref::merge::{self, MergeConfig, VerseMap};

const OUTPUT_NAME: &str = "merged_bible_references.json";

/// Merge per-book cross-reference JSON files into one artifact and
/// report book statistics.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory that contains the per-book *.json files
    #[arg(long = "input-dir", value_name = "PATH", default_value = ".")]
    input_dir: PathBuf,

    /// Merged output file (default: <input-dir>/merged_bible_references.json)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = MergeConfig {
        output_path: cli
            .output
            .unwrap_or_else(|| cli.input_dir.join(OUTPUT_NAME)),
        input_dir: cli.input_dir,
    };

    init_logging();

    println!("{}", "=".repeat(60));
    println!("Bible Cross-Reference Merger");
    println!("{}", "=".repeat(60));
    println!("Looking for JSON files in: {}", cfg.input_dir.display());
    println!("Output file will be: {}", cfg.output_path.display());
    println!("{}", "=".repeat(60));
    println!();

    let verses = run_merge(&cfg);
    analyze::report(&verses);

    println!("\n{}", "=".repeat(60));
    println!("Complete!");
    println!("{}", "=".repeat(60));
    Ok(())
}

/// Fold every input file into one mapping, persist it, and return it.
/// Per-file failures and the write failure are reported, never fatal.
fn run_merge(cfg: &MergeConfig) -> VerseMap {
    info!(
        "merge started - input_dir: {:?}, output: {:?}",
        cfg.input_dir, cfg.output_path
    );

    let files = match merge::list_input_files(cfg) {
        Ok(files) => files,
        Err(e) => {
            error!("cannot enumerate input files: {e:#}");
            eprintln!("Cannot enumerate input files: {e:#}");
            Vec::new()
        }
    };

    println!("Found {} JSON files to merge", files.len());
    if files.is_empty() {
        println!("\nNo JSON files found in: {}", cfg.input_dir.display());
        println!("Please check that:");
        println!("  1. The directory path is correct");
        println!("  2. There are .json files in the directory");
        return VerseMap::new();
    }

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap(),
    );

    let mut verses = VerseMap::new();
    let mut duplicate_count = 0usize;
    let mut failed_files = 0usize;

    for path in &files {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("<non-utf8 name>");
        bar.set_message(name.to_owned());

        match merge::merge_file(&mut verses, path) {
            Ok(summary) => {
                info!(
                    "{name}: {} new verses, {} duplicates",
                    summary.inserted,
                    summary.duplicates.len()
                );
                for id in &summary.duplicates {
                    warn!("duplicate verse ID {id} in {name}");
                    eprintln!("  Warning: duplicate verse ID {id} found in {name}");
                }
                duplicate_count += summary.duplicates.len();
            }
            Err(e) => {
                failed_files += 1;
                error!("{name}: {e:#}");
                eprintln!("  Error processing {name}: {e:#}");
            }
        }
        bar.inc(1);
    }
    bar.finish_with_message("done");

    println!("\nMerge complete!");
    println!("Total verses: {}", verses.len());
    println!("Total cross-references: {}", merge::total_cross_refs(&verses));
    if duplicate_count > 0 {
        println!("Duplicate verse IDs resolved: {duplicate_count}");
    }
    if failed_files > 0 {
        println!("Files skipped due to errors: {failed_files}");
    }

    println!("\nSaving to: {}", cfg.output_path.display());
    match merge::write_merged(&verses, &cfg.output_path) {
        Ok(bytes) => {
            info!("wrote {bytes} bytes to {:?}", cfg.output_path);
            println!("Done! File size: {:.1} KB", bytes as f64 / 1024.0);
        }
        Err(e) => {
            // merge work is still usable by the analysis step
            error!("saving failed: {e:#}");
            eprintln!("Error saving file: {e:#}");
        }
    }

    verses
}

// Log to logs/merge_<timestamp>.log; the run continues without a log
// file if one cannot be created.
fn init_logging() {
    if let Err(e) = fs::create_dir_all("logs") {
        eprintln!("Cannot create log directory: {e}");
        return;
    }
    let log_path = format!(
        "logs/merge_{}.log",
        Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    match fs::File::create(&log_path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(LevelFilter::Info, Config::default(), file) {
                eprintln!("Failed to initialise logger: {e}");
            }
        }
        Err(e) => eprintln!("Cannot create log file {log_path}: {e}"),
    }
}
