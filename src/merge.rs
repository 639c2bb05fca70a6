use std::{
    collections::{btree_map::Entry, BTreeMap},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};

/// One verse entry as it appears in the per-book files.
///
/// Only `v` and `r` are interpreted; every other key is carried through
/// the merge untouched.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VerseRecord {
    /// Display reference, e.g. "Genesis 1:1"; the first token is the book
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<String>,

    /// Cross-references: related verse identifier -> detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<JsonMap<String, Value>>,

    #[serde(flatten)]
    pub extra: JsonMap<String, Value>,
}

/// Combined mapping: verse identifier -> record (keys kept sorted so
/// re-runs over identical inputs serialize identically).
pub type VerseMap = BTreeMap<String, VerseRecord>;

/// Where to read the per-book files and where the merged artifact goes.
#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
}

/// What folding a single file into the accumulator produced.
#[derive(Debug, Default)]
pub struct FileSummary {
    /// Verse identifiers inserted for the first time
    pub inserted: usize,
    /// Identifiers that were already present (resolved by the duplicate rule)
    pub duplicates: Vec<String>,
}

/// `*.json` files directly inside `input_dir`, sorted by filename.
///
/// The sort order decides first-wins outcomes on duplicate identifiers,
/// so it must be reproducible. The merge artifact itself is excluded so
/// a re-run does not fold the previous output back in.
pub fn list_input_files(cfg: &MergeConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(&cfg.input_dir)
        .with_context(|| format!("reading directory {}", cfg.input_dir.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        if path == cfg.output_path {
            info!("skipping previous merge output {}", path.display());
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Parse one per-book file and fold it into `verses`.
///
/// Duplicate rule: the first file to introduce an identifier wins for
/// all non-`r` fields; when both sides carry `r`, the new entries are
/// unioned in with the later file winning per key. A later duplicate
/// lacking `r` (or hitting an entry lacking `r`) changes nothing.
pub fn merge_file(verses: &mut VerseMap, path: &Path) -> Result<FileSummary> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let parsed: VerseMap = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {} as a verse mapping", path.display()))?;

    let mut summary = FileSummary::default();
    for (verse_id, record) in parsed {
        match verses.entry(verse_id) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                summary.inserted += 1;
            }
            Entry::Occupied(mut slot) => {
                summary.duplicates.push(slot.key().clone());
                if let (Some(existing), Some(new)) = (slot.get_mut().r.as_mut(), record.r) {
                    existing.extend(new);
                }
            }
        }
    }
    Ok(summary)
}

/// Total number of cross-reference entries across the whole mapping.
pub fn total_cross_refs(verses: &VerseMap) -> usize {
    verses
        .values()
        .map(|rec| rec.r.as_ref().map_or(0, JsonMap::len))
        .sum()
}

/// Serialize the combined mapping to `path` as compact JSON.
/// Returns the number of bytes written.
pub fn write_merged(verses: &VerseMap, path: &Path) -> Result<u64> {
    let json = serde_json::to_string(verses).context("serializing merged mapping")?;
    fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?;
    Ok(json.len() as u64)
}
