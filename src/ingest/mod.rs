pub mod records;

use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::analysis::patterns::CharThresholds;
use crate::error::FileReadError;
use crate::models::RecordSet;

pub use records::{parse_record_set, parse_records, ParsedRecords};

/// Where record files come from: enumeration of candidates and reading of
/// their decoded text.
pub trait RecordSource: Sync {
    /// Candidate record files under `root`, recursive, deduplicated.
    fn enumerate(&self, root: &Path) -> Result<Vec<PathBuf>>;

    /// Whole-file UTF-8 content.
    fn read_text(&self, path: &Path) -> Result<String, FileReadError>;
}

/// Local filesystem source matching files by extension.
#[derive(Debug, Clone)]
pub struct FsSource {
    extensions: Vec<String>,
}

impl FsSource {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        FsSource {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }

    fn walk(&self, dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
            .filter_map(|e| e.ok())
            .collect();
        entries.sort_by_key(|e| e.path());

        for entry in entries {
            let path = entry.path();
            if path.is_dir() {
                self.walk(&path, found)?;
            } else if path.is_file() && self.matches_extension(&path) {
                debug!("Found record file: {}", path.display());
                found.push(path);
            }
        }
        Ok(())
    }
}

impl Default for FsSource {
    fn default() -> Self {
        FsSource::new(["csv"])
    }
}

impl RecordSource for FsSource {
    fn enumerate(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        if root.is_dir() {
            self.walk(root, &mut found)?;
        } else if root.is_file() {
            // An explicitly named file is taken whatever its extension.
            found.push(root.to_path_buf());
        } else {
            let pattern = root.to_string_lossy();
            let matches: Vec<_> = glob::glob(&pattern)
                .with_context(|| format!("Invalid path or glob pattern: {pattern}"))?
                .filter_map(|r| r.ok())
                .collect();

            if matches.is_empty() {
                bail!("No files found matching: {pattern}");
            }

            for path in matches {
                if path.is_dir() {
                    self.walk(&path, &mut found)?;
                } else if path.is_file() {
                    found.push(path);
                }
            }
        }
        Ok(dedup_paths(found))
    }

    fn read_text(&self, path: &Path) -> Result<String, FileReadError> {
        let bytes = std::fs::read(path).map_err(|source| FileReadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|source| FileReadError::Decode {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Enumerate every root and merge the results into one sorted, duplicate-free
/// list.
pub fn discover(source: &dyn RecordSource, roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut all = Vec::new();
    for root in roots {
        let found = source.enumerate(root)?;
        info!("Discovered {} record file(s) under {}", found.len(), root.display());
        all.extend(found);
    }
    Ok(dedup_paths(all))
}

/// Read and parse one file. A read or decode failure yields no RecordSet.
pub fn load_record_set(
    source: &dyn RecordSource,
    path: &Path,
    thresholds: &CharThresholds,
) -> Result<RecordSet, FileReadError> {
    let content = source.read_text(path)?;
    let set = parse_record_set(&path.display().to_string(), &content, thresholds);
    info!(
        "Parsed {}: {} entries, {} malformed",
        path.display(),
        set.entries().len(),
        set.errors().len()
    );
    Ok(set)
}

fn dedup_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = BTreeSet::new();
    let mut unique: Vec<PathBuf> = paths
        .into_iter()
        .filter(|p| seen.insert(std::fs::canonicalize(p).unwrap_or_else(|_| p.clone())))
        .collect();
    unique.sort();
    unique
}
