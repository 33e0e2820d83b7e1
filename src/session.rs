use anyhow::Result;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::CinetimeConfig;
use crate::error::FileReadError;
use crate::ingest::{self, RecordSource};
use crate::models::{BatchSummary, RecordSet};
use crate::timing::frames_to_seconds;

/// Explicit processing context: configuration plus the source files come
/// from. Holds no results; each run returns a fresh [`Batch`].
pub struct Session {
    pub config: CinetimeConfig,
    source: Box<dyn RecordSource>,
}

/// Outcome of one run. Record sets and failures are sorted by source.
#[derive(Debug)]
pub struct Batch {
    record_sets: Vec<RecordSet>,
    failures: Vec<FileReadError>,
}

impl Session {
    pub fn new(config: CinetimeConfig, source: Box<dyn RecordSource>) -> Self {
        Session { config, source }
    }

    /// Candidate record files under all `roots`.
    pub fn discover(&self, roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
        ingest::discover(self.source.as_ref(), roots)
    }

    /// Discover, then parse and aggregate every file.
    pub fn run(&self, roots: &[PathBuf]) -> Result<Batch> {
        let files = self.discover(roots)?;
        Ok(self.process(&files))
    }

    /// Parse and aggregate each file independently and in parallel. One
    /// file failing never affects the others.
    pub fn process(&self, files: &[PathBuf]) -> Batch {
        let thresholds = &self.config.patterns;
        let source = self.source.as_ref();

        let results: Vec<Result<RecordSet, FileReadError>> = files
            .par_iter()
            .map(|path| ingest::load_record_set(source, path, thresholds))
            .collect();

        let mut record_sets = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(set) => {
                    if set.is_empty() {
                        warn!("No valid entries in {}", set.source());
                    }
                    record_sets.push(set);
                }
                Err(e) => {
                    warn!("{e}");
                    failures.push(e);
                }
            }
        }

        let batch = Batch::new(record_sets, failures);
        info!(
            "Processed {} file(s), {} failed",
            batch.record_sets.len(),
            batch.failures.len()
        );
        batch
    }
}

impl Batch {
    pub fn new(mut record_sets: Vec<RecordSet>, mut failures: Vec<FileReadError>) -> Self {
        record_sets.sort_by(|a, b| a.source().cmp(b.source()));
        failures.sort_by(|a, b| a.path().cmp(b.path()));
        Batch {
            record_sets,
            failures,
        }
    }

    pub fn record_sets(&self) -> &[RecordSet] {
        &self.record_sets
    }

    pub fn failures(&self) -> &[FileReadError] {
        &self.failures
    }

    /// Look up a record set by its source identifier.
    pub fn get(&self, source: &str) -> Option<&RecordSet> {
        self.record_sets
            .binary_search_by(|s| s.source().cmp(source))
            .ok()
            .map(|i| &self.record_sets[i])
    }

    pub fn get_path(&self, path: &Path) -> Option<&RecordSet> {
        self.get(&path.display().to_string())
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            files: self.record_sets.len(),
            failed_files: self.failures.len(),
            ..BatchSummary::default()
        };
        for set in &self.record_sets {
            let stats = set.statistics();
            if set.is_empty() {
                summary.empty_files += 1;
            }
            summary.total_lines += stats.total_lines;
            summary.dialogue_lines += stats.dialogue_lines;
            summary.pause_lines += stats.pause_lines;
            summary.malformed_lines += set.errors().len();
            summary.total_chars += stats.total_chars;
            summary.total_duration_frames = summary
                .total_duration_frames
                .saturating_add(stats.total_duration_frames);
        }
        summary.total_duration_seconds = frames_to_seconds(summary.total_duration_frames as f64);
        summary
    }
}
