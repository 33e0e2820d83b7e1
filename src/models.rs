use serde::{Deserialize, Serialize};

use crate::analysis::patterns::CharThresholds;
use crate::error::MalformedRecordError;
use crate::timing::frames_to_seconds;

/// Frame value that marks a pause when used for both start and end.
pub const PAUSE_SENTINEL: i64 = -1;

/// One parsed `start,end,text` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// 1-based, contiguous position among the file's valid entries.
    pub sequence_index: usize,
    /// 1-based physical line in the source file.
    pub line_number: usize,
    pub start_frame: i64,
    pub end_frame: i64,
    pub text: String,
}

impl Entry {
    /// Pause iff both frames are the sentinel; text content plays no part.
    pub fn is_pause(&self) -> bool {
        self.start_frame == PAUSE_SENTINEL && self.end_frame == PAUSE_SENTINEL
    }

    /// `end - start` for dialogue. Pauses, and dialogue carrying a negative
    /// frame, report 0.
    pub fn duration_frames(&self) -> i64 {
        if self.start_frame < 0 || self.end_frame < 0 {
            0
        } else {
            self.end_frame - self.start_frame
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        frames_to_seconds(self.duration_frames() as f64)
    }

    /// Character count (not bytes).
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Dialogue whose timing cannot be right: a lone sentinel frame or an
    /// end before the start.
    pub fn is_anomalous(&self) -> bool {
        !self.is_pause()
            && (self.start_frame < 0 || self.end_frame < 0 || self.end_frame < self.start_frame)
    }
}

/// Summary of one RecordSet. Computed once by [`Statistics::compute`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_lines: usize,
    pub dialogue_lines: usize,
    pub pause_lines: usize,
    pub anomalous_lines: usize,
    pub total_chars: usize,
    pub avg_chars: f64,
    pub max_chars: usize,
    pub min_chars: usize,
    pub total_duration_frames: i64,
    pub avg_duration_frames: f64,
    pub total_duration_seconds: f64,
    pub avg_duration_seconds: f64,
    /// 0 when there is no dialogue.
    pub max_duration_frames: i64,
    /// 0 when there is no dialogue.
    pub min_duration_frames: i64,
    pub patterns: PatternCounts,
}

/// Counts per pattern bucket, over dialogue entries only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCounts {
    pub fast: usize,
    pub normal: usize,
    pub slow: usize,
    /// Subset of `slow`.
    pub very_slow: usize,
    pub short: usize,
    pub long: usize,
}

/// Entries parsed from one source file, with their statistics and the lines
/// that were rejected. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    source: String,
    entries: Vec<Entry>,
    errors: Vec<MalformedRecordError>,
    statistics: Statistics,
}

impl RecordSet {
    pub fn new(
        source: impl Into<String>,
        entries: Vec<Entry>,
        errors: Vec<MalformedRecordError>,
        thresholds: &CharThresholds,
    ) -> Self {
        let statistics = Statistics::compute(&entries, thresholds);
        RecordSet {
            source: source.into(),
            entries,
            errors,
            statistics,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn errors(&self) -> &[MalformedRecordError] {
        &self.errors
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dialogue(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.is_pause())
    }

    /// Look up an entry by its 1-based sequence index.
    pub fn entry(&self, sequence_index: usize) -> Option<&Entry> {
        sequence_index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .filter(|e| e.sequence_index == sequence_index)
    }
}

/// Totals across every file of a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub files: usize,
    pub failed_files: usize,
    pub empty_files: usize,
    pub total_lines: usize,
    pub dialogue_lines: usize,
    pub pause_lines: usize,
    pub malformed_lines: usize,
    pub total_chars: usize,
    pub total_duration_frames: i64,
    pub total_duration_seconds: f64,
}
