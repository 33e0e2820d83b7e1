use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::error::MalformedRecordError;
use crate::models::{BatchSummary, Entry, RecordSet, Statistics};
use crate::session::Batch;
use crate::timing::frames_to_seconds;

/// Pretty-print any serializable value as JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

pub fn write_json<T: Serialize>(value: &T, out: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_yaml<T: Serialize>(value: &T, out: &mut dyn Write) -> Result<()> {
    serde_yaml::to_writer(&mut *out, value)?;
    Ok(())
}

/// Machine-readable export of a whole batch.
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub metadata: ExportMetadata,
    pub summary: BatchSummary,
    pub files: Vec<FileExport<'a>>,
    pub failures: Vec<FailureExport>,
}

#[derive(Debug, Serialize)]
pub struct ExportMetadata {
    pub generated: DateTime<Utc>,
    pub tool: &'static str,
    pub version: &'static str,
    pub total_files: usize,
}

#[derive(Debug, Serialize)]
pub struct FileExport<'a> {
    pub source: &'a str,
    pub entries: Vec<EntryExport<'a>>,
    pub statistics: &'a Statistics,
    pub malformed: &'a [MalformedRecordError],
}

/// One entry with its derived fields spelled out.
#[derive(Debug, Serialize)]
pub struct EntryExport<'a> {
    pub sequence_index: usize,
    pub line_number: usize,
    pub start_frame: i64,
    pub end_frame: i64,
    pub duration_frames: i64,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub duration_seconds: f64,
    pub chars: usize,
    pub text: &'a str,
    pub is_pause: bool,
    pub is_anomalous: bool,
}

#[derive(Debug, Serialize)]
pub struct FailureExport {
    pub source: String,
    pub error: String,
}

impl<'a> ExportDocument<'a> {
    pub fn new(batch: &'a Batch) -> Self {
        ExportDocument {
            metadata: ExportMetadata {
                generated: Utc::now(),
                tool: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
                total_files: batch.record_sets().len(),
            },
            summary: batch.summary(),
            files: batch.record_sets().iter().map(FileExport::new).collect(),
            failures: batch
                .failures()
                .iter()
                .map(|f| FailureExport {
                    source: f.path().display().to_string(),
                    error: f.to_string(),
                })
                .collect(),
        }
    }
}

impl<'a> FileExport<'a> {
    pub fn new(set: &'a RecordSet) -> Self {
        FileExport {
            source: set.source(),
            entries: set.entries().iter().map(EntryExport::from).collect(),
            statistics: set.statistics(),
            malformed: set.errors(),
        }
    }
}

impl<'a> From<&'a Entry> for EntryExport<'a> {
    fn from(e: &'a Entry) -> Self {
        EntryExport {
            sequence_index: e.sequence_index,
            line_number: e.line_number,
            start_frame: e.start_frame,
            end_frame: e.end_frame,
            duration_frames: e.duration_frames(),
            start_seconds: frames_to_seconds(e.start_frame as f64),
            end_seconds: frames_to_seconds(e.end_frame as f64),
            duration_seconds: e.duration_seconds(),
            chars: e.char_count(),
            text: &e.text,
            is_pause: e.is_pause(),
            is_anomalous: e.is_anomalous(),
        }
    }
}
