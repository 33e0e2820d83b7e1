pub mod csv;
pub mod json;
pub mod report;
pub mod table;
pub mod text;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::config::CinetimeConfig;
use crate::session::Batch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Dialogue text only
    Text,
    /// Full entries, statistics and malformed lines
    Json,
    /// Same document as json
    Yaml,
    /// One row per entry with frame timings
    Csv,
    /// Markdown report with statistics and flagged entries
    Report,
}

impl ExportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ExportFormat::Text),
            "json" => Some(ExportFormat::Json),
            "yaml" | "yml" => Some(ExportFormat::Yaml),
            "csv" => Some(ExportFormat::Csv),
            "report" | "markdown" | "md" => Some(ExportFormat::Report),
            _ => None,
        }
    }

    pub fn detect_from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_str)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
            ExportFormat::Csv => "csv",
            ExportFormat::Report => "md",
        }
    }
}

/// Render `batch` in `format` to `out`.
pub fn write_export(
    format: ExportFormat,
    batch: &Batch,
    config: &CinetimeConfig,
    out: &mut dyn Write,
) -> Result<()> {
    match format {
        ExportFormat::Text => text::write_text(batch.record_sets(), out)?,
        ExportFormat::Json => json::write_json(&json::ExportDocument::new(batch), out)?,
        ExportFormat::Yaml => json::write_yaml(&json::ExportDocument::new(batch), out)?,
        ExportFormat::Csv => csv::write_csv(batch.record_sets(), out)?,
        ExportFormat::Report => report::write_report(
            batch,
            &config.patterns,
            config.export.sample_size,
            out,
        )?,
    }
    out.flush()?;
    Ok(())
}
