use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analysis::patterns::CharThresholds;
use crate::output::ExportFormat;

/// Which files count as record files during discovery.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub extensions: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            extensions: vec!["csv".to_string()],
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub format: ExportFormat,
    /// Flagged entries listed per pattern bucket in reports.
    pub sample_size: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            format: ExportFormat::Json,
            sample_size: 5,
        }
    }
}

/// Top-level cinetime config file structure.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct CinetimeConfig {
    pub discovery: DiscoveryConfig,
    pub patterns: CharThresholds,
    pub export: ExportConfig,
}

impl CinetimeConfig {
    /// Load config from `path`, or ~/.cinetime/config.toml when `None`.
    /// Returns default if the file doesn't exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_path()?,
        };
        if !path.exists() {
            return Ok(CinetimeConfig::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Path to the config file: ~/.cinetime/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".cinetime").join("config.toml"))
}

/// Default config template content.
pub fn default_config_template() -> &'static str {
    r#"# ~/.cinetime/config.toml

[discovery]
# File extensions treated as cutscene record files (case-insensitive).
extensions = ["csv"]

[patterns]
# Dialogue with at most this many characters is "short".
short_max_chars = 5
# Dialogue with more than this many characters is "long".
long_min_chars = 20

[export]
# text, json, yaml, csv or report
format = "json"
# Flagged entries listed per pattern in reports.
sample_size = 5
"#
}

/// Create the default config file if it doesn't already exist.
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, default_config_template())
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(true)
}
