//! Configuration types for pubcal-dl
//!
//! The series configuration is a YAML file in the established
//! `direct-links.yaml` format: a `statistieken` list plus a few global paths.
//! The Dutch key names are the wire format of existing config files and are
//! mapped onto English field names here.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Configured statistical series to track
    #[serde(rename = "statistieken", default)]
    pub series: Vec<SeriesConfig>,

    /// Directory holding `calendar_<year>.json` snapshots (default: "data/calendar")
    #[serde(default = "default_calendar_dir")]
    pub calendar_dir: PathBuf,

    /// Fallback download directory for series without their own (default: "data/downloads")
    #[serde(default = "default_download_base_dir")]
    pub download_base_dir: PathBuf,

    /// URL of the publication calendar page
    #[serde(default = "default_calendar_url")]
    pub calendar_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            series: Vec::new(),
            calendar_dir: default_calendar_dir(),
            download_base_dir: default_download_base_dir(),
            calendar_url: default_calendar_url(),
        }
    }
}

impl Config {
    /// Load a configuration from a YAML file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field constraints serde cannot express
    ///
    /// Every series needs a non-empty `naam` (it is the basis of artifact
    /// filenames), and names must be unique after sanitization: two series
    /// mapping to the same filename prefix would scan each other's artifacts.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for series in &self.series {
            if series.name.trim().is_empty() {
                return Err(Error::config("series name must not be empty", "naam"));
            }
            let prefix = crate::scanner::sanitize_series_name(&series.name);
            if !seen.insert(prefix) {
                return Err(Error::config(
                    format!("duplicate series name: {}", series.name),
                    "naam",
                ));
            }
        }
        Ok(())
    }
}

/// Configuration of one tracked statistical series
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Series name, also the basis of downloaded artifact filenames
    #[serde(rename = "naam")]
    pub name: String,

    /// Name to look the series up under in the publication calendar
    ///
    /// Absence is a per-series configuration error: the series is skipped
    /// with a reported reason, the run continues.
    #[serde(rename = "kalender_naam", default)]
    pub calendar_lookup_name: Option<String>,

    /// Static download URL (takes effect when no pattern is set)
    #[serde(default)]
    pub url: Option<String>,

    /// Download URL pattern with `{periode}` and `{datum}` placeholders
    ///
    /// Takes precedence over `url` when both are present.
    #[serde(default)]
    pub url_pattern: Option<String>,

    /// Download directory for this series (default: the global base directory)
    #[serde(rename = "download_directory", default)]
    pub download_dir: Option<PathBuf>,
}

impl SeriesConfig {
    /// The effective download directory, falling back to the global base
    pub fn effective_download_dir(&self, base: &Path) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(|| base.to_path_buf())
    }
}

fn default_calendar_dir() -> PathBuf {
    PathBuf::from("data/calendar")
}

fn default_download_base_dir() -> PathBuf {
    PathBuf::from("data/downloads")
}

fn default_calendar_url() -> String {
    "https://statbel.fgov.be/nl/calendar".to_string()
}
