use crate::error::{PipelineError, Result};
use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Run-level knobs the pipeline receives from the configuration
/// collaborator. Validated once at startup; a bad value halts the run
/// before any listing is processed.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Oldest model year worth pursuing as a lead.
    #[serde(default = "default_min_vehicle_year")]
    pub min_vehicle_year: u16,
    /// When set, re-encountering a known lead with changed mutable fields
    /// refreshes the record instead of discarding it as a duplicate.
    #[serde(default)]
    pub update_policy_enabled: bool,
}

fn default_min_vehicle_year() -> u16 {
    2018
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_vehicle_year: default_min_vehicle_year(),
            update_policy_enabled: false,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Loads the config file if present, falling back to defaults when it is
    /// not. A malformed file is still a hard error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
        if self.min_vehicle_year < 1900 {
            return Err(PipelineError::Config(format!(
                "min_vehicle_year must be 1900 or later, got {}",
                self.min_vehicle_year
            )));
        }
        let max_year = (now.year() + 1) as u16;
        if self.min_vehicle_year > max_year {
            return Err(PipelineError::Config(format!(
                "min_vehicle_year {} is beyond the plausible model range (max {})",
                self.min_vehicle_year, max_year
            )));
        }
        Ok(())
    }
}
