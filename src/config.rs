use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::predict::{GapPolicy, GroundStation, LightTimeMode, SweepParams};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("{0}")]
    Invalid(String),
}

/// A prediction job: who observes, what, when, and where the reports go.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub station: StationConfig,
    pub target: TargetConfig,
    pub window: WindowConfig,
    #[serde(default)]
    pub min_elevation_deg: f64,
    #[serde(default)]
    pub light_time: LightTimeMode,
    #[serde(default)]
    pub gap_policy: GapPolicy,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationConfig {
    pub name: Option<String>,
    pub coordinates: String,
    #[serde(default)]
    pub altitude_m: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetConfig {
    pub name: Option<String>,
    pub tle: Option<String>,
    pub tle_file: Option<PathBuf>,
    pub norad_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TargetSource {
    Inline(String),
    File(PathBuf),
    Catalog(u32),
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub step: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_passes_path")]
    pub passes: PathBuf,
    #[serde(default = "default_ephemeris_path")]
    pub ephemeris: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            passes: default_passes_path(),
            ephemeris: default_ephemeris_path(),
        }
    }
}

fn default_passes_path() -> PathBuf {
    PathBuf::from("passes.json")
}

fn default_ephemeris_path() -> PathBuf {
    PathBuf::from("ephemeris.json")
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub timeout: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl CatalogConfig {
    pub fn timeout(&self) -> Result<std::time::Duration, ConfigError> {
        match &self.timeout {
            Some(t) => humantime::parse_duration(t.trim())
                .map_err(|e| ConfigError::Invalid(format!("catalog.timeout: {}", e))),
            None => Ok(DEFAULT_TIMEOUT),
        }
    }
}

impl TargetConfig {
    pub fn source(&self) -> Result<TargetSource, ConfigError> {
        match (&self.tle, &self.tle_file, self.norad_id) {
            (Some(tle), None, None) => Ok(TargetSource::Inline(tle.clone())),
            (None, Some(path), None) => Ok(TargetSource::File(path.clone())),
            (None, None, Some(id)) => Ok(TargetSource::Catalog(id)),
            (None, None, None) => Err(ConfigError::Invalid(
                "target needs one of 'tle', 'tle_file' or 'norad_id'".into(),
            )),
            _ => Err(ConfigError::Invalid(
                "target: 'tle', 'tle_file' and 'norad_id' are mutually exclusive".into(),
            )),
        }
    }
}

impl JobConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: JobConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.station()?;
        self.target.source()?;
        self.catalog.timeout()?;

        if !(-90.0..=90.0).contains(&self.min_elevation_deg) {
            return Err(ConfigError::Invalid(format!(
                "min_elevation_deg must be within [-90, 90], got {}",
                self.min_elevation_deg
            )));
        }

        self.sweep_params()?
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn station(&self) -> Result<GroundStation, ConfigError> {
        GroundStation::from_coordinates(&self.station.coordinates, Some(self.station.altitude_m))
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "invalid station coordinates: '{}'",
                    self.station.coordinates
                ))
            })
    }

    pub fn step(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.window.step)
            .map_err(|e| ConfigError::Invalid(format!("window.step: {}", e)))
    }

    pub fn sweep_params(&self) -> Result<SweepParams, ConfigError> {
        Ok(SweepParams {
            start: self.window.start,
            end: self.window.end,
            step: self.step()?,
            min_elevation_deg: self.min_elevation_deg,
            light_time: self.light_time,
            gap_policy: self.gap_policy,
        })
    }
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| Duration::from_std(d).map_err(|e| e.to_string()))
}
