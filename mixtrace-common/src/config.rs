//! Engine configuration loading and resolution
//!
//! Configuration values are resolved with the following priority order:
//! 1. Per-field environment variable (highest priority)
//! 2. TOML config file (explicit path, `MIXTRACE_CONFIG`, or the platform
//!    config directory)
//! 3. Compiled defaults (fallback)
//!
//! A missing config file never causes termination; the engine starts with
//! compiled defaults and logs a warning.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Per-field environment override variables
const ENV_MERGE_GAP_TOLERANCE: &str = "MIXTRACE_MERGE_GAP_TOLERANCE";
const ENV_MIN_CONFIDENCE: &str = "MIXTRACE_MIN_CONFIDENCE";
const ENV_MIN_SEGMENT_DURATION: &str = "MIXTRACE_MIN_SEGMENT_DURATION";
const ENV_TIE_BREAK_INCLUSION: &str = "MIXTRACE_TIE_BREAK_INCLUSION";
const ENV_MAX_TRANSITION_OVERLAP: &str = "MIXTRACE_MAX_TRANSITION_OVERLAP";

/// Config file location override
const ENV_CONFIG_PATH: &str = "MIXTRACE_CONFIG";

/// Tuning parameters for one tracklist resolution pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum gap (seconds) between two same-track candidates that still
    /// merges them into one coverage interval. Fingerprint fragments are
    /// computed on a fixed short window, so small gaps between consecutive
    /// fragment matches of one real track are expected.
    pub merge_gap_tolerance: f64,

    /// Confidence floor for a coverage interval to be considered for
    /// acceptance. Intervals below this are treated as noise.
    pub min_confidence_threshold: f64,

    /// Duration floor (seconds) for an accepted segment. A DJ set's tracks
    /// occupy minutes, not seconds.
    pub min_segment_duration: f64,

    /// When including or excluding an interval yields exactly equal total
    /// weight, include it. Missing a true identification is judged worse than
    /// a spurious short one; this remains a tunable policy, not ground truth.
    pub tie_break_favors_inclusion: bool,

    /// Maximum overlap (seconds) two accepted intervals may share. During a
    /// crossfade both tracks are audible, so evidence for consecutive tracks
    /// legitimately overlaps around the transition; the boundary refiner
    /// collapses the shared region to a single cut point afterwards.
    pub max_transition_overlap: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            merge_gap_tolerance: 1.5,      // seconds
            min_confidence_threshold: 0.4,
            min_segment_duration: 8.0,     // seconds
            tie_break_favors_inclusion: true,
            max_transition_overlap: 15.0,  // seconds
        }
    }
}

impl EngineConfig {
    /// Validate parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !self.merge_gap_tolerance.is_finite() || self.merge_gap_tolerance < 0.0 {
            return Err(Error::Config(format!(
                "merge_gap_tolerance must be a non-negative number, got {}",
                self.merge_gap_tolerance
            )));
        }
        if !self.min_confidence_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.min_confidence_threshold)
        {
            return Err(Error::Config(format!(
                "min_confidence_threshold must be within [0, 1], got {}",
                self.min_confidence_threshold
            )));
        }
        if !self.min_segment_duration.is_finite() || self.min_segment_duration < 0.0 {
            return Err(Error::Config(format!(
                "min_segment_duration must be a non-negative number, got {}",
                self.min_segment_duration
            )));
        }
        if !self.max_transition_overlap.is_finite() || self.max_transition_overlap < 0.0 {
            return Err(Error::Config(format!(
                "max_transition_overlap must be a non-negative number, got {}",
                self.max_transition_overlap
            )));
        }
        Ok(())
    }

    /// Parse a TOML document into a config
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Resolve the effective config.
    ///
    /// File selection priority: explicit path argument, then the
    /// `MIXTRACE_CONFIG` environment variable, then the platform config
    /// directory (`<config_dir>/mixtrace/config.toml`). A missing file at the
    /// default location falls back to compiled defaults with a warning; an
    /// explicitly named file that cannot be read is an error. Per-field
    /// environment variables override whatever the file provided.
    pub fn resolve(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None => match std::env::var(ENV_CONFIG_PATH) {
                Ok(path) => Self::from_file(Path::new(&path))?,
                Err(_) => match default_config_path() {
                    Some(path) if path.exists() => Self::from_file(&path)?,
                    _ => {
                        warn!("No config file found, using compiled defaults");
                        Self::default()
                    }
                },
            },
        };

        config.apply_env_overrides()?;
        config.validate()?;
        debug!(?config, "Engine config resolved");
        Ok(config)
    }

    /// Apply per-field environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_f64(ENV_MERGE_GAP_TOLERANCE)? {
            self.merge_gap_tolerance = value;
        }
        if let Some(value) = env_f64(ENV_MIN_CONFIDENCE)? {
            self.min_confidence_threshold = value;
        }
        if let Some(value) = env_f64(ENV_MIN_SEGMENT_DURATION)? {
            self.min_segment_duration = value;
        }
        if let Some(value) = env_f64(ENV_MAX_TRANSITION_OVERLAP)? {
            self.max_transition_overlap = value;
        }
        if let Ok(raw) = std::env::var(ENV_TIE_BREAK_INCLUSION) {
            self.tie_break_favors_inclusion = raw.parse::<bool>().map_err(|_| {
                Error::Config(format!(
                    "{} must be true or false, got {:?}",
                    ENV_TIE_BREAK_INCLUSION, raw
                ))
            })?;
        }
        Ok(())
    }
}

/// Read an f64 from the environment, erroring on unparsable values
fn env_f64(name: &str) -> Result<Option<f64>> {
    match std::env::var(name) {
        Ok(raw) => {
            let value = raw.parse::<f64>().map_err(|_| {
                Error::Config(format!("{} must be a number, got {:?}", name, raw))
            })?;
            Ok(Some(value))
        }
        Err(_) => Ok(None),
    }
}

/// Default config file path for the platform (`<config_dir>/mixtrace/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mixtrace").join("config.toml"))
}
