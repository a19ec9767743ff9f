//! Raw fingerprint match candidates

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One raw fingerprint-fragment match against one reference track.
///
/// Produced by the external fingerprint matcher, consumed only by the match
/// aggregator. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Reference track this fragment matched
    pub track_id: Uuid,
    /// Match window start within the mix (seconds)
    pub start_secs: f64,
    /// Match window end within the mix (seconds)
    pub end_secs: f64,
    /// Match confidence in [0, 1]
    pub confidence: f64,
}

impl MatchCandidate {
    /// Construct a validated candidate.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidCandidate` when the window is empty or
    /// reversed, the confidence is outside [0, 1], a timestamp is negative or
    /// beyond the declared mix duration, or any value is non-finite.
    pub fn new(
        track_id: Uuid,
        start_secs: f64,
        end_secs: f64,
        confidence: f64,
        mix_duration_secs: f64,
    ) -> Result<Self> {
        let candidate = Self {
            track_id,
            start_secs,
            end_secs,
            confidence,
        };
        candidate.validate(mix_duration_secs)?;
        Ok(candidate)
    }

    /// Re-check the construction invariants against a declared mix duration.
    ///
    /// The engine runs this over the whole input batch before resolving, so
    /// records that bypassed [`MatchCandidate::new`] (e.g. deserialized ones)
    /// are still rejected rather than silently dropped.
    pub fn validate(&self, mix_duration_secs: f64) -> Result<()> {
        if !self.start_secs.is_finite()
            || !self.end_secs.is_finite()
            || !self.confidence.is_finite()
        {
            return Err(Error::InvalidCandidate(format!(
                "non-finite value in candidate for track {}",
                self.track_id
            )));
        }
        if self.end_secs <= self.start_secs {
            return Err(Error::InvalidCandidate(format!(
                "empty or reversed window [{}, {}] for track {}",
                self.start_secs, self.end_secs, self.track_id
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(Error::InvalidCandidate(format!(
                "confidence {} outside [0, 1] for track {}",
                self.confidence, self.track_id
            )));
        }
        if self.start_secs < 0.0 || self.end_secs > mix_duration_secs {
            return Err(Error::InvalidCandidate(format!(
                "window [{}, {}] outside mix duration {} for track {}",
                self.start_secs, self.end_secs, mix_duration_secs, self.track_id
            )));
        }
        Ok(())
    }

    /// Window length in seconds
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}
