//! Shared types and data contracts between the engine stages
//!
//! `TrackInterval` is the contract between aggregation, conflict resolution,
//! and boundary refinement. It is scoped to one resolution pass and never
//! escapes into the public output model.

use uuid::Uuid;

/// Aggregated evidence for one reference track over one contiguous region of
/// the mix.
///
/// Intervals for *different* tracks may overlap in time; picking a disjoint
/// subset is the conflict resolver's job.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackInterval {
    /// Reference track this evidence points at
    pub track_id: Uuid,
    /// Coverage start within the mix (seconds)
    pub start_secs: f64,
    /// Coverage end within the mix (seconds)
    pub end_secs: f64,
    /// Duration-weighted average of constituent candidate confidences.
    /// Never the constituent maximum: sparse low-confidence evidence must not
    /// ride on one lucky fragment.
    pub confidence: f64,
    /// Number of raw candidates merged into this interval
    pub support_count: usize,
}

impl TrackInterval {
    /// Coverage length in seconds
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }

    /// Scheduling weight: confidence × duration.
    ///
    /// A purely confidence-maximizing objective would favor many tiny
    /// high-confidence slivers over one long solid match; weighting by
    /// duration biases toward sustained identifications.
    pub fn weight(&self) -> f64 {
        self.confidence * self.duration_secs()
    }
}
