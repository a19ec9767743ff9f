//! Resolution diagnostics
//!
//! Observability counters for one resolution pass, returned alongside the
//! tracklist as a side structure. Never embedded in the segments themselves.

use serde::{Deserialize, Serialize};

/// Counters describing how one candidate batch became a tracklist
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolutionDiagnostics {
    /// Raw candidates received from the matcher
    pub candidates_processed: usize,
    /// Distinct reference tracks with any evidence
    pub tracks_with_evidence: usize,
    /// Coverage intervals produced by aggregation
    pub intervals_aggregated: usize,
    /// Intervals discarded for confidence below threshold
    pub intervals_discarded_low_confidence: usize,
    /// Intervals discarded for duration below the segment floor
    pub intervals_discarded_short: usize,
    /// Intervals that survived filtering but lost the scheduling optimization
    pub intervals_rejected_in_optimization: usize,
    /// Intervals accepted into the final tracklist
    pub intervals_accepted: usize,
    /// Unidentified gap segments in the final tracklist
    pub unidentified_segments: usize,
    /// Seconds of the mix covered by identified segments
    pub identified_secs: f64,
}

impl ResolutionDiagnostics {
    /// One-line summary for the resolution log
    pub fn summary(&self, mix_duration_secs: f64) -> String {
        format!(
            "{} candidates → {} intervals → {} accepted ({:.0}% of {:.0}s identified)",
            self.candidates_processed,
            self.intervals_aggregated,
            self.intervals_accepted,
            if mix_duration_secs > 0.0 {
                self.identified_secs / mix_duration_secs * 100.0
            } else {
                0.0
            },
            mix_duration_secs
        )
    }
}
