//! Boundary Refiner
//!
//! Independently computed intervals rarely share an exact boundary: accepted
//! neighbors can leave a small gap, or overlap within the transition
//! allowance. This stage rewrites both timestamps of every consecutive pair
//! to a single transition point, giving the builder exact contiguity.

use crate::types::TrackInterval;

/// Boundary refiner
///
/// Pure timestamp adjustment: never reorders, adds, or removes intervals.
pub struct BoundaryRefiner;

impl BoundaryRefiner {
    /// Align every consecutive pair of accepted intervals on one transition
    /// point.
    ///
    /// The point is the midpoint between the first interval's end and the
    /// second's start. The same formula covers both cases: for a gap it is
    /// the gap's midpoint, for an overlap the overlap's midpoint.
    ///
    /// Expects intervals sorted by start time, as the resolver emits them.
    pub fn refine(&self, mut intervals: Vec<TrackInterval>) -> Vec<TrackInterval> {
        for i in 1..intervals.len() {
            let transition = (intervals[i - 1].end_secs + intervals[i].start_secs) / 2.0;

            if intervals[i - 1].end_secs != transition {
                tracing::debug!(
                    "Boundary refinement: {:.3}/{:.3} → {:.3}",
                    intervals[i - 1].end_secs,
                    intervals[i].start_secs,
                    transition
                );
            }

            intervals[i - 1].end_secs = transition;
            intervals[i].start_secs = transition;
        }

        intervals
    }
}
