//! Conflict Resolver
//!
//! Selects a single non-overlapping cover of the mix timeline from the
//! aggregated per-track intervals, maximizing total confidence × duration
//! weight. Classic weighted interval scheduling, adapted in two ways: a
//! bounded overlap allowance between consecutive accepted intervals (tracks
//! blend into each other during a crossfade, so their evidence overlaps
//! around the transition), and the explicit tie-break policy described on
//! [`ConflictResolver`].

use crate::types::TrackInterval;
use mixtrace_common::EngineConfig;

/// Weight comparisons treat differences below this as exact ties
const WEIGHT_EPSILON: f64 = 1e-9;

/// Outcome of one resolution pass
#[derive(Debug, Clone, Default)]
pub struct ResolverOutcome {
    /// Accepted intervals sorted by start time. Consecutive intervals
    /// overlap by at most the transition allowance; the boundary refiner
    /// turns that into exact contiguity.
    pub accepted: Vec<TrackInterval>,
    /// Intervals discarded for confidence below threshold
    pub discarded_low_confidence: usize,
    /// Intervals discarded for duration below the segment floor
    pub discarded_short: usize,
    /// Intervals that survived filtering but lost the scheduling optimization
    pub rejected_in_optimization: usize,
}

/// Conflict resolver
///
/// Tie-break policy, applied in order:
/// 1. Greater total weight wins.
/// 2. At equal weight, fewer segments win (fewer, longer identifications are
///    more plausible for a DJ mix than many short fragmentary ones).
/// 3. A residual exact tie between including and excluding an interval goes
///    to inclusion when `tie_break_favors_inclusion` is set.
pub struct ConflictResolver {
    min_confidence_threshold: f64,
    min_segment_duration: f64,
    tie_break_favors_inclusion: bool,
    max_transition_overlap: f64,
}

impl ConflictResolver {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            min_confidence_threshold: config.min_confidence_threshold,
            min_segment_duration: config.min_segment_duration,
            tie_break_favors_inclusion: config.tie_break_favors_inclusion,
            max_transition_overlap: config.max_transition_overlap,
        }
    }

    /// Resolve overlapping per-track intervals into an accepted set.
    ///
    /// Zero survivors is a legitimate outcome (the mix is unidentified), not
    /// an error.
    ///
    /// # Algorithm
    /// 1. Discard intervals below the confidence or duration floors
    /// 2. Sort survivors by end time
    /// 3. For each interval, binary-search the latest-ending interval whose
    ///    end lies within the transition allowance of its start, then decide
    ///    include/exclude by dynamic programming over (weight, segment count)
    /// 4. Backtrack to recover the chosen subset
    pub fn resolve(&self, intervals: Vec<TrackInterval>) -> ResolverOutcome {
        let mut outcome = ResolverOutcome::default();

        let mut survivors: Vec<TrackInterval> = Vec::with_capacity(intervals.len());
        for interval in intervals {
            if interval.confidence < self.min_confidence_threshold {
                outcome.discarded_low_confidence += 1;
            } else if interval.duration_secs() < self.min_segment_duration {
                outcome.discarded_short += 1;
            } else {
                survivors.push(interval);
            }
        }

        tracing::debug!(
            "Conflict resolution: {} survivors ({} below confidence floor, {} below duration floor)",
            survivors.len(),
            outcome.discarded_low_confidence,
            outcome.discarded_short
        );

        if survivors.is_empty() {
            return outcome;
        }

        survivors.sort_by(|a, b| {
            a.end_secs
                .total_cmp(&b.end_secs)
                .then(a.start_secs.total_cmp(&b.start_secs))
                .then(a.track_id.cmp(&b.track_id))
        });

        let survivor_count = survivors.len();
        let accepted = self.drop_contained(self.schedule(&survivors));
        outcome.rejected_in_optimization = survivor_count - accepted.len();
        outcome.accepted = accepted;
        outcome
    }

    /// Weighted interval scheduling over end-sorted survivors
    fn schedule(&self, survivors: &[TrackInterval]) -> Vec<TrackInterval> {
        let n = survivors.len();
        let ends: Vec<f64> = survivors.iter().map(|s| s.end_secs).collect();

        // predecessor[i]: count of earlier intervals ending within the
        // transition allowance of survivors[i]'s start, which doubles as the
        // DP index of the best compatible prefix. The search stays strictly
        // before i: an interval shorter than the allowance would otherwise
        // match itself.
        let predecessor: Vec<usize> = survivors
            .iter()
            .enumerate()
            .map(|(idx, s)| {
                ends[..idx]
                    .partition_point(|&end| end <= s.start_secs + self.max_transition_overlap)
            })
            .collect();

        // best[i]: (total weight, segment count) achievable using the first i
        // intervals; chose[i - 1] records whether interval i-1 is included
        let mut best: Vec<(f64, usize)> = vec![(0.0, 0); n + 1];
        let mut chose: Vec<bool> = vec![false; n];

        for i in 1..=n {
            let interval = &survivors[i - 1];
            let compatible = best[predecessor[i - 1]];
            let include = (compatible.0 + interval.weight(), compatible.1 + 1);
            let exclude = best[i - 1];

            chose[i - 1] = self.prefer_include(include, exclude);
            best[i] = if chose[i - 1] { include } else { exclude };
        }

        // Backtrack to recover the optimal subset
        let mut accepted: Vec<TrackInterval> = Vec::new();
        let mut i = n;
        while i > 0 {
            if chose[i - 1] {
                accepted.push(survivors[i - 1].clone());
                i = predecessor[i - 1];
            } else {
                i -= 1;
            }
        }
        accepted.reverse();

        tracing::debug!(
            "Scheduling: accepted {} of {} intervals, total weight {:.1}",
            accepted.len(),
            n,
            best[n].0
        );

        accepted
    }

    /// Decide an include/exclude branch under the tie-break policy
    fn prefer_include(&self, include: (f64, usize), exclude: (f64, usize)) -> bool {
        if include.0 > exclude.0 + WEIGHT_EPSILON {
            return true;
        }
        if exclude.0 > include.0 + WEIGHT_EPSILON {
            return false;
        }
        // Equal weight: fewer segments win
        if include.1 != exclude.1 {
            return include.1 < exclude.1;
        }
        self.tie_break_favors_inclusion
    }

    /// Drop intervals nested inside a neighbor.
    ///
    /// The overlap allowance lets a short interval ending just past a long
    /// neighbor's start slip into the schedule while lying entirely inside
    /// it. Such a pair has no transition point; keep the heavier interval.
    fn drop_contained(&self, accepted: Vec<TrackInterval>) -> Vec<TrackInterval> {
        let mut kept: Vec<TrackInterval> = Vec::with_capacity(accepted.len());
        let mut sorted = accepted;
        sorted.sort_by(|a, b| {
            a.start_secs
                .total_cmp(&b.start_secs)
                .then(a.end_secs.total_cmp(&b.end_secs))
        });

        for interval in sorted {
            match kept.last_mut() {
                Some(last) if interval.end_secs <= last.end_secs => {
                    if interval.weight() > last.weight() {
                        *last = interval;
                    }
                }
                _ => kept.push(interval),
            }
        }
        kept
    }
}
