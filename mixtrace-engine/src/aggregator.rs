//! Match Aggregator
//!
//! Groups raw candidates by reference track and merges temporally
//! adjacent or overlapping candidates into contiguous coverage intervals,
//! each carrying an aggregate confidence.

use crate::types::TrackInterval;
use mixtrace_common::MatchCandidate;
use std::collections::HashMap;
use uuid::Uuid;

/// Match aggregator
///
/// Pure grouping/merging logic, no filtering: tracks with only a single
/// low-support, low-confidence candidate are retained here so the conflict
/// resolver has full visibility.
pub struct MatchAggregator {
    /// Maximum gap (seconds) between same-track candidates that still merges
    /// them into one interval
    merge_gap_tolerance: f64,
}

impl MatchAggregator {
    pub fn new(merge_gap_tolerance: f64) -> Self {
        Self { merge_gap_tolerance }
    }

    /// Aggregate raw candidates into per-track coverage intervals.
    ///
    /// # Algorithm
    /// 1. Partition candidates by track id
    /// 2. Sort each partition by window start
    /// 3. Merge candidates whose windows overlap or whose gap is within
    ///    tolerance; merged confidence is the duration-weighted average of
    ///    constituents, support count their total
    /// 4. Sort the combined result by start time for a deterministic output
    ///    order
    pub fn aggregate(&self, candidates: &[MatchCandidate]) -> Vec<TrackInterval> {
        let mut by_track: HashMap<Uuid, Vec<&MatchCandidate>> = HashMap::new();
        for candidate in candidates {
            by_track.entry(candidate.track_id).or_default().push(candidate);
        }

        let track_count = by_track.len();
        let mut intervals: Vec<TrackInterval> = Vec::new();

        for (track_id, mut partition) in by_track {
            partition.sort_by(|a, b| {
                a.start_secs
                    .total_cmp(&b.start_secs)
                    .then(a.end_secs.total_cmp(&b.end_secs))
            });
            intervals.extend(self.merge_partition(track_id, &partition));
        }

        intervals.sort_by(|a, b| {
            a.start_secs
                .total_cmp(&b.start_secs)
                .then(a.end_secs.total_cmp(&b.end_secs))
                .then(a.track_id.cmp(&b.track_id))
        });

        tracing::debug!(
            "Aggregation: {} candidates over {} tracks → {} intervals",
            candidates.len(),
            track_count,
            intervals.len()
        );

        intervals
    }

    /// Merge one track's start-sorted candidates into coverage intervals
    fn merge_partition(
        &self,
        track_id: Uuid,
        sorted: &[&MatchCandidate],
    ) -> Vec<TrackInterval> {
        let mut intervals = Vec::new();
        let mut run: Option<MergeRun> = None;

        for &candidate in sorted {
            if let Some(current) = run.as_mut() {
                if candidate.start_secs - current.end_secs <= self.merge_gap_tolerance {
                    current.absorb(candidate);
                    continue;
                }
                intervals.push(current.finish(track_id));
            }
            run = Some(MergeRun::start(candidate));
        }

        if let Some(current) = run {
            intervals.push(current.finish(track_id));
        }

        intervals
    }
}

/// Accumulator for one in-progress merge of same-track candidates
struct MergeRun {
    start_secs: f64,
    end_secs: f64,
    /// Σ confidence × duration over constituents
    weighted_confidence: f64,
    /// Σ duration over constituents
    total_duration: f64,
    support_count: usize,
}

impl MergeRun {
    fn start(candidate: &MatchCandidate) -> Self {
        Self {
            start_secs: candidate.start_secs,
            end_secs: candidate.end_secs,
            weighted_confidence: candidate.confidence * candidate.duration_secs(),
            total_duration: candidate.duration_secs(),
            support_count: 1,
        }
    }

    fn absorb(&mut self, candidate: &MatchCandidate) {
        // Candidates are start-sorted but may nest inside the current run
        self.end_secs = self.end_secs.max(candidate.end_secs);
        self.weighted_confidence += candidate.confidence * candidate.duration_secs();
        self.total_duration += candidate.duration_secs();
        self.support_count += 1;
    }

    fn finish(&self, track_id: Uuid) -> TrackInterval {
        TrackInterval {
            track_id,
            start_secs: self.start_secs,
            end_secs: self.end_secs,
            confidence: self.weighted_confidence / self.total_duration,
            support_count: self.support_count,
        }
    }
}
