//! Tracklist Builder
//!
//! Walks the refined, boundary-aligned intervals in time order, fills
//! unidentified spans, annotates identified segments from the reference
//! catalog, and emits the final tracklist covering [0, mix duration] with
//! no gaps and no overlaps.

use crate::types::TrackInterval;
use mixtrace_common::{
    Error, ResolvedSegment, Result, SegmentLabel, TrackCatalog, Tracklist,
};

/// Gaps smaller than this are numeric residue, not real unidentified spans
const GAP_EPSILON: f64 = 1e-9;

/// Tracklist builder
pub struct TracklistBuilder;

impl TracklistBuilder {
    /// Assemble the final tracklist.
    ///
    /// Inserts an unidentified segment for any span before the first
    /// interval, between non-adjacent intervals (the refiner leaves none, but
    /// the walk handles them anyway), and after the last interval up to the
    /// declared mix duration. Consecutive segments share the identical f64
    /// boundary value.
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyMix` when the declared duration is zero,
    /// negative, or non-finite. That is a caller input error, unlike an
    /// empty interval set, which legitimately yields one unidentified
    /// segment.
    pub fn build(
        &self,
        intervals: Vec<TrackInterval>,
        mix_duration_secs: f64,
        catalog: Option<&TrackCatalog>,
    ) -> Result<Tracklist> {
        if !mix_duration_secs.is_finite() || mix_duration_secs <= 0.0 {
            return Err(Error::EmptyMix(mix_duration_secs));
        }

        let mut segments: Vec<ResolvedSegment> = Vec::with_capacity(intervals.len() + 2);
        let mut cursor = 0.0_f64;

        for interval in intervals {
            // An interval swallowed entirely by an earlier neighbor adds nothing
            if interval.end_secs <= cursor + GAP_EPSILON {
                continue;
            }
            if interval.start_secs - cursor > GAP_EPSILON {
                segments.push(unidentified(cursor, interval.start_secs));
                cursor = interval.start_secs;
            }

            let end = interval.end_secs;
            segments.push(ResolvedSegment {
                label: label_for(&interval, catalog),
                // Pin to the cursor so numeric residue cannot open a micro-gap
                start_secs: cursor,
                end_secs: end,
                confidence: Some(interval.confidence),
            });
            cursor = end;
        }

        if mix_duration_secs - cursor > GAP_EPSILON {
            segments.push(unidentified(cursor, mix_duration_secs));
        } else if let Some(last) = segments.last_mut() {
            last.end_secs = mix_duration_secs;
        }

        let tracklist = Tracklist {
            mix_duration_secs,
            segments,
        };

        tracing::debug!(
            "Tracklist built: {} segments, {:.1}s of {:.1}s identified",
            tracklist.segments.len(),
            tracklist.identified_secs(),
            mix_duration_secs
        );

        Ok(tracklist)
    }
}

fn unidentified(start: f64, end: f64) -> ResolvedSegment {
    ResolvedSegment {
        label: SegmentLabel::Unidentified,
        start_secs: start,
        end_secs: end,
        confidence: None,
    }
}

fn label_for(interval: &TrackInterval, catalog: Option<&TrackCatalog>) -> SegmentLabel {
    let info = catalog.and_then(|c| c.get(&interval.track_id));
    SegmentLabel::Track {
        track_id: interval.track_id,
        artist: info.map(|i| i.artist.clone()),
        title: info.map(|i| i.title.clone()),
    }
}
