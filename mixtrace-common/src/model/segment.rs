//! Resolved segments and the final tracklist

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Attribution of one resolved segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SegmentLabel {
    /// An identified reference track, with catalog metadata when available
    Track {
        track_id: Uuid,
        #[serde(skip_serializing_if = "Option::is_none")]
        artist: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    /// No identification could be made for this span
    Unidentified,
}

/// A single accepted, time-disjoint slice of the final tracklist.
///
/// Within a [`Tracklist`] segments never overlap, and each segment's
/// `end_secs` equals the next segment's `start_secs` exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSegment {
    pub label: SegmentLabel,
    /// Segment start within the mix (seconds)
    pub start_secs: f64,
    /// Segment end within the mix (seconds)
    pub end_secs: f64,
    /// Aggregate identification confidence; `None` for unidentified spans
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl ResolvedSegment {
    /// Segment length in seconds
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }

    /// Whether this segment carries a track identification
    pub fn is_identified(&self) -> bool {
        matches!(self.label, SegmentLabel::Track { .. })
    }
}

/// The final ordered sequence of resolved segments spanning the whole mix.
///
/// Built once per resolution pass; not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tracklist {
    /// Declared mix duration (seconds)
    pub mix_duration_secs: f64,
    /// Segments ordered by start time, gap-free and overlap-free
    pub segments: Vec<ResolvedSegment>,
}

impl Tracklist {
    /// Total seconds covered by identified segments
    pub fn identified_secs(&self) -> f64 {
        self.segments
            .iter()
            .filter(|s| s.is_identified())
            .map(|s| s.duration_secs())
            .sum()
    }

    /// Number of identified segments
    pub fn identified_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_identified()).count()
    }

    /// Number of unidentified gap segments
    pub fn unidentified_count(&self) -> usize {
        self.segments.len() - self.identified_count()
    }
}
