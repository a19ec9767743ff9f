//! Core model types shared between the engine and its callers
//!
//! `MatchCandidate` is the input vocabulary (one raw fingerprint match),
//! `ResolvedSegment`/`Tracklist` the output vocabulary (the final attributed
//! timeline), and `TrackInfo`/`TrackCatalog` the optional reference metadata
//! used to annotate identified segments.

mod candidate;
mod catalog;
mod segment;

pub use candidate::MatchCandidate;
pub use catalog::{catalog_from_tracks, TrackCatalog, TrackInfo};
pub use segment::{ResolvedSegment, SegmentLabel, Tracklist};
