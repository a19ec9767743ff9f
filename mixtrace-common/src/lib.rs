//! # Mixtrace Common Library
//!
//! Shared code for the mixtrace tracklist identification service:
//! - Core model types (match candidates, resolved segments, tracklists)
//! - Error types
//! - Engine configuration loading
//! - Time display helpers

pub mod config;
pub mod error;
pub mod human_time;
pub mod model;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use model::{
    MatchCandidate, ResolvedSegment, SegmentLabel, TrackCatalog, TrackInfo, Tracklist,
};
