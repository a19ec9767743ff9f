//! Reference track metadata

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Display metadata for one reference track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackInfo {
    pub track_id: Uuid,
    pub artist: String,
    pub title: String,
}

/// Reference metadata keyed by track id.
///
/// Supplied by the caller alongside the candidate batch; the tracklist
/// builder uses it to annotate identified segments. Tracks absent from the
/// catalog still resolve, just without artist/title.
pub type TrackCatalog = HashMap<Uuid, TrackInfo>;

/// Build a catalog from a flat list of track records
pub fn catalog_from_tracks(tracks: Vec<TrackInfo>) -> TrackCatalog {
    tracks.into_iter().map(|t| (t.track_id, t)).collect()
}
