//! # Mixtrace Engine
//!
//! Tracklist resolution engine for continuous mix recordings: takes the raw
//! acoustic fingerprint matches produced against a reference song database
//! and turns them into a clean, non-overlapping, temporally ordered sequence
//! of track identifications.
//!
//! ## Pipeline
//!
//! ```text
//! raw candidates → aggregation → per-track intervals → conflict resolution
//!     → accepted intervals → boundary refinement → tracklist assembly
//! ```
//!
//! Resolution is one synchronous pass, a pure function of the candidate
//! batch, the declared mix duration, and the configuration. The engine holds
//! no state between passes; concurrent resolutions for different mixes share
//! nothing.
//!
//! ## Quick start
//!
//! ```
//! use mixtrace_common::{EngineConfig, MatchCandidate};
//! use mixtrace_engine::TracklistResolver;
//! use uuid::Uuid;
//!
//! let mix_duration = 600.0;
//! let track_a = Uuid::new_v4();
//! let track_b = Uuid::new_v4();
//!
//! let candidates = vec![
//!     MatchCandidate::new(track_a, 0.0, 310.0, 0.9, mix_duration)?,
//!     MatchCandidate::new(track_b, 300.0, 600.0, 0.85, mix_duration)?,
//! ];
//!
//! let resolver = TracklistResolver::new(EngineConfig::default())?;
//! let resolution = resolver.resolve(&candidates, mix_duration)?;
//!
//! assert_eq!(resolution.tracklist.segments.len(), 2);
//! assert_eq!(resolution.tracklist.segments[0].end_secs, 305.0);
//! # Ok::<(), mixtrace_common::Error>(())
//! ```

pub mod aggregator;
pub mod builder;
pub mod diagnostics;
pub mod refiner;
pub mod resolver;
pub mod types;

pub use diagnostics::ResolutionDiagnostics;
pub use types::TrackInterval;

use aggregator::MatchAggregator;
use builder::TracklistBuilder;
use mixtrace_common::{
    EngineConfig, Error, MatchCandidate, Result, TrackCatalog, Tracklist,
};
use refiner::BoundaryRefiner;
use resolver::ConflictResolver;
use std::collections::HashSet;

/// Output of one resolution pass: the tracklist plus observability counters
#[derive(Debug, Clone)]
pub struct Resolution {
    pub tracklist: Tracklist,
    pub diagnostics: ResolutionDiagnostics,
}

/// The tracklist resolution engine.
///
/// Construct once per configuration and reuse freely; `resolve` takes no
/// `&mut self` and retains nothing between calls.
pub struct TracklistResolver {
    config: EngineConfig,
}

impl TracklistResolver {
    /// Create a resolver, validating the configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a resolver with compiled-default configuration
    pub fn with_defaults() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve a candidate batch into a tracklist.
    ///
    /// # Errors
    ///
    /// `Error::EmptyMix` when the declared duration is zero, negative, or
    /// non-finite; `Error::InvalidCandidate` when any record in the batch is
    /// malformed (the whole batch fails, since silent drops could hide
    /// systematic matcher bugs). An unidentifiable mix is not an error: it
    /// resolves to a single unidentified segment.
    pub fn resolve(
        &self,
        candidates: &[MatchCandidate],
        mix_duration_secs: f64,
    ) -> Result<Resolution> {
        self.resolve_with_catalog(candidates, mix_duration_secs, None)
    }

    /// Resolve a candidate batch, annotating identified segments from a
    /// reference track catalog.
    pub fn resolve_with_catalog(
        &self,
        candidates: &[MatchCandidate],
        mix_duration_secs: f64,
        catalog: Option<&TrackCatalog>,
    ) -> Result<Resolution> {
        if !mix_duration_secs.is_finite() || mix_duration_secs <= 0.0 {
            return Err(Error::EmptyMix(mix_duration_secs));
        }
        for candidate in candidates {
            candidate.validate(mix_duration_secs)?;
        }

        let intervals = MatchAggregator::new(self.config.merge_gap_tolerance)
            .aggregate(candidates);

        let mut diagnostics = ResolutionDiagnostics {
            candidates_processed: candidates.len(),
            tracks_with_evidence: intervals
                .iter()
                .map(|i| i.track_id)
                .collect::<HashSet<_>>()
                .len(),
            intervals_aggregated: intervals.len(),
            ..Default::default()
        };

        let outcome = ConflictResolver::new(&self.config).resolve(intervals);
        diagnostics.intervals_discarded_low_confidence = outcome.discarded_low_confidence;
        diagnostics.intervals_discarded_short = outcome.discarded_short;
        diagnostics.intervals_rejected_in_optimization = outcome.rejected_in_optimization;
        diagnostics.intervals_accepted = outcome.accepted.len();

        let refined = BoundaryRefiner.refine(outcome.accepted);
        let tracklist = TracklistBuilder.build(refined, mix_duration_secs, catalog)?;

        diagnostics.unidentified_segments = tracklist.unidentified_count();
        diagnostics.identified_secs = tracklist.identified_secs();

        tracing::info!("Resolution complete: {}", diagnostics.summary(mix_duration_secs));

        Ok(Resolution {
            tracklist,
            diagnostics,
        })
    }
}
