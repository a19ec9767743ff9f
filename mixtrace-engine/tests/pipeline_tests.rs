//! End-to-end tests for the full resolution pipeline:
//! aggregation → conflict resolution → boundary refinement → assembly

use mixtrace_common::model::catalog_from_tracks;
use mixtrace_common::{EngineConfig, Error, MatchCandidate, SegmentLabel, TrackInfo, Tracklist};
use mixtrace_engine::TracklistResolver;
use uuid::Uuid;

fn candidate(track_id: Uuid, start: f64, end: f64, confidence: f64, mix: f64) -> MatchCandidate {
    MatchCandidate::new(track_id, start, end, confidence, mix).unwrap()
}

/// Assert the tracklist invariants: sorted, first start 0, last end =
/// duration, exact contiguity with zero gap and zero overlap
fn assert_covers_mix(tracklist: &Tracklist) {
    assert!(!tracklist.segments.is_empty());
    assert_eq!(tracklist.segments[0].start_secs, 0.0);
    assert_eq!(
        tracklist.segments.last().unwrap().end_secs,
        tracklist.mix_duration_secs
    );
    for pair in tracklist.segments.windows(2) {
        assert!(pair[0].start_secs < pair[0].end_secs);
        assert_eq!(pair[0].end_secs, pair[1].start_secs);
    }
}

fn segment_track_id(label: &SegmentLabel) -> Option<Uuid> {
    match label {
        SegmentLabel::Track { track_id, .. } => Some(*track_id),
        SegmentLabel::Unidentified => None,
    }
}

#[test]
fn two_track_crossfade_splits_at_shared_boundary() {
    let mix = 600.0;
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    let candidates = vec![
        candidate(a, 0.0, 310.0, 0.9, mix),
        candidate(b, 300.0, 600.0, 0.85, mix),
    ];

    let resolution = TracklistResolver::with_defaults()
        .resolve(&candidates, mix)
        .unwrap();
    let segments = &resolution.tracklist.segments;

    assert_eq!(segments.len(), 2);
    assert_eq!(segment_track_id(&segments[0].label), Some(a));
    assert_eq!(segments[0].start_secs, 0.0);
    assert_eq!(segments[0].end_secs, 305.0);
    assert_eq!(segment_track_id(&segments[1].label), Some(b));
    assert_eq!(segments[1].start_secs, 305.0);
    assert_eq!(segments[1].end_secs, 600.0);
    assert_covers_mix(&resolution.tracklist);
}

#[test]
fn short_high_confidence_candidate_is_filtered() {
    let mix = 300.0;
    let candidates = vec![candidate(Uuid::new_v4(), 100.0, 104.0, 0.95, mix)];

    let resolution = TracklistResolver::with_defaults()
        .resolve(&candidates, mix)
        .unwrap();

    assert_eq!(resolution.tracklist.segments.len(), 1);
    assert_eq!(
        resolution.tracklist.segments[0].label,
        SegmentLabel::Unidentified
    );
    assert_eq!(resolution.diagnostics.intervals_discarded_short, 1);
    assert_covers_mix(&resolution.tracklist);
}

#[test]
fn zero_candidates_yield_single_unidentified_segment() {
    let resolution = TracklistResolver::with_defaults()
        .resolve(&[], 300.0)
        .unwrap();

    assert_eq!(resolution.tracklist.segments.len(), 1);
    assert_eq!(
        resolution.tracklist.segments[0].label,
        SegmentLabel::Unidentified
    );
    assert_eq!(resolution.tracklist.segments[0].start_secs, 0.0);
    assert_eq!(resolution.tracklist.segments[0].end_secs, 300.0);
}

#[test]
fn fragment_runs_merge_into_one_segment() {
    // Fingerprint fragments with ~1s gaps: one track, one segment
    let mix = 300.0;
    let id = Uuid::new_v4();
    let candidates: Vec<MatchCandidate> = (0..20)
        .map(|i| {
            let start = i as f64 * 11.0;
            candidate(id, start, start + 10.0, 0.8, mix)
        })
        .collect();

    let resolution = TracklistResolver::with_defaults()
        .resolve(&candidates, mix)
        .unwrap();

    assert_eq!(resolution.diagnostics.intervals_aggregated, 1);
    assert_eq!(resolution.tracklist.identified_count(), 1);
    assert_covers_mix(&resolution.tracklist);
}

#[test]
fn messy_batch_still_covers_the_mix_exactly() {
    let mix = 3600.0;
    let tracks: Vec<Uuid> = (0..6).map(|_| Uuid::new_v4()).collect();

    let mut candidates = Vec::new();
    for (slot, id) in tracks.iter().enumerate() {
        let base = slot as f64 * 580.0;
        // Fragmented genuine coverage
        for i in 0..12 {
            let start = base + i as f64 * 45.0;
            candidates.push(candidate(*id, start, start + 44.0, 0.75, mix));
        }
        // Short motif reuse on an unrelated region: noise to be out-scheduled
        let noise_start = ((slot + 3) % 6) as f64 * 580.0 + 100.0;
        candidates.push(candidate(*id, noise_start, noise_start + 6.0, 0.9, mix));
    }

    let resolution = TracklistResolver::with_defaults()
        .resolve(&candidates, mix)
        .unwrap();

    assert_covers_mix(&resolution.tracklist);
    assert_eq!(resolution.tracklist.identified_count(), 6);
    assert_eq!(resolution.diagnostics.candidates_processed, candidates.len());
}

#[test]
fn resolution_is_idempotent() {
    let mix = 1800.0;
    let tracks: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
    let mut candidates = Vec::new();
    for (slot, id) in tracks.iter().enumerate() {
        let base = slot as f64 * 440.0;
        for i in 0..8 {
            let start = base + i as f64 * 55.0;
            candidates.push(candidate(*id, start, start + 54.0, 0.6 + slot as f64 * 0.05, mix));
        }
    }

    let resolver = TracklistResolver::with_defaults();
    let first = resolver.resolve(&candidates, mix).unwrap();
    let second = resolver.resolve(&candidates, mix).unwrap();

    assert_eq!(first.tracklist, second.tracklist);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn raising_confidence_threshold_never_adds_segments() {
    let mix = 2400.0;
    let confidences = [0.45, 0.55, 0.65, 0.8, 0.92];
    let candidates: Vec<MatchCandidate> = confidences
        .iter()
        .enumerate()
        .map(|(slot, &conf)| {
            let base = slot as f64 * 480.0;
            candidate(Uuid::new_v4(), base, base + 450.0, conf, mix)
        })
        .collect();

    let mut previous = usize::MAX;
    for threshold in [0.0, 0.5, 0.6, 0.7, 0.9, 1.0] {
        let resolver = TracklistResolver::new(EngineConfig {
            min_confidence_threshold: threshold,
            ..Default::default()
        })
        .unwrap();
        let resolution = resolver.resolve(&candidates, mix).unwrap();
        let identified = resolution.tracklist.identified_count();
        assert!(identified <= previous);
        previous = identified;
    }
}

#[test]
fn chosen_subset_is_weight_optimal_against_disjoint_alternatives() {
    // Brute-force every strictly disjoint subset of the aggregated intervals
    // and confirm the engine's choice is never beaten on total
    // confidence × duration weight
    let mix = 1000.0;
    let layouts: &[(f64, f64, f64)] = &[
        (0.0, 120.0, 0.9),
        (60.0, 180.0, 0.5),
        (110.0, 420.0, 0.8),
        (200.0, 380.0, 0.95),
        (400.0, 700.0, 0.7),
        (650.0, 1000.0, 0.85),
        (690.0, 910.0, 0.6),
    ];
    let candidates: Vec<MatchCandidate> = layouts
        .iter()
        .map(|&(start, end, conf)| candidate(Uuid::new_v4(), start, end, conf, mix))
        .collect();

    let resolution = TracklistResolver::with_defaults()
        .resolve(&candidates, mix)
        .unwrap();
    let chosen_weight: f64 = resolution
        .tracklist
        .segments
        .iter()
        .filter(|s| s.is_identified())
        .map(|s| s.confidence.unwrap() * s.duration_secs())
        .sum();

    let mut best_disjoint = 0.0_f64;
    for mask in 0_u32..(1 << layouts.len()) {
        let mut picked: Vec<&(f64, f64, f64)> = layouts
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, s)| s)
            .collect();
        picked.sort_by(|a, b| a.0.total_cmp(&b.0));
        let disjoint = picked.windows(2).all(|w| w[0].1 <= w[1].0);
        if disjoint {
            let weight: f64 = picked.iter().map(|layout| (layout.1 - layout.0) * layout.2).sum();
            best_disjoint = best_disjoint.max(weight);
        }
    }

    // Boundary refinement moves seconds between neighbors but the comparison
    // holds on the accepted intervals' weight, which the segment weights
    // reflect up to the shared transitions
    assert!(
        chosen_weight + 1e-6 >= best_disjoint,
        "engine weight {} beaten by disjoint subset weight {}",
        chosen_weight,
        best_disjoint
    );
}

#[test]
fn tie_break_policy_is_configurable_end_to_end() {
    let mix = 600.0;
    let early = Uuid::new_v4();
    let late = Uuid::new_v4();
    // Identical weight, identical duration, 50s overlap: an exact tie
    let candidates = vec![
        candidate(early, 0.0, 100.0, 0.5, mix),
        candidate(late, 50.0, 150.0, 0.5, mix),
    ];

    let favoring = TracklistResolver::with_defaults()
        .resolve(&candidates, mix)
        .unwrap();
    let avoiding = TracklistResolver::new(EngineConfig {
        tie_break_favors_inclusion: false,
        ..Default::default()
    })
    .unwrap()
    .resolve(&candidates, mix)
    .unwrap();

    let favored: Vec<_> = favoring
        .tracklist
        .segments
        .iter()
        .filter_map(|s| segment_track_id(&s.label))
        .collect();
    let avoided: Vec<_> = avoiding
        .tracklist
        .segments
        .iter()
        .filter_map(|s| segment_track_id(&s.label))
        .collect();

    assert_eq!(favored, vec![late]);
    assert_eq!(avoided, vec![early]);
}

#[test]
fn replayed_track_stays_two_distinct_segments() {
    // The same song opens and closes the mix; it must not collapse into one
    let mix = 1200.0;
    let id = Uuid::new_v4();
    let other = Uuid::new_v4();
    let candidates = vec![
        candidate(id, 0.0, 300.0, 0.9, mix),
        candidate(other, 300.0, 900.0, 0.8, mix),
        candidate(id, 900.0, 1200.0, 0.9, mix),
    ];

    let resolution = TracklistResolver::with_defaults()
        .resolve(&candidates, mix)
        .unwrap();
    let ids: Vec<_> = resolution
        .tracklist
        .segments
        .iter()
        .filter_map(|s| segment_track_id(&s.label))
        .collect();

    assert_eq!(ids, vec![id, other, id]);
    assert_covers_mix(&resolution.tracklist);
}

#[test]
fn catalog_metadata_lands_on_segments() {
    let mix = 600.0;
    let id = Uuid::new_v4();
    let catalog = catalog_from_tracks(vec![TrackInfo {
        track_id: id,
        artist: "Four Tet".to_string(),
        title: "Baby".to_string(),
    }]);

    let resolution = TracklistResolver::with_defaults()
        .resolve_with_catalog(&[candidate(id, 0.0, 600.0, 0.9, mix)], mix, Some(&catalog))
        .unwrap();

    match &resolution.tracklist.segments[0].label {
        SegmentLabel::Track { artist, title, .. } => {
            assert_eq!(artist.as_deref(), Some("Four Tet"));
            assert_eq!(title.as_deref(), Some("Baby"));
        }
        SegmentLabel::Unidentified => panic!("expected identified segment"),
    }
}

#[test]
fn one_bad_candidate_fails_the_whole_batch() {
    let mix = 600.0;
    let good = candidate(Uuid::new_v4(), 0.0, 300.0, 0.9, mix);
    let bad = MatchCandidate {
        track_id: Uuid::new_v4(),
        start_secs: 100.0,
        end_secs: 700.0, // beyond the declared duration
        confidence: 0.9,
    };

    let result = TracklistResolver::with_defaults().resolve(&[good, bad], mix);
    assert!(matches!(result, Err(Error::InvalidCandidate(_))));
}

#[test]
fn zero_duration_mix_is_an_error() {
    let result = TracklistResolver::with_defaults().resolve(&[], 0.0);
    assert!(matches!(result, Err(Error::EmptyMix(_))));
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let result = TracklistResolver::new(EngineConfig {
        min_confidence_threshold: 2.0,
        ..Default::default()
    });
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn diagnostics_account_for_every_interval() {
    let mix = 1200.0;
    let solid = Uuid::new_v4();
    let candidates = vec![
        candidate(solid, 0.0, 600.0, 0.9, mix),
        candidate(Uuid::new_v4(), 100.0, 500.0, 0.2, mix), // below confidence floor
        candidate(Uuid::new_v4(), 700.0, 705.0, 0.9, mix), // below duration floor
        candidate(Uuid::new_v4(), 50.0, 550.0, 0.5, mix),  // loses the optimization
    ];

    let resolution = TracklistResolver::with_defaults()
        .resolve(&candidates, mix)
        .unwrap();
    let diagnostics = &resolution.diagnostics;

    assert_eq!(diagnostics.candidates_processed, 4);
    assert_eq!(diagnostics.tracks_with_evidence, 4);
    assert_eq!(diagnostics.intervals_aggregated, 4);
    assert_eq!(diagnostics.intervals_discarded_low_confidence, 1);
    assert_eq!(diagnostics.intervals_discarded_short, 1);
    assert_eq!(diagnostics.intervals_rejected_in_optimization, 1);
    assert_eq!(diagnostics.intervals_accepted, 1);
    assert_eq!(diagnostics.unidentified_segments, 1);
    assert!((diagnostics.identified_secs - 600.0).abs() < 1e-9);
}
