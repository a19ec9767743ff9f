//! mixtrace - tracklist resolution CLI
//!
//! Runs one resolution pass over a candidate batch captured to disk:
//! reads a JSON request (mix duration, match candidates, optional track
//! catalog), resolves it, and prints the tracklist as JSON or as cue-style
//! text. Useful for replaying matcher output against tuned thresholds
//! without the surrounding service.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mixtrace_common::human_time::format_cue;
use mixtrace_common::model::catalog_from_tracks;
use mixtrace_common::{EngineConfig, MatchCandidate, SegmentLabel, TrackInfo};
use mixtrace_engine::{Resolution, TracklistResolver};

/// Command-line arguments for mixtrace
#[derive(Parser, Debug)]
#[command(name = "mixtrace")]
#[command(about = "Resolve fingerprint match candidates into a mix tracklist")]
#[command(version)]
struct Args {
    /// Path to the JSON resolution request
    input: PathBuf,

    /// Path to a TOML config file
    #[arg(short, long, env = "MIXTRACE_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Tracklist and diagnostics as JSON
    Json,
    /// Cue-style text lines
    Cue,
}

/// One resolution request as captured from the matcher
#[derive(Debug, Deserialize)]
struct ResolutionRequest {
    mix_duration_secs: f64,
    #[serde(default)]
    candidates: Vec<MatchCandidate>,
    #[serde(default)]
    catalog: Vec<TrackInfo>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mixtrace=info,mixtrace_engine=info,mixtrace_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = EngineConfig::resolve(args.config.as_deref())
        .context("Failed to resolve engine configuration")?;

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let request: ResolutionRequest = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    info!(
        "Resolving {} candidates over a {:.0}s mix",
        request.candidates.len(),
        request.mix_duration_secs
    );

    let catalog = catalog_from_tracks(request.catalog);
    let resolver = TracklistResolver::new(config)?;
    let resolution = resolver.resolve_with_catalog(
        &request.candidates,
        request.mix_duration_secs,
        Some(&catalog),
    )?;

    match args.format {
        OutputFormat::Json => print_json(&resolution, args.pretty)?,
        OutputFormat::Cue => print_cue(&resolution),
    }

    Ok(())
}

fn print_json(resolution: &Resolution, pretty: bool) -> Result<()> {
    let payload = serde_json::json!({
        "tracklist": resolution.tracklist,
        "diagnostics": resolution.diagnostics,
    });

    let rendered = if pretty {
        serde_json::to_string_pretty(&payload)?
    } else {
        serde_json::to_string(&payload)?
    };
    println!("{}", rendered);
    Ok(())
}

fn print_cue(resolution: &Resolution) {
    for segment in &resolution.tracklist.segments {
        let line = match &segment.label {
            SegmentLabel::Track { track_id, artist, title } => {
                match (artist, title) {
                    (Some(artist), Some(title)) => format!("{} - {}", artist, title),
                    _ => track_id.to_string(),
                }
            }
            SegmentLabel::Unidentified => "?".to_string(),
        };
        println!("[{}] {}", format_cue(segment.start_secs), line);
    }
}
