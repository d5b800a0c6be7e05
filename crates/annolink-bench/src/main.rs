//! annolink-bench: CLI tool for connection parameter experimentation.
//!
//! Replays a recorded frame (view points or detections, plus optional
//! hit-test results) through connection selection with configurable
//! thresholds, printing diagnostics. Useful for:
//!
//! - Comparing strategies (`degree-capped` vs `spanning-tree`)
//! - Tuning the angle threshold and real-distance range
//! - Seeing which filter rejects the most candidates
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin annolink-bench -- [OPTIONS] <FRAME_PATH>
//! ```
//!
//! Set `RUST_LOG=annolink_graph=debug` to log every rejected edge.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use annolink_graph::{
    AcceptedConnection, ConnectionStrategy, ConnectorConfig, DistanceRange, Frame, NodeIdentity,
    PlanarMapper, SelectionDiagnostics, SpatialMapper, SystemClock, select_with_diagnostics,
};
use clap::{Parser, ValueEnum};
use log::{info, warn};

/// Connection parameter experimentation and diagnostics for annolink.
///
/// Runs connection selection on a recorded frame and prints candidate,
/// rejection, and timing diagnostics.
#[derive(Parser)]
#[command(name = "annolink-bench", version)]
struct Cli {
    /// Path to the frame JSON file.
    frame_path: PathBuf,

    /// Maximum connections per node.
    #[arg(long, default_value_t = ConnectorConfig::DEFAULT_MAX_DEGREE)]
    max_degree: usize,

    /// Allowed deviation from the horizontal or vertical axis, in degrees.
    #[arg(long, default_value_t = ConnectorConfig::DEFAULT_ANGLE_RANGE_DEGREES)]
    angle_range: f64,

    /// Shortest admissible real distance in millimetres.
    #[arg(long, default_value_t = ConnectorConfig::DEFAULT_DISTANCE_MIN)]
    distance_min: f64,

    /// Longest admissible real distance in millimetres.
    #[arg(long, default_value_t = ConnectorConfig::DEFAULT_DISTANCE_MAX)]
    distance_max: f64,

    /// Connection selection strategy.
    #[arg(long, value_enum, default_value_t = Strategy::DegreeCapped)]
    strategy: Strategy,

    /// How coincident points are resolved to graph nodes.
    #[arg(long, value_enum, default_value_t = Identity::Value)]
    identity: Identity,

    /// Scale for frames without a `world` table: view points are placed
    /// on a flat plane this many metres apart.
    #[arg(long, default_value_t = 0.001)]
    metres_per_point: f64,

    /// Write an SVG overlay to file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,

    /// Full connector config as a JSON string.
    ///
    /// When provided, all other threshold flags are ignored. The JSON
    /// must be a valid `ConnectorConfig` serialization; missing fields
    /// take their defaults.
    #[arg(long)]
    config_json: Option<String>,
}

/// Connection strategy selection.
#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    /// Greedy shortest-first selection under degree, distance, and angle limits.
    DegreeCapped,
    /// Minimum spanning tree over view-space lengths.
    SpanningTree,
}

/// Node identity selection.
#[derive(Clone, Copy, ValueEnum)]
enum Identity {
    /// Points with identical coordinates share a node.
    Value,
    /// Every input point is its own node.
    Index,
}

/// Build a [`ConnectorConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual threshold flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<ConnectorConfig, String> {
    let config = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?
    } else {
        ConnectorConfig {
            max_degree: cli.max_degree,
            angle_range_degrees: cli.angle_range,
            real_distance_range: DistanceRange::new(cli.distance_min, cli.distance_max),
            strategy: match cli.strategy {
                Strategy::DegreeCapped => ConnectionStrategy::DegreeCapped,
                Strategy::SpanningTree => ConnectionStrategy::SpanningTree,
            },
            identity: match cli.identity {
                Identity::Value => NodeIdentity::ByValue,
                Identity::Index => NodeIdentity::ByIndex,
            },
        }
    };
    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {e}"))?;
    Ok(config)
}

fn load_frame(path: &Path) -> Result<Frame, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("Error parsing {}: {e}", path.display()))
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let frame = match load_frame(&cli.frame_path) {
        Ok(frame) => frame,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let loaded = frame
        .points()
        .and_then(|points| frame.lookup_mapper().map(|lookup| (points, lookup)));
    let (points, lookup) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error in frame {}: {e}", cli.frame_path.display());
            return ExitCode::FAILURE;
        }
    };

    let planar = PlanarMapper::new(cli.metres_per_point);
    let mapper: &dyn SpatialMapper = if let Some(ref lookup) = lookup {
        info!("replaying {} recorded world positions", lookup.len());
        lookup
    } else {
        info!("no world table, using a flat plane at {} m/pt", cli.metres_per_point);
        &planar
    };

    eprintln!(
        "Frame: {} ({} points, {} detections)",
        cli.frame_path.display(),
        points.len(),
        frame.detections.len(),
    );
    eprintln!("Config: {config:#?}");
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    let mut all_diagnostics = Vec::with_capacity(cli.runs);

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        let (connections, diagnostics) =
            select_with_diagnostics(&points, &config, mapper, &SystemClock);

        if cli.json {
            match serde_json::to_string_pretty(&diagnostics) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error serializing diagnostics: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("{}", diagnostics.report());
        }

        // Write SVG on the first run only.
        if run == 0
            && let Some(ref svg_path) = cli.svg
        {
            write_svg(&cli, svg_path, &frame, &config, &connections);
        }

        all_diagnostics.push(diagnostics);

        if cli.runs > 1 {
            eprintln!();
        }
    }

    if cli.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    ExitCode::SUCCESS
}

fn write_svg(
    cli: &Cli,
    svg_path: &Path,
    frame: &Frame,
    config: &ConnectorConfig,
    connections: &[AcceptedConnection],
) {
    let Some(view) = frame.view else {
        warn!("frame has no view size, skipping SVG export");
        return;
    };
    let title = cli
        .frame_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("frame");
    let desc = format!(
        "{} connections, {} strategy",
        connections.len(),
        config.strategy.name(),
    );
    let config_json = serde_json::to_string(config).ok();
    let metadata = annolink_export::SvgMetadata {
        title: Some(title),
        description: Some(&desc),
        config_json: config_json.as_deref(),
    };
    let overlay = annolink_export::Overlay {
        view,
        detections: &frame.detections,
        connections,
    };
    let svg = annolink_export::to_svg(
        &overlay,
        &mut annolink_export::LabelPalette::new(),
        &metadata,
    );
    match std::fs::write(svg_path, &svg) {
        Ok(()) => {
            eprintln!(
                "SVG written to {} ({} bytes)",
                svg_path.display(),
                svg.len(),
            );
        }
        Err(e) => {
            eprintln!("Error writing SVG to {}: {e}", svg_path.display());
        }
    }
}

/// Print aggregated statistics across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[SelectionDiagnostics]) {
    println!();
    println!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    if all_diagnostics.is_empty() {
        println!("Warning: no diagnostics to summarize");
        return;
    }

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.duration.as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    println!("Duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    let accepted: Vec<usize> = all_diagnostics.iter().map(|d| d.stats.accepted).collect();
    if accepted.windows(2).any(|w| w[0] != w[1]) {
        println!("Warning: accepted counts differ between runs: {accepted:?}");
    } else {
        println!("Accepted: {} (stable across runs)", accepted[0]);
    }
}
