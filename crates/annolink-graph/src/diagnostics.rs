//! Selection diagnostics: timing, counts, and graph shape per pass.
//!
//! These diagnostics are permanent instrumentation intended for tuning
//! the angle and distance thresholds against recorded frames. They are
//! collected by [`select_with_diagnostics`] alongside the connections.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::graph::{component_count, connection_graph, max_degree};
use crate::select::{ConnectionSelector, SelectionStats};
use crate::spatial::SpatialMapper;
use crate::types::{AcceptedConnection, ConnectorConfig, Point};

/// Source of timestamps for duration measurement.
pub trait Clock {
    type Instant;

    fn now(&self) -> Self::Instant;

    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// [`Clock`] backed by `web-time`, which uses `performance.now()` on WASM
/// and `std::time::Instant` elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Instant = web_time::Instant;

    fn now(&self) -> web_time::Instant {
        web_time::Instant::now()
    }

    fn elapsed(&self, since: &web_time::Instant) -> Duration {
        since.elapsed()
    }
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single selection pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionDiagnostics {
    /// Strategy that produced the connections.
    pub strategy: String,
    /// Configuration snapshot the pass ran with.
    pub config: ConnectorConfig,
    /// Candidate and rejection counters.
    pub stats: SelectionStats,
    /// Connected components of the accepted graph, isolated nodes included.
    pub component_count: usize,
    /// Highest node degree in the accepted graph.
    pub max_degree: usize,
    /// Mean real distance of accepted connections (mm), if any.
    pub mean_distance_mm: Option<f64>,
    /// Wall-clock duration of selection (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

/// Run `config.strategy` and collect diagnostics.
///
/// The timed region covers selection only; building the diagnostic graph
/// happens afterwards.
#[must_use]
pub fn select_with_diagnostics<C: Clock>(
    points: &[Point],
    config: &ConnectorConfig,
    mapper: &dyn SpatialMapper,
    clock: &C,
) -> (Vec<AcceptedConnection>, SelectionDiagnostics) {
    let start = clock.now();
    let selection = config.strategy.select(points, config, mapper);
    let duration = clock.elapsed(&start);

    let graph = connection_graph(points, &selection.connections, config.identity);
    let diagnostics = SelectionDiagnostics {
        strategy: config.strategy.name().to_owned(),
        config: config.clone(),
        stats: selection.stats,
        component_count: component_count(&graph),
        max_degree: max_degree(&graph),
        mean_distance_mm: mean_distance(&selection.connections),
        duration,
    };

    (selection.connections, diagnostics)
}

#[allow(clippy::cast_precision_loss)]
fn mean_distance(connections: &[AcceptedConnection]) -> Option<f64> {
    if connections.is_empty() {
        return None;
    }
    let total: f64 = connections.iter().map(|c| c.distance_mm).sum();
    Some(total / connections.len() as f64)
}

impl SelectionDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let s = &self.stats;
        let range = self.config.real_distance_range;
        let mut lines = Vec::new();

        lines.push(format!("Selection Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Strategy: {}  |  max degree {}  |  angle <= {:.1}°  |  distance {:.0}-{:.0}mm",
            self.strategy,
            self.config.max_degree,
            self.config.angle_range_degrees,
            range.min,
            range.max,
        ));
        lines.push(format!(
            "Duration: {:.3}ms",
            self.duration.as_secs_f64() * 1000.0
        ));
        lines.push(String::new());

        lines.push(format!(
            "Points: {}  |  Nodes: {}  |  Candidates: {}",
            s.point_count, s.node_count, s.candidate_edges,
        ));
        lines.push("-".repeat(60));
        let rows = [
            ("Accepted", s.accepted),
            ("Rejected: degree cap", s.rejected_degree),
            ("Rejected: no projection", s.rejected_projection),
            ("Rejected: distance", s.rejected_distance),
            ("Rejected: angle", s.rejected_angle),
            ("Not in tree", s.not_in_tree),
        ];
        for (name, count) in rows {
            lines.push(format!("{name:<28} {count:>8}"));
        }
        lines.push(String::new());

        let mean = self
            .mean_distance_mm
            .map_or_else(|| "n/a".to_owned(), |d| format!("{d:.1}mm"));
        lines.push(format!(
            "Components: {}  |  Max degree: {}  |  Mean distance: {mean}",
            self.component_count, self.max_degree,
        ));

        lines.join("\n")
    }
}
