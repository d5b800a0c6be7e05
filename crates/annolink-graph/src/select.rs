//! Connection selection: choose which candidate edges to draw.
//!
//! Defines the [`ConnectionSelector`] trait for pluggable selection
//! strategies and the [`ConnectionStrategy`] enum for runtime selection.
//! Both strategies walk the candidate edges shortest-first; they differ
//! in what admits an edge.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::edges::sorted_edges;
use crate::geometry::AxisDeviation;
use crate::mst::kruskal;
use crate::nodes::NodeKeys;
use crate::spatial::SpatialMapper;
use crate::types::{AcceptedConnection, ConnectorConfig, Edge, Point};

/// Selects which connection strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionStrategy {
    /// Greedy, degree-capped selection with angle and real-distance
    /// filters.
    ///
    /// An edge is admitted when both endpoints are below the degree cap,
    /// both endpoints project into 3D, the real distance is inside the
    /// configured range, and the segment is within the angle threshold of
    /// the horizontal *or* the vertical axis.
    #[default]
    DegreeCapped,

    /// Minimum spanning tree over the view-space edge lengths.
    ///
    /// Ignores the degree cap and both filters. Tree edges are annotated
    /// with real distance and angle; a tree edge whose endpoints cannot be
    /// projected is left out of the output.
    SpanningTree,
}

impl ConnectionStrategy {
    /// Short human-readable name, used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DegreeCapped => "DegreeCapped",
            Self::SpanningTree => "SpanningTree",
        }
    }
}

/// Trait for connection selection strategies.
///
/// Input: the view-space points for one frame, a validated configuration,
/// and the spatial capability. Output: the accepted connections in
/// acceptance order plus per-pass counters.
pub trait ConnectionSelector {
    /// Select connections among `points`.
    fn select(
        &self,
        points: &[Point],
        config: &ConnectorConfig,
        mapper: &dyn SpatialMapper,
    ) -> Selection;
}

impl ConnectionSelector for ConnectionStrategy {
    fn select(
        &self,
        points: &[Point],
        config: &ConnectorConfig,
        mapper: &dyn SpatialMapper,
    ) -> Selection {
        match *self {
            Self::DegreeCapped => select_degree_capped(points, config, mapper),
            Self::SpanningTree => select_spanning_tree(points, config, mapper),
        }
    }
}

/// Output of one selection pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Selection {
    /// Accepted connections, in ascending order of 2D length.
    pub connections: Vec<AcceptedConnection>,
    /// Counters describing how candidates were handled.
    pub stats: SelectionStats,
}

/// Per-pass counters.
///
/// Every candidate edge is either accepted or counted under exactly one
/// rejection reason, except for spanning-tree passes where non-tree edges
/// are counted in `not_in_tree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionStats {
    /// Number of input points.
    pub point_count: usize,
    /// Number of distinct graph nodes.
    pub node_count: usize,
    /// Number of candidate edges considered.
    pub candidate_edges: usize,
    /// Skipped because an endpoint had reached the degree cap.
    pub rejected_degree: usize,
    /// Skipped because an endpoint could not be projected into 3D.
    pub rejected_projection: usize,
    /// Skipped because the real distance was outside the range.
    pub rejected_distance: usize,
    /// Skipped because the segment was off both axes.
    pub rejected_angle: usize,
    /// Not part of the spanning tree.
    pub not_in_tree: usize,
    /// Number of connections emitted.
    pub accepted: usize,
}

/// Select connections with `config.strategy`.
#[must_use]
pub fn select_connections(
    points: &[Point],
    config: &ConnectorConfig,
    mapper: &dyn SpatialMapper,
) -> Vec<AcceptedConnection> {
    config.strategy.select(points, config, mapper).connections
}

/// Whether both endpoints can take one more connection.
///
/// A self-loop (coincident points keyed by value) adds two to the same
/// counter.
fn has_capacity(degree: &[usize], u: usize, v: usize, cap: usize) -> bool {
    if u == v {
        degree[u].saturating_add(2) <= cap
    } else {
        degree[u] < cap && degree[v] < cap
    }
}

/// Project both endpoints and measure the real distance between them.
fn measure(edge: &Edge, mapper: &dyn SpatialMapper) -> Option<f64> {
    let (Some(a), Some(b)) = (mapper.project(edge.a), mapper.project(edge.b)) else {
        debug!(
            "no 3D position for edge {}-{} ({:?} -> {:?}), skipping",
            edge.a_index, edge.b_index, edge.a, edge.b,
        );
        return None;
    };
    let distance = mapper.real_distance(a, b);
    trace!(
        "edge {}-{}: {:.1}px on screen, {distance:.1}mm real",
        edge.a_index, edge.b_index, edge.length,
    );
    Some(distance)
}

const fn connection(edge: &Edge, distance_mm: f64, angle_degrees: f64) -> AcceptedConnection {
    AcceptedConnection {
        a_index: edge.a_index,
        b_index: edge.b_index,
        a: edge.a,
        b: edge.b,
        distance_mm,
        angle_degrees,
    }
}

/// Greedy shortest-first selection under degree, distance, and angle
/// constraints.
///
/// Degree counters start at zero for every node and live only for this
/// call. Filters run in a fixed order (degree, projection, distance,
/// angle) so each rejected edge is attributed to the first check it
/// failed.
fn select_degree_capped(
    points: &[Point],
    config: &ConnectorConfig,
    mapper: &dyn SpatialMapper,
) -> Selection {
    let mut stats = SelectionStats {
        point_count: points.len(),
        ..SelectionStats::default()
    };
    if points.len() <= 1 {
        stats.node_count = points.len();
        return Selection {
            connections: Vec::new(),
            stats,
        };
    }

    let nodes = NodeKeys::assign(points, config.identity);
    let edges = sorted_edges(points);
    stats.node_count = nodes.node_count();
    stats.candidate_edges = edges.len();

    let mut degree = vec![0_usize; nodes.node_count()];
    let mut connections = Vec::new();

    for edge in &edges {
        let u = nodes.node(edge.a_index);
        let v = nodes.node(edge.b_index);
        if !has_capacity(&degree, u, v, config.max_degree) {
            stats.rejected_degree += 1;
            continue;
        }

        let deviation = AxisDeviation::between(edge.a, edge.b);

        let Some(distance_mm) = measure(edge, mapper) else {
            stats.rejected_projection += 1;
            continue;
        };

        if !config.real_distance_range.contains(distance_mm) {
            debug!(
                "edge {}-{}: {distance_mm:.1}mm outside {:?}",
                edge.a_index, edge.b_index, config.real_distance_range,
            );
            stats.rejected_distance += 1;
            continue;
        }

        if !deviation.within(config.angle_range_degrees) {
            debug!(
                "edge {}-{}: deviation {:.1}/{:.1} exceeds {}",
                edge.a_index,
                edge.b_index,
                deviation.horizontal,
                deviation.vertical,
                config.angle_range_degrees,
            );
            stats.rejected_angle += 1;
            continue;
        }

        degree[u] += 1;
        degree[v] += 1;
        connections.push(connection(edge, distance_mm, deviation.min()));
    }

    stats.accepted = connections.len();
    Selection { connections, stats }
}

/// Kruskal spanning tree, annotated.
fn select_spanning_tree(
    points: &[Point],
    config: &ConnectorConfig,
    mapper: &dyn SpatialMapper,
) -> Selection {
    let nodes = NodeKeys::assign(points, config.identity);
    let edges = sorted_edges(points);
    let tree = kruskal(&edges, &nodes);

    let mut stats = SelectionStats {
        point_count: points.len(),
        node_count: nodes.node_count(),
        candidate_edges: edges.len(),
        not_in_tree: edges.len() - tree.len(),
        ..SelectionStats::default()
    };

    let mut connections = Vec::with_capacity(tree.len());
    for edge in &tree {
        let Some(distance_mm) = measure(edge, mapper) else {
            stats.rejected_projection += 1;
            continue;
        };
        let deviation = AxisDeviation::between(edge.a, edge.b);
        connections.push(connection(edge, distance_mm, deviation.min()));
    }

    stats.accepted = connections.len();
    Selection { connections, stats }
}
