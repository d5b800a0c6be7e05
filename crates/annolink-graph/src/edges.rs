//! Candidate edge generation for the complete graph over a point set.

use crate::geometry::distance_2d;
use crate::types::{Edge, Point};

/// Build every undirected candidate edge `(i, j)` with `i < j`.
///
/// Produces exactly `n * (n - 1) / 2` edges in row-major order
/// (`(0,1), (0,2), ..., (1,2), ...`). Empty or single-point input yields
/// no edges.
#[must_use]
pub fn build_edges(points: &[Point]) -> Vec<Edge> {
    let n = points.len();
    let mut edges = Vec::with_capacity(n * n.saturating_sub(1) / 2);

    for (i, &a) in points.iter().enumerate() {
        for (j, &b) in points.iter().enumerate().skip(i + 1) {
            edges.push(Edge {
                a_index: i,
                b_index: j,
                a,
                b,
                length: distance_2d(a, b),
            });
        }
    }

    edges
}

/// Sort edges by ascending 2D length.
///
/// The sort is stable, so equal-length edges keep their generation order
/// and every pass over the same input visits edges identically.
pub fn sort_by_length(edges: &mut [Edge]) {
    edges.sort_by(|a, b| a.length.total_cmp(&b.length));
}

/// [`build_edges`] followed by [`sort_by_length`].
#[must_use]
pub fn sorted_edges(points: &[Point]) -> Vec<Edge> {
    let mut edges = build_edges(points);
    sort_by_length(&mut edges);
    edges
}
