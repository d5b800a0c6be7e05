//! Per-pass node keys: which input points count as the same graph node.
//!
//! Degree counters and union-find slots are indexed by node id rather
//! than by point value, so every strategy resolves endpoints the same
//! way and duplicate coordinates never need a first-match lookup.

use std::collections::HashMap;

use crate::types::{NodeIdentity, Point};

/// Bit-exact coordinate key.
///
/// `-0.0` is folded into `0.0` so that points which compare equal also
/// hash equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CoordKey {
    x_bits: u64,
    y_bits: u64,
}

impl CoordKey {
    pub(crate) fn from_point(p: Point) -> Self {
        Self {
            x_bits: (p.x + 0.0).to_bits(),
            y_bits: (p.y + 0.0).to_bits(),
        }
    }
}

/// Mapping from input point index to node id for one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeKeys {
    /// `node_of[point_index]` is the node id of that point.
    node_of: Vec<usize>,
    /// `representatives[node]` is the first input index mapped to `node`.
    representatives: Vec<usize>,
}

impl NodeKeys {
    /// Assign node ids to `points` under the given identity policy.
    ///
    /// Node ids are dense and numbered in order of first appearance.
    #[must_use]
    pub fn assign(points: &[Point], identity: NodeIdentity) -> Self {
        match identity {
            NodeIdentity::ByIndex => Self {
                node_of: (0..points.len()).collect(),
                representatives: (0..points.len()).collect(),
            },
            NodeIdentity::ByValue => {
                let mut seen = HashMap::<CoordKey, usize>::with_capacity(points.len());
                let mut node_of = Vec::with_capacity(points.len());
                let mut representatives = Vec::new();
                for (index, &point) in points.iter().enumerate() {
                    let node = *seen.entry(CoordKey::from_point(point)).or_insert_with(|| {
                        representatives.push(index);
                        representatives.len() - 1
                    });
                    node_of.push(node);
                }
                Self {
                    node_of,
                    representatives,
                }
            }
        }
    }

    /// Node id of the point at `point_index`.
    ///
    /// # Panics
    ///
    /// Panics if `point_index` is out of range for the assigned points.
    #[must_use]
    pub fn node(&self, point_index: usize) -> usize {
        self.node_of[point_index]
    }

    /// First input index that maps to `node`.
    #[must_use]
    pub fn representative(&self, node: usize) -> Option<usize> {
        self.representatives.get(node).copied()
    }

    /// Number of distinct nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.representatives.len()
    }
}
