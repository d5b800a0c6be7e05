//! Minimum spanning tree over the candidate edges (Kruskal).

use crate::disjoint_set::DisjointSetForest;
use crate::edges::sort_by_length;
use crate::nodes::NodeKeys;
use crate::types::{Edge, NodeIdentity, Point};

/// Build a minimum spanning tree of `points` from `edges`.
///
/// Edges are sorted by ascending length (stable) and accepted whenever
/// they join two different components. Endpoints are resolved to nodes
/// under `identity`, so with [`NodeIdentity::ByValue`] coincident points
/// form a single node and the tree has `distinct - 1` edges.
#[must_use]
pub fn build_mst(points: &[Point], edges: &[Edge], identity: NodeIdentity) -> Vec<Edge> {
    let nodes = NodeKeys::assign(points, identity);
    let mut sorted = edges.to_vec();
    sort_by_length(&mut sorted);
    kruskal(&sorted, &nodes)
}

/// Kruskal over edges that are already sorted by length.
///
/// Stops once `node_count - 1` edges are accepted or the edges run out.
pub(crate) fn kruskal(sorted: &[Edge], nodes: &NodeKeys) -> Vec<Edge> {
    let node_count = nodes.node_count();
    if node_count <= 1 {
        return Vec::new();
    }

    let mut forest = DisjointSetForest::new(node_count);
    let mut tree = Vec::with_capacity(node_count - 1);

    for edge in sorted {
        let u = nodes.node(edge.a_index);
        let v = nodes.node(edge.b_index);
        if forest.union(u, v) {
            tree.push(*edge);
            if forest.component_count() == 1 {
                break;
            }
        }
    }

    tree
}
