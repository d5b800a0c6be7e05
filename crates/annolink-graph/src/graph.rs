//! Accepted connections viewed as a `petgraph` graph.

use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::nodes::NodeKeys;
use crate::types::{AcceptedConnection, NodeIdentity, Point};

/// Build an undirected graph of the accepted connections.
///
/// Nodes are keyed exactly as during selection (`identity`), so node `i`
/// of the returned graph carries the position of the first input point
/// mapped to node `i`. Edge weights are real distances in millimetres.
#[must_use]
pub fn connection_graph(
    points: &[Point],
    connections: &[AcceptedConnection],
    identity: NodeIdentity,
) -> UnGraph<Point, f64> {
    let nodes = NodeKeys::assign(points, identity);
    let mut graph = UnGraph::with_capacity(nodes.node_count(), connections.len());

    for node in 0..nodes.node_count() {
        let position = nodes
            .representative(node)
            .map_or(Point::new(0.0, 0.0), |index| points[index]);
        graph.add_node(position);
    }

    for connection in connections {
        let u = NodeIndex::new(nodes.node(connection.a_index));
        let v = NodeIndex::new(nodes.node(connection.b_index));
        graph.add_edge(u, v, connection.distance_mm);
    }

    graph
}

/// Number of connected components, counting isolated nodes.
#[must_use]
pub fn component_count(graph: &UnGraph<Point, f64>) -> usize {
    connected_components(graph)
}

/// Largest node degree in the graph (self-loops count twice).
#[must_use]
pub fn max_degree(graph: &UnGraph<Point, f64>) -> usize {
    graph
        .node_indices()
        .map(|node| degree(graph, node))
        .max()
        .unwrap_or(0)
}

/// Degree of `node`, counting a self-loop twice.
#[must_use]
pub fn degree(graph: &UnGraph<Point, f64>, node: NodeIndex) -> usize {
    graph
        .edges(node)
        .map(|edge| if edge.source() == edge.target() { 2 } else { 1 })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection(a_index: usize, b_index: usize, points: &[Point]) -> AcceptedConnection {
        AcceptedConnection {
            a_index,
            b_index,
            a: points[a_index],
            b: points[b_index],
            distance_mm: 100.0,
            angle_degrees: 0.0,
        }
    }

    #[test]
    fn empty_graph() {
        let graph = connection_graph(&[], &[], NodeIdentity::ByValue);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(component_count(&graph), 0);
        assert_eq!(max_degree(&graph), 0);
    }

    #[test]
    fn counts_components_and_degrees() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(50.0, 50.0),
        ];
        let connections = [connection(0, 1, &points), connection(1, 2, &points)];
        let graph = connection_graph(&points, &connections, NodeIdentity::ByIndex);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(component_count(&graph), 2);
        assert_eq!(max_degree(&graph), 2);
        assert_eq!(degree(&graph, NodeIndex::new(3)), 0);
        assert_eq!(graph[NodeIndex::new(2)], Point::new(20.0, 0.0));
    }

    #[test]
    fn duplicates_share_a_node_by_value() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        let connections = [connection(0, 1, &points), connection(2, 1, &points)];
        let graph = connection_graph(&points, &connections, NodeIdentity::ByValue);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(degree(&graph, NodeIndex::new(0)), 2);
    }
}
