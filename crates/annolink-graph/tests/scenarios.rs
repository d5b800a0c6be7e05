//! Integration tests: selection behaviour on whole frames.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use annolink_graph::{
    AcceptedConnection, ConnectionSelector, ConnectionStrategy, ConnectorConfig, DistanceRange,
    Frame, NodeIdentity, PlanarMapper, Point, Point3D, SpatialMapper, build_edges, build_mst,
    select_connections,
};

/// Mapper whose real distance is looked up per unordered pair of view
/// points, ignoring the projected positions.
struct PairDistances {
    pairs: Vec<(Point, Point, f64)>,
}

impl SpatialMapper for PairDistances {
    fn project(&self, point: Point) -> Option<Point3D> {
        Some(Point3D::new(point.x, point.y, 0.0))
    }

    fn real_distance(&self, a: Point3D, b: Point3D) -> f64 {
        let (a, b) = (Point::new(a.x, a.y), Point::new(b.x, b.y));
        self.pairs
            .iter()
            .find(|(p, q, _)| (*p == a && *q == b) || (*p == b && *q == a))
            .map_or(f64::INFINITY, |(_, _, d)| *d)
    }
}

fn pairs(connections: &[AcceptedConnection]) -> Vec<(usize, usize)> {
    connections.iter().map(|c| (c.a_index, c.b_index)).collect()
}

fn degrees(point_count: usize, connections: &[AcceptedConnection]) -> Vec<usize> {
    let mut degree = vec![0; point_count];
    for c in connections {
        degree[c.a_index] += 1;
        degree[c.b_index] += 1;
    }
    degree
}

/// A jittered 6x5 grid, 40 view points apart, plus a few strays.
fn cluttered_points() -> Vec<Point> {
    let mut points = Vec::new();
    for row in 0..5_i32 {
        for col in 0..6_i32 {
            let jitter = f64::from((row * 7 + col * 3) % 5) - 2.0;
            points.push(Point::new(
                f64::from(col).mul_add(40.0, jitter),
                f64::from(row).mul_add(40.0, -jitter),
            ));
        }
    }
    points.extend([
        Point::new(13.0, 77.0),
        Point::new(181.0, 9.0),
        Point::new(95.0, 133.0),
    ]);
    points
}

#[test]
fn triangle_keeps_axis_aligned_sides() {
    let p = [
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(0.0, 10.0),
    ];
    let mapper = PairDistances {
        pairs: vec![
            (p[0], p[1], 100.0),
            (p[0], p[2], 100.0),
            (p[1], p[2], 141.0),
        ],
    };
    let config = ConnectorConfig::from_fields("5", "50", "150").unwrap();
    let connections = select_connections(&p, &config, &mapper);

    assert_eq!(pairs(&connections), vec![(0, 1), (0, 2)]);
    for c in &connections {
        assert!((c.distance_mm - 100.0).abs() < f64::EPSILON);
        assert!(c.angle_degrees.abs() < 1e-9);
        assert_eq!(c.label(), "100, 0°");
    }
}

#[test]
fn saturated_point_is_skipped_for_later_edges() {
    // Four short axis-aligned spokes fill the hub; a fifth, equally
    // favourable spoke further out must be refused.
    let points = [
        Point::new(0.0, 0.0),
        Point::new(60.0, 0.0),
        Point::new(-60.0, 0.0),
        Point::new(0.0, 60.0),
        Point::new(0.0, -60.0),
        Point::new(120.0, 0.0),
    ];
    let config = ConnectorConfig::default();
    let connections = select_connections(&points, &config, &PlanarMapper::new(0.001));
    assert_eq!(degrees(points.len(), &connections)[0], 4);
    assert!(connections.iter().all(|c| (c.a_index, c.b_index) != (0, 5)));
    // The far spoke still connects to its neighbour on the axis.
    assert!(connections.iter().any(|c| (c.a_index, c.b_index) == (1, 5)));
}

#[test]
fn unprojectable_shortest_edge_gives_way_to_next() {
    let points = [
        Point::new(0.0, 0.0),
        Point::new(60.0, 0.0),
        Point::new(0.0, 90.0),
    ];
    let blind = points[1];
    let mapper =
        move |p: Point| (p != blind).then(|| Point3D::new(p.x / 1000.0, p.y / 1000.0, 0.0));
    let connections = select_connections(&points, &ConnectorConfig::default(), &mapper);
    assert_eq!(pairs(&connections), vec![(0, 2)]);
}

#[test]
fn square_drops_diagonals() {
    let p = [
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(100.0, 100.0),
        Point::new(0.0, 100.0),
    ];
    let connections = select_connections(
        &p,
        &ConnectorConfig::default(),
        &PlanarMapper::new(0.001),
    );
    let mut got = pairs(&connections);
    got.sort_unstable();
    assert_eq!(got, vec![(0, 1), (0, 3), (1, 2), (2, 3)]);
    assert_eq!(degrees(p.len(), &connections), vec![2, 2, 2, 2]);
}

#[test]
fn lone_point_and_empty_frame_select_nothing() {
    let mapper = PlanarMapper::new(0.001);
    let config = ConnectorConfig::default();
    assert!(select_connections(&[], &config, &mapper).is_empty());
    assert!(select_connections(&[Point::new(3.0, 4.0)], &config, &mapper).is_empty());
}

#[test]
fn accepted_connections_honour_every_filter() {
    let points = cluttered_points();
    let mapper = PlanarMapper::new(0.0015);
    for (angle, min, max, cap) in [
        (5.0, 50.0, 150.0, 4),
        (10.0, 0.0, 80.0, 2),
        (1.0, 55.0, 65.0, 3),
        (45.0, 0.0, 1000.0, 1),
    ] {
        let config = ConnectorConfig {
            max_degree: cap,
            angle_range_degrees: angle,
            real_distance_range: DistanceRange::new(min, max),
            ..ConnectorConfig::default()
        };
        let connections = select_connections(&points, &config, &mapper);

        assert!(degrees(points.len(), &connections).iter().all(|&d| d <= cap));
        for c in &connections {
            assert!(c.a_index < c.b_index);
            assert!(c.distance_mm >= min && c.distance_mm <= max);
            assert!(c.angle_degrees <= angle + 1e-9);
        }
        for window in connections.windows(2) {
            assert!(window[0].a.distance(window[0].b) <= window[1].a.distance(window[1].b));
        }
    }
}

#[test]
fn selection_is_deterministic() {
    let points = cluttered_points();
    let mapper = PlanarMapper::new(0.0015);
    for strategy in [ConnectionStrategy::DegreeCapped, ConnectionStrategy::SpanningTree] {
        let config = ConnectorConfig {
            strategy,
            ..ConnectorConfig::default()
        };
        let first = strategy.select(&points, &config, &mapper);
        let second = strategy.select(&points, &config, &mapper);
        assert_eq!(first, second);
    }
}

#[test]
fn wider_angle_never_accepts_fewer_on_sparse_input() {
    // Two separated pairs: no degree competition, so only the filters decide.
    let points = [
        Point::new(0.0, 0.0),
        Point::new(100.0, 3.0),
        Point::new(500.0, 500.0),
        Point::new(506.0, 600.0),
    ];
    let mapper = PlanarMapper::new(0.001);
    let narrow = ConnectorConfig::from_fields("1", "50", "150").unwrap();
    let wide = ConnectorConfig::from_fields("5", "50", "150").unwrap();
    assert!(select_connections(&points, &narrow, &mapper).is_empty());
    assert_eq!(
        pairs(&select_connections(&points, &wide, &mapper)),
        vec![(0, 1), (2, 3)],
    );
}

#[test]
fn spanning_tree_matches_standalone_mst() {
    let points = cluttered_points();
    let config = ConnectorConfig {
        strategy: ConnectionStrategy::SpanningTree,
        identity: NodeIdentity::ByIndex,
        ..ConnectorConfig::default()
    };
    let selection = config
        .strategy
        .select(&points, &config, &PlanarMapper::new(0.001));
    let tree = build_mst(&points, &build_edges(&points), NodeIdentity::ByIndex);

    assert_eq!(selection.connections.len(), points.len() - 1);
    assert_eq!(
        pairs(&selection.connections),
        tree.iter().map(|e| (e.a_index, e.b_index)).collect::<Vec<_>>(),
    );
}

#[test]
fn duplicate_detections_share_degree_budget() {
    // The same object reported twice lands on one node by value.
    let points = [
        Point::new(0.0, 0.0),
        Point::new(0.0, 0.0),
        Point::new(100.0, 0.0),
        Point::new(0.0, 100.0),
        Point::new(-100.0, 0.0),
    ];
    let config = ConnectorConfig {
        max_degree: 2,
        ..ConnectorConfig::default()
    };
    let connections = select_connections(&points, &config, &PlanarMapper::new(0.001));
    let origin = Point::new(0.0, 0.0);
    let at_origin = connections
        .iter()
        .filter(|c| c.a == origin || c.b == origin)
        .count();
    assert_eq!(at_origin, 2);

    let by_index = ConnectorConfig {
        identity: NodeIdentity::ByIndex,
        ..config
    };
    let connections = select_connections(&points, &by_index, &PlanarMapper::new(0.001));
    assert!(connections.len() > 2);
}

#[test]
fn recorded_frame_replays() {
    let json = r#"{
        "view": {"width": 1000.0, "height": 1000.0},
        "detections": [
            {"label": "screw", "confidence": 0.9,
             "bounding_box": {"x": 0.1, "y": 0.8, "width": 0.1, "height": 0.1}},
            {"label": "screw", "confidence": 0.8,
             "bounding_box": {"x": 0.2, "y": 0.8, "width": 0.1, "height": 0.1}},
            {"label": "washer", "confidence": 0.7,
             "bounding_box": {"x": 0.6, "y": 0.1, "width": 0.1, "height": 0.1}}
        ],
        "world": [
            {"x": 0.0, "y": 0.0, "z": -0.5},
            {"x": 0.08, "y": 0.0, "z": -0.5},
            null
        ]
    }"#;
    let frame: Frame = serde_json::from_str(json).unwrap();
    let points = frame.points().unwrap();
    let mapper = frame.lookup_mapper().unwrap().expect("frame has a world table");

    let selection = ConnectionStrategy::DegreeCapped.select(
        &points,
        &ConnectorConfig::default(),
        &mapper,
    );
    assert_eq!(pairs(&selection.connections), vec![(0, 1)]);
    assert!((selection.connections[0].distance_mm - 80.0).abs() < 1e-9);
    assert_eq!(selection.stats.rejected_projection, 2);
}
