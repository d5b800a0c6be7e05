//! annolink-graph: Constrained connection graphs over detected points (sans-IO).
//!
//! Given the view-space centers of detected objects, selects which pairs
//! to connect with measured annotation lines:
//! candidate edges -> shortest-first ordering -> per-edge filtering
//! (degree cap, 3D projection, real-world distance, axis alignment).
//!
//! This crate has **no I/O dependencies**. Projection into the tracking
//! frame is injected through [`SpatialMapper`]; rendering and file
//! handling live in `annolink-export` and `annolink-bench`.

pub mod detection;
pub mod diagnostics;
pub mod disjoint_set;
pub mod edges;
pub mod frame;
pub mod geometry;
pub mod graph;
pub mod mst;
mod nodes;
pub mod select;
pub mod session;
pub mod spatial;
pub mod types;

pub use detection::{Detection, NormalizedRect, ViewRect, detection_centers};
pub use diagnostics::{Clock, SelectionDiagnostics, SystemClock, select_with_diagnostics};
pub use disjoint_set::DisjointSetForest;
pub use edges::{build_edges, sort_by_length, sorted_edges};
pub use frame::Frame;
pub use geometry::{Axis, AxisDeviation, angular_deviation, distance_2d};
pub use mst::build_mst;
pub use select::{
    ConnectionSelector, ConnectionStrategy, Selection, SelectionStats, select_connections,
};
pub use session::{Connector, FrameResult, LatestFrame, PassTicket, SharedConfig};
pub use spatial::{LookupMapper, METRES_TO_MILLIMETRES, PlanarMapper, SpatialMapper};
pub use types::{
    AcceptedConnection, ConnectorConfig, ConnectorError, DistanceRange, Edge, NodeIdentity,
    Point, Point3D, ViewSize,
};
