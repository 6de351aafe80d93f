//! Proximity graph data structures and the shortest-path engine.
//!
//! Vertices are immutable named points; two vertices are adjacent when they
//! are at most [`EDGE_THRESHOLD`] apart. Shortest-path runs keep their own
//! per-vertex state, so a built graph can be queried any number of times.

mod dijkstra;
mod proximity;
mod vertex;

pub use dijkstra::{PathRecord, ShortestPaths};
pub use proximity::ProximityGraph;
pub use vertex::{
    edge_weight_via, euclidean_distance, within_threshold, Phase, Point3, Vertex, VertexId,
    VertexState, EDGE_THRESHOLD,
};
