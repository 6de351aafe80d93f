//! Proximity Paths - WASM Module
//!
//! Shortest paths over proximity graphs: vertices are points in 3D space and
//! two vertices are connected when they are at most
//! [`EDGE_THRESHOLD`](graph::EDGE_THRESHOLD) apart. Distances from an origin
//! are produced by Dijkstra's algorithm in finalization order.
//!
//! The crate compiles to WebAssembly and exposes a JavaScript-friendly API
//! via wasm-bindgen; the same types are usable directly from Rust.
//!
//! # Architecture
//!
//! - `graph`: Vertex model, proximity graph (petgraph StableGraph + CSR), Dijkstra
//! - `spatial`: R-tree spatial index for neighbor candidate search
//! - `io`: `name,x,y,z` reader and `name:distance` writer
//! - `config`: Construction and logging options
//! - `logging`: `log` backend for the browser console
//!
//! # Example
//!
//! ```
//! use proximity_paths::graph::{ProximityGraph, Vertex};
//!
//! let graph = ProximityGraph::build(vec![
//!     Vertex::new("A", 0.0, 0.0, 0.0),
//!     Vertex::new("B", 1.0, 0.0, 0.0),
//!     Vertex::new("C", 4.0, 0.0, 0.0),
//! ])
//! .unwrap();
//!
//! let lines: Vec<String> = graph.shortest_paths().map(|r| r.to_string()).collect();
//! assert_eq!(lines, ["B:1.0", "C:4.0"]);
//! ```

use js_sys::{Array, Float64Array};
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod graph;
pub mod io;
pub mod logging;
pub mod spatial;

pub use config::{NeighborSearch, ProximityConfig};
pub use error::ProximityError;

use graph::{Point3, ProximityGraph, Vertex, VertexId};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init(config::LogLevel::default().into());
}

/// Main entry point for JavaScript.
///
/// Wraps an immutable [`ProximityGraph`]; every shortest-path call starts a
/// fresh run, so results can be requested repeatedly.
#[wasm_bindgen]
pub struct ProximityPathsWasm {
    graph: ProximityGraph,
}

#[wasm_bindgen]
impl ProximityPathsWasm {
    /// Build a graph from `name,x,y,z` text. The first record is the origin.
    ///
    /// # Arguments
    ///
    /// * `csv` - Records separated by commas/newlines
    /// * `config` - Optional `{ neighborSearch, logLevel }` object. `logLevel`
    ///   sets the module-wide console level, shared by every graph instance.
    #[wasm_bindgen(constructor)]
    pub fn new(csv: &str, config: JsValue) -> Result<ProximityPathsWasm, JsError> {
        let config = parse_config(config)?;
        let vertices = io::parse_vertices(csv)?;
        Ok(Self::from_vertices(vertices, VertexId(0), &config)?)
    }

    /// Build a graph from parallel arrays of names and positions.
    ///
    /// # Arguments
    ///
    /// * `names` - Array of vertex names
    /// * `positions` - Flat [x0, y0, z0, x1, y1, z1, ...] array
    /// * `origin` - Origin vertex index (defaults to 0)
    /// * `config` - Optional `{ neighborSearch, logLevel }` object, as in the
    ///   constructor
    ///
    /// NaN or infinite positions are rejected with an error.
    #[wasm_bindgen(js_name = fromPoints)]
    pub fn from_points(
        names: Array,
        positions: &[f64],
        origin: Option<u32>,
        config: JsValue,
    ) -> Result<ProximityPathsWasm, JsError> {
        let config = parse_config(config)?;

        let count = names.length() as usize;
        if positions.len() != count * 3 {
            return Err(JsError::new(&format!(
                "expected {} coordinates for {} names, got {}",
                count * 3,
                count,
                positions.len()
            )));
        }

        let mut vertices = Vec::with_capacity(count);
        for (i, name) in names.iter().enumerate() {
            let name = name
                .as_string()
                .ok_or_else(|| JsError::new(&format!("name {i} is not a string")))?;
            let p = &positions[i * 3..i * 3 + 3];
            vertices.push(Vertex::new(name, p[0], p[1], p[2]));
        }

        Ok(Self::from_vertices(
            vertices,
            VertexId(origin.unwrap_or(0)),
            &config,
        )?)
    }

    // =========================================================================
    // Graph Queries
    // =========================================================================

    /// Get the number of vertices.
    #[wasm_bindgen(js_name = vertexCount)]
    pub fn vertex_count(&self) -> u32 {
        self.graph.vertex_count()
    }

    /// Get the number of adjacency entries (two per connected pair).
    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.graph.edge_count()
    }

    /// Get the origin vertex index.
    #[wasm_bindgen(js_name = originId)]
    pub fn origin_id(&self) -> u32 {
        self.graph.origin().0
    }

    /// Get a vertex's name.
    #[wasm_bindgen(js_name = getVertexName)]
    pub fn get_vertex_name(&self, vertex_id: u32) -> Option<String> {
        self.graph
            .vertex(VertexId(vertex_id))
            .map(|v| v.name().to_string())
    }

    /// Get neighbors of a vertex in input order.
    ///
    /// Returns a Uint32Array of neighbor vertex IDs.
    #[wasm_bindgen(js_name = getNeighbors)]
    pub fn get_neighbors(&self, vertex_id: u32) -> Vec<u32> {
        self.graph
            .neighbors(VertexId(vertex_id))
            .iter()
            .map(|id| id.0)
            .collect()
    }

    /// Get the adjacency in CSR format for GPU upload.
    ///
    /// Returns [offsets..., targets...] where offsets has vertex_count + 1 elements.
    #[wasm_bindgen(js_name = getEdgesCsr)]
    pub fn get_edges_csr(&self) -> Vec<u32> {
        self.graph.edges_csr()
    }

    /// Find the first vertex with the given name.
    #[wasm_bindgen(js_name = findVertex)]
    pub fn find_vertex(&self, name: &str) -> Option<u32> {
        self.graph.find_vertex(name).map(|id| id.0)
    }

    /// Find the vertex nearest to a point.
    #[wasm_bindgen(js_name = findNearestVertex)]
    pub fn find_nearest_vertex(&self, x: f64, y: f64, z: f64) -> Option<u32> {
        self.graph
            .nearest_vertex(Point3::new(x, y, z))
            .map(|id| id.0)
    }

    // =========================================================================
    // Shortest Paths
    // =========================================================================

    /// Shortest distances from the origin in finalization order.
    ///
    /// Returns an array of `{ vertex, name, distance }` objects; the origin
    /// and unreachable vertices are omitted.
    #[wasm_bindgen(js_name = shortestPaths)]
    pub fn shortest_paths(&self) -> Result<JsValue, JsError> {
        let records: Vec<_> = self.graph.shortest_paths().collect();
        Ok(serde_wasm_bindgen::to_value(&records)?)
    }

    /// Same as `shortestPaths`, from another origin.
    #[wasm_bindgen(js_name = shortestPathsFrom)]
    pub fn shortest_paths_from(&self, origin: u32) -> Result<JsValue, JsError> {
        let records: Vec<_> = self.graph.shortest_paths_from(VertexId(origin))?.collect();
        Ok(serde_wasm_bindgen::to_value(&records)?)
    }

    /// Shortest distances rendered as `name:distance` lines.
    #[wasm_bindgen(js_name = shortestPathsText)]
    pub fn shortest_paths_text(&self) -> String {
        io::render_paths(self.graph.shortest_paths())
    }

    /// Final distance of every vertex, indexed by vertex ID.
    ///
    /// Unreachable vertices are `Infinity`; the origin is 0.
    pub fn distances(&self) -> Float64Array {
        let distances = self.graph.shortest_paths().into_distances();
        Float64Array::from(&distances[..])
    }
}

impl ProximityPathsWasm {
    /// Build the wrapper from already-parsed vertices.
    pub fn from_vertices(
        vertices: Vec<Vertex>,
        origin: VertexId,
        config: &ProximityConfig,
    ) -> error::Result<Self> {
        let graph = ProximityGraph::build_with_config(vertices, origin, config)?;
        Ok(Self { graph })
    }

    /// The wrapped graph.
    pub fn graph(&self) -> &ProximityGraph {
        &self.graph
    }
}

/// Read an optional JS config object and apply its log level.
///
/// The `log` max level is process-wide, so the most recent config wins for
/// all graphs.
fn parse_config(value: JsValue) -> Result<ProximityConfig, JsError> {
    let config: ProximityConfig = if value.is_undefined() || value.is_null() {
        ProximityConfig::default()
    } else {
        serde_wasm_bindgen::from_value(value)?
    };
    log::set_max_level(config.log_level.into());
    Ok(config)
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    const SAMPLE: &str = "A,0,0,0\nB,1,0,0\nC,4,0,0\nD,100,100,100\n";

    /// Text in, text out: the path a JS caller takes through `new` and
    /// `shortestPathsText`, minus the wasm_bindgen JS types.
    #[test]
    fn test_text_pipeline() {
        let vertices = io::parse_vertices(SAMPLE).unwrap();
        let wasm =
            ProximityPathsWasm::from_vertices(vertices, VertexId(0), &ProximityConfig::default())
                .unwrap();

        assert_eq!(wasm.vertex_count(), 4);
        assert_eq!(wasm.edge_count(), 4);
        assert_eq!(wasm.origin_id(), 0);
        assert_eq!(wasm.shortest_paths_text(), "B:1.0\nC:4.0\n");

        // A second call starts a fresh run.
        assert_eq!(wasm.shortest_paths_text(), "B:1.0\nC:4.0\n");
    }

    #[test]
    fn test_queries() {
        let vertices = io::parse_vertices(SAMPLE).unwrap();
        let wasm =
            ProximityPathsWasm::from_vertices(vertices, VertexId(0), &ProximityConfig::default())
                .unwrap();

        assert_eq!(wasm.get_neighbors(1), vec![0, 2]);
        assert!(wasm.get_neighbors(3).is_empty());
        assert_eq!(wasm.find_vertex("D"), Some(3));
        assert_eq!(wasm.get_vertex_name(2).as_deref(), Some("C"));
        assert_eq!(wasm.get_vertex_name(9), None);
        assert_eq!(wasm.find_nearest_vertex(90.0, 90.0, 90.0), Some(3));
        assert_eq!(wasm.get_edges_csr(), wasm.graph().edges_csr());
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let vertices = io::parse_vertices("").unwrap();
        let result =
            ProximityPathsWasm::from_vertices(vertices, VertexId(0), &ProximityConfig::default());
        assert_eq!(result.err(), Some(ProximityError::EmptyInput));
    }

    #[test]
    fn test_non_finite_position_is_rejected() {
        let vertices = vec![
            Vertex::new("A", 0.0, 0.0, 0.0),
            Vertex::new("B", f64::NAN, 0.0, 0.0),
        ];
        let result =
            ProximityPathsWasm::from_vertices(vertices, VertexId(0), &ProximityConfig::default());
        assert!(matches!(
            result.err(),
            Some(ProximityError::NonFiniteCoordinate { vertex: VertexId(1), field: "x", .. })
        ));
    }

    /// A larger cloud through both neighbor search strategies.
    #[test]
    fn test_grid_with_spatial_index() {
        let mut csv = String::new();
        for i in 0..10 {
            for j in 0..10 {
                csv.push_str(&format!("p{i}_{j},{},{},0\n", i as f64 * 2.5, j as f64 * 2.5));
            }
        }
        let vertices = io::parse_vertices(&csv).unwrap();

        let brute = ProximityPathsWasm::from_vertices(
            vertices.clone(),
            VertexId(0),
            &ProximityConfig::default(),
        )
        .unwrap();
        let indexed = ProximityPathsWasm::from_vertices(
            vertices,
            VertexId(0),
            &ProximityConfig {
                neighbor_search: NeighborSearch::SpatialIndex,
                ..ProximityConfig::default()
            },
        )
        .unwrap();

        // Spacing 2.5: axis neighbors connect, diagonals (~3.54) do not.
        assert_eq!(brute.edge_count(), 2 * (2 * 10 * 9));
        assert_eq!(brute.get_edges_csr(), indexed.get_edges_csr());

        let text = brute.shortest_paths_text();
        assert_eq!(text, indexed.shortest_paths_text());
        assert_eq!(text.lines().count(), 99);

        let corner = brute.graph().find_vertex("p9_9").unwrap();
        let distances = brute.graph().shortest_paths().into_distances();
        assert_eq!(distances[corner.index()], 45.0);
    }
}
