//! ProximityGraph - implicit distance-threshold graph over 3D points.
//!
//! Topology is stored in petgraph's StableGraph (one directed edge per
//! adjacent ordered pair, weighted by the straight-line distance), and
//! snapshotted into CSR (offsets + targets) arrays so that each vertex's
//! neighbor list can be walked in input order without allocation.

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Directed;

use super::dijkstra::ShortestPaths;
use super::vertex::{euclidean_distance, within_threshold, Point3, Vertex, VertexId, EDGE_THRESHOLD};
use crate::config::{NeighborSearch, ProximityConfig};
use crate::error::{ProximityError, Result};
use crate::spatial::SpatialIndex;

/// Extra radius for R-tree candidate queries. Candidates are confirmed with
/// the exact `distance <= EDGE_THRESHOLD` test, so the slack only has to
/// cover rounding between `sqrt(d²) <= r` and `d² <= r²`.
const SEARCH_SLACK: f64 = 1e-9;

/// Immutable proximity graph.
///
/// This struct owns:
/// - The vertices, indexed by [`VertexId`]
/// - Graph topology via petgraph
/// - CSR adjacency in input order
/// - Spatial index over vertex coordinates
/// - The designated origin
pub struct ProximityGraph {
    /// Nodes store their VertexId, edges store the static distance.
    graph: StableGraph<VertexId, f64, Directed>,

    vertices: Vec<Vertex>,

    origin: VertexId,

    /// CSR offsets, vertex_count + 1 entries.
    offsets: Vec<u32>,

    /// CSR targets; `targets[offsets[v]..offsets[v + 1]]` are v's neighbors.
    targets: Vec<VertexId>,

    spatial: SpatialIndex,
}

impl ProximityGraph {
    /// Build a graph whose origin is the first vertex.
    pub fn build(vertices: Vec<Vertex>) -> Result<Self> {
        Self::build_with_origin(vertices, VertexId(0))
    }

    /// Build a graph with an explicit origin.
    pub fn build_with_origin(vertices: Vec<Vertex>, origin: VertexId) -> Result<Self> {
        Self::build_with_config(vertices, origin, &ProximityConfig::default())
    }

    /// Build a graph with an explicit origin and configuration.
    ///
    /// # Errors
    ///
    /// * [`ProximityError::EmptyInput`] if `vertices` is empty
    /// * [`ProximityError::UnknownVertex`] if `origin` is out of range
    /// * [`ProximityError::NonFiniteCoordinate`] if any coordinate is NaN or infinite
    pub fn build_with_config(
        vertices: Vec<Vertex>,
        origin: VertexId,
        config: &ProximityConfig,
    ) -> Result<Self> {
        if vertices.is_empty() {
            return Err(ProximityError::EmptyInput);
        }
        if origin.index() >= vertices.len() {
            return Err(ProximityError::UnknownVertex(origin));
        }
        for (i, vertex) in vertices.iter().enumerate() {
            if let Some((field, value)) = vertex.position().non_finite_component() {
                return Err(ProximityError::NonFiniteCoordinate {
                    vertex: VertexId(i as u32),
                    field,
                    value,
                });
            }
        }

        let points: Vec<_> = vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId(i as u32), v.position()))
            .collect();
        let spatial = SpatialIndex::from_points(&points);

        let neighbor_lists = match config.neighbor_search {
            NeighborSearch::AllPairs => all_pairs_neighbors(&vertices),
            NeighborSearch::SpatialIndex => indexed_neighbors(&vertices, &spatial),
        };

        let edge_count: usize = neighbor_lists.iter().map(Vec::len).sum();
        let mut graph = StableGraph::with_capacity(vertices.len(), edge_count);
        for i in 0..vertices.len() {
            graph.add_node(VertexId(i as u32));
        }
        for (v, neighbors) in neighbor_lists.iter().enumerate() {
            for &n in neighbors {
                let weight = euclidean_distance(&vertices[v], &vertices[n.index()]);
                graph.add_edge(NodeIndex::new(v), NodeIndex::new(n.index()), weight);
            }
        }

        let (offsets, targets) = csr_from_graph(&graph);

        log::debug!(
            "built proximity graph: {} vertices, {} adjacency entries, origin {} ({:?})",
            vertices.len(),
            targets.len(),
            origin,
            config.neighbor_search
        );

        Ok(Self {
            graph,
            vertices,
            origin,
            offsets,
            targets,
            spatial,
        })
    }

    // =========================================================================
    // Vertex Access
    // =========================================================================

    /// The designated origin.
    pub fn origin(&self) -> VertexId {
        self.origin
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Get a vertex by id.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index())
    }

    /// All vertices in input order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Id of the first vertex with the given name.
    pub fn find_vertex(&self, name: &str) -> Option<VertexId> {
        self.vertices
            .iter()
            .position(|v| v.name() == name)
            .map(|i| VertexId(i as u32))
    }

    /// Id of the vertex closest to `point`.
    pub fn nearest_vertex(&self, point: Point3) -> Option<VertexId> {
        self.spatial.nearest(point)
    }

    // =========================================================================
    // Adjacency
    // =========================================================================

    /// Get the number of adjacency entries.
    ///
    /// Each adjacent pair is stored once per side, so this is twice the
    /// number of undirected edges.
    pub fn edge_count(&self) -> u32 {
        self.graph.edge_count() as u32
    }

    /// Neighbors of a vertex in input order. Empty for unknown ids.
    pub fn neighbors(&self, id: VertexId) -> &[VertexId] {
        let i = id.index();
        if i >= self.vertices.len() {
            return &[];
        }
        let start = self.offsets[i] as usize;
        let end = self.offsets[i + 1] as usize;
        &self.targets[start..end]
    }

    /// Static distance between two adjacent vertices, `None` if not adjacent.
    pub fn edge_weight(&self, from: VertexId, to: VertexId) -> Option<f64> {
        if from.index() >= self.vertices.len() || to.index() >= self.vertices.len() {
            return None;
        }
        self.graph
            .find_edge(NodeIndex::new(from.index()), NodeIndex::new(to.index()))
            .and_then(|e| self.graph.edge_weight(e))
            .copied()
    }

    /// Get the adjacency in CSR format.
    ///
    /// Returns [offsets..., targets...] where offsets has vertex_count + 1 elements.
    pub fn edges_csr(&self) -> Vec<u32> {
        let mut result = Vec::with_capacity(self.offsets.len() + self.targets.len());
        result.extend_from_slice(&self.offsets);
        result.extend(self.targets.iter().map(|id| id.0));
        result
    }

    // =========================================================================
    // Shortest Paths
    // =========================================================================

    /// Start a shortest-path run from the graph's origin.
    pub fn shortest_paths(&self) -> ShortestPaths<'_> {
        ShortestPaths::new(self, self.origin)
    }

    /// Start a shortest-path run from any vertex.
    pub fn shortest_paths_from(&self, origin: VertexId) -> Result<ShortestPaths<'_>> {
        if origin.index() >= self.vertices.len() {
            return Err(ProximityError::UnknownVertex(origin));
        }
        Ok(ShortestPaths::new(self, origin))
    }
}

/// Test every ordered pair against the cutoff.
fn all_pairs_neighbors(vertices: &[Vertex]) -> Vec<Vec<VertexId>> {
    vertices
        .iter()
        .enumerate()
        .map(|(v, vertex)| {
            vertices
                .iter()
                .enumerate()
                .filter(|&(n, other)| n != v && within_threshold(other, vertex))
                .map(|(n, _)| VertexId(n as u32))
                .collect()
        })
        .collect()
}

/// Ask the R-tree for candidates, confirm exactly, restore input order.
fn indexed_neighbors(vertices: &[Vertex], spatial: &SpatialIndex) -> Vec<Vec<VertexId>> {
    vertices
        .iter()
        .enumerate()
        .map(|(v, vertex)| {
            let mut neighbors: Vec<_> = spatial
                .in_radius(vertex.position(), EDGE_THRESHOLD + SEARCH_SLACK)
                .into_iter()
                .filter(|&n| n.index() != v && within_threshold(&vertices[n.index()], vertex))
                .collect();
            neighbors.sort_unstable();
            neighbors
        })
        .collect()
}

/// Snapshot the graph's outgoing edges into CSR arrays.
///
/// Edges are visited in insertion order, so each vertex's targets keep the
/// order they were added in.
fn csr_from_graph(graph: &StableGraph<VertexId, f64, Directed>) -> (Vec<u32>, Vec<VertexId>) {
    let node_count = graph.node_count();
    let edge_count = graph.edge_count();

    let mut offsets = vec![0u32; node_count + 1];
    let mut targets = vec![VertexId(0); edge_count];

    // Count edges per vertex
    for node_index in graph.node_indices() {
        offsets[node_index.index() + 1] = graph.edges(node_index).count() as u32;
    }

    // Prefix sum
    for i in 1..=node_count {
        offsets[i] += offsets[i - 1];
    }

    let mut cursor = offsets[..node_count].to_vec();
    for edge in graph.edge_references() {
        let source = edge.source().index();
        let slot = cursor[source] as usize;
        targets[slot] = VertexId(edge.target().index() as u32);
        cursor[source] += 1;
    }

    (offsets, targets)
}
