//! Single-source shortest paths over a [`ProximityGraph`].
//!
//! # Algorithm
//!
//! Dijkstra's algorithm with a binary min-heap and lazy deletion:
//! 1. The origin starts queued at distance 0.
//! 2. Pop the smallest entry. Entries for finalized vertices, or entries
//!    whose distance is above the vertex's current best, are stale and
//!    skipped.
//! 3. Finalize the popped vertex and yield it (unless it is the origin).
//! 4. For each neighbor in adjacency order, compute the relaxation
//!    candidate. Unvisited neighbors are queued; queued neighbors that
//!    improve get a fresh heap entry; finalized neighbors are left alone.
//!
//! Heap entries carry an insertion sequence number, so vertices at equal
//! distance are finalized first-in, first-out.
//!
//! All run state lives in [`ShortestPaths`]; the graph is only borrowed, so
//! any number of runs can share it.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::iter::FusedIterator;

use ordered_float::OrderedFloat;
use serde::Serialize;

use super::proximity::ProximityGraph;
use super::vertex::{edge_weight_via, Phase, VertexId, VertexState};

/// A finalized vertex and its shortest distance from the origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathRecord {
    pub vertex: VertexId,
    pub name: String,
    pub distance: f64,
}

impl fmt::Display for PathRecord {
    /// Renders as `name:distance`, keeping `.0` on integral distances.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:?}", self.name, self.distance)
    }
}

type HeapEntry = Reverse<(OrderedFloat<f64>, u64, VertexId)>;

/// A lazy shortest-path run.
///
/// Yields one [`PathRecord`] per reachable vertex, in finalization order,
/// origin excluded. Distances are non-decreasing.
pub struct ShortestPaths<'g> {
    graph: &'g ProximityGraph,
    origin: VertexId,
    states: Vec<VertexState>,
    heap: BinaryHeap<HeapEntry>,
    sequence: u64,
    finalized: u32,
    exhausted: bool,
}

impl<'g> ShortestPaths<'g> {
    /// Fresh run state for `origin`. The caller guarantees the id is valid.
    pub(crate) fn new(graph: &'g ProximityGraph, origin: VertexId) -> Self {
        let mut states = vec![VertexState::unvisited(); graph.vertex_count() as usize];
        states[origin.index()] = VertexState::origin();

        let mut run = Self {
            graph,
            origin,
            states,
            heap: BinaryHeap::new(),
            sequence: 0,
            finalized: 0,
            exhausted: false,
        };
        run.push(origin, 0.0);
        run
    }

    /// The vertex this run measures from.
    pub fn origin(&self) -> VertexId {
        self.origin
    }

    /// Current best distance of a vertex (`+inf` if not reached yet).
    pub fn distance(&self, id: VertexId) -> Option<f64> {
        self.states.get(id.index()).map(|s| s.best_distance())
    }

    /// Whether the vertex's distance is final.
    pub fn is_finalized(&self, id: VertexId) -> bool {
        self.states
            .get(id.index())
            .is_some_and(|s| s.is_finalized())
    }

    /// Run to completion and return every vertex's final distance.
    ///
    /// Unreachable vertices are `+inf`; the origin is 0.
    pub fn into_distances(mut self) -> Vec<f64> {
        self.by_ref().for_each(drop);
        self.states.iter().map(|s| s.best_distance()).collect()
    }

    fn push(&mut self, id: VertexId, distance: f64) {
        self.heap
            .push(Reverse((OrderedFloat(distance), self.sequence, id)));
        self.sequence += 1;
    }

    /// Pop entries until one names a vertex that can be finalized.
    fn pop_live(&mut self) -> Option<VertexId> {
        while let Some(Reverse((OrderedFloat(distance), _, id))) = self.heap.pop() {
            let state = self.states[id.index()];
            if state.is_finalized() || distance > state.best_distance() {
                continue;
            }
            return Some(id);
        }
        None
    }

    /// Relax every neighbor of a freshly finalized vertex.
    fn expand(&mut self, id: VertexId) {
        let graph = self.graph;
        let vertices = graph.vertices();
        let from = &vertices[id.index()];
        let base = self.states[id.index()].best_distance();

        for &n in graph.neighbors(id) {
            let Some(candidate) = edge_weight_via(&vertices[n.index()], from, base) else {
                continue;
            };

            let state = &mut self.states[n.index()];
            let improved = match state.phase() {
                Phase::Unvisited => state.enqueue(candidate),
                Phase::Queued => state.relax(candidate),
                Phase::Finalized => false,
            };

            if improved {
                log::trace!("{} -> {}: {}", id, n, candidate);
                self.push(n, candidate);
            }
        }
    }
}

impl Iterator for ShortestPaths<'_> {
    type Item = PathRecord;

    fn next(&mut self) -> Option<PathRecord> {
        while let Some(id) = self.pop_live() {
            self.states[id.index()].finalize();
            self.finalized += 1;
            self.expand(id);

            if id == self.origin {
                continue;
            }

            let vertex = &self.graph.vertices()[id.index()];
            return Some(PathRecord {
                vertex: id,
                name: vertex.name().to_string(),
                distance: self.states[id.index()].best_distance(),
            });
        }

        if !self.exhausted {
            self.exhausted = true;
            log::debug!(
                "shortest paths from {}: {} of {} vertices reached",
                self.origin,
                self.finalized,
                self.states.len()
            );
        }
        None
    }
}

impl FusedIterator for ShortestPaths<'_> {}
