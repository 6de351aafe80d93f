//! Vertex type and related structures.
//!
//! Vertices are points in 3D space. Each vertex has:
//! - A dense identifier (its position in the input order)
//! - A name, unique by convention but not enforced
//! - Immutable coordinates (x, y, z)
//!
//! Shortest-path bookkeeping (best distance, queued/finalized) lives in a
//! separate [`VertexState`] owned by each run, so one set of vertices can be
//! shared by any number of runs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum Euclidean distance at which two vertices are connected.
pub const EDGE_THRESHOLD: f64 = 3.0;

/// Dense vertex identifier.
///
/// Ids are assigned in input order when a graph is built, so `VertexId(0)`
/// is the first vertex handed to the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub u32);

impl VertexId {
    /// Create a new VertexId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Get the id as a slot index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vertex({})", self.0)
    }
}

impl From<u32> for VertexId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<VertexId> for u32 {
    #[inline]
    fn from(id: VertexId) -> Self {
        id.0
    }
}

/// A point in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared Euclidean distance to another point.
    #[inline]
    pub fn distance_squared(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point3) -> f64 {
        self.distance_squared(other).sqrt()
    }

    #[inline]
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// True when no component is NaN or infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// First component that is NaN or infinite, as `(axis, value)`.
    pub fn non_finite_component(&self) -> Option<(&'static str, f64)> {
        [("x", self.x), ("y", self.y), ("z", self.z)]
            .into_iter()
            .find(|(_, value)| !value.is_finite())
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// A named point. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    name: String,
    position: Point3,
}

impl Vertex {
    /// Create a vertex at (x, y, z).
    pub fn new(name: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            name: name.into(),
            position: Point3::new(x, y, z),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn position(&self) -> Point3 {
        self.position
    }
}

/// Straight-line distance between two vertices.
#[inline]
pub fn euclidean_distance(a: &Vertex, b: &Vertex) -> f64 {
    a.position.distance(&b.position)
}

/// Whether two vertices are close enough to share an edge.
#[inline]
pub fn within_threshold(a: &Vertex, b: &Vertex) -> bool {
    euclidean_distance(a, b) <= EDGE_THRESHOLD
}

/// Tentative distance of `candidate` when reached through `predecessor`.
///
/// Returns `None` when the two vertices are farther apart than
/// [`EDGE_THRESHOLD`], otherwise the step length plus `predecessor_distance`.
/// The result depends on the predecessor's current best distance, so it has
/// to be recomputed every time the predecessor is expanded.
#[inline]
pub fn edge_weight_via(
    candidate: &Vertex,
    predecessor: &Vertex,
    predecessor_distance: f64,
) -> Option<f64> {
    let step = euclidean_distance(candidate, predecessor);
    (step <= EDGE_THRESHOLD).then(|| step + predecessor_distance)
}

/// Where a vertex is in a shortest-path run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unvisited,
    Queued,
    Finalized,
}

/// Per-run vertex state: best known distance plus flags packed into a byte.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexState {
    best_distance: f64,
    flags: u8,
}

impl VertexState {
    const QUEUED: u8 = 0b0000_0001;
    const FINALIZED: u8 = 0b0000_0010;

    /// State of a vertex nothing has reached yet.
    #[inline]
    pub fn unvisited() -> Self {
        Self {
            best_distance: f64::INFINITY,
            flags: 0,
        }
    }

    /// State of the origin at the start of a run: distance 0, queued.
    #[inline]
    pub fn origin() -> Self {
        Self {
            best_distance: 0.0,
            flags: Self::QUEUED,
        }
    }

    #[inline]
    pub fn best_distance(self) -> f64 {
        self.best_distance
    }

    #[inline]
    pub fn is_queued(self) -> bool {
        self.flags & Self::QUEUED != 0
    }

    #[inline]
    pub fn is_finalized(self) -> bool {
        self.flags & Self::FINALIZED != 0
    }

    #[inline]
    pub fn phase(self) -> Phase {
        if self.is_finalized() {
            Phase::Finalized
        } else if self.is_queued() {
            Phase::Queued
        } else {
            Phase::Unvisited
        }
    }

    /// First discovery: record the distance and mark the vertex queued.
    ///
    /// Returns false (and changes nothing) unless the vertex is unvisited.
    #[inline]
    pub fn enqueue(&mut self, distance: f64) -> bool {
        if self.phase() != Phase::Unvisited {
            return false;
        }
        self.best_distance = distance;
        self.flags |= Self::QUEUED;
        true
    }

    /// Lower the best distance of a queued vertex.
    ///
    /// Returns true if `distance` improved on the current best. Finalized
    /// vertices are never touched.
    #[inline]
    pub fn relax(&mut self, distance: f64) -> bool {
        if self.is_finalized() || distance >= self.best_distance {
            return false;
        }
        self.best_distance = distance;
        true
    }

    /// Lock the distance. The vertex leaves the queue.
    #[inline]
    pub fn finalize(&mut self) {
        self.flags = (self.flags & !Self::QUEUED) | Self::FINALIZED;
    }
}

impl Default for VertexState {
    fn default() -> Self {
        Self::unvisited()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id() {
        let id = VertexId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.index(), 42);
        assert_eq!(format!("{}", id), "Vertex(42)");
    }

    #[test]
    fn test_vertex_id_conversion() {
        let id: VertexId = 123.into();
        let raw: u32 = id.into();
        assert_eq!(raw, 123);
    }

    #[test]
    fn test_euclidean_distance() {
        let a = Vertex::new("a", 0.0, 0.0, 0.0);
        let b = Vertex::new("b", 1.0, 2.0, 2.0);
        assert_eq!(euclidean_distance(&a, &b), 3.0);
        assert_eq!(euclidean_distance(&b, &a), 3.0);
        assert_eq!(euclidean_distance(&a, &a), 0.0);
    }

    #[test]
    fn test_non_finite_component() {
        assert!(Point3::new(1.0, -2.0, 3.0).is_finite());
        assert_eq!(Point3::new(1.0, -2.0, 3.0).non_finite_component(), None);

        let p = Point3::new(0.0, f64::NEG_INFINITY, f64::NAN);
        assert!(!p.is_finite());
        assert_eq!(p.non_finite_component(), Some(("y", f64::NEG_INFINITY)));

        let (axis, value) = Point3::new(f64::NAN, 0.0, 0.0)
            .non_finite_component()
            .unwrap();
        assert_eq!(axis, "x");
        assert!(value.is_nan());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let a = Vertex::new("a", 0.0, 0.0, 0.0);
        let at = Vertex::new("at", 3.0, 0.0, 0.0);
        let past = Vertex::new("past", 3.0001, 0.0, 0.0);
        assert!(within_threshold(&a, &at));
        assert!(!within_threshold(&a, &past));
    }

    #[test]
    fn test_edge_weight_via() {
        let b = Vertex::new("B", 1.0, 0.0, 0.0);
        let c = Vertex::new("C", 4.0, 0.0, 0.0);
        let a = Vertex::new("A", 0.0, 0.0, 0.0);

        assert_eq!(edge_weight_via(&c, &b, 1.0), Some(4.0));
        assert_eq!(edge_weight_via(&b, &a, 0.0), Some(1.0));
        assert_eq!(edge_weight_via(&c, &a, 0.0), None);
    }

    #[test]
    fn test_state_default_is_unvisited() {
        let state = VertexState::default();
        assert_eq!(state.phase(), Phase::Unvisited);
        assert!(state.best_distance().is_infinite());
        assert!(!state.is_queued());
        assert!(!state.is_finalized());
    }

    #[test]
    fn test_state_lifecycle() {
        let mut state = VertexState::unvisited();
        assert!(state.enqueue(5.0));
        assert_eq!(state.phase(), Phase::Queued);
        assert_eq!(state.best_distance(), 5.0);

        // Second discovery is not an enqueue.
        assert!(!state.enqueue(1.0));
        assert_eq!(state.best_distance(), 5.0);

        assert!(!state.relax(6.0));
        assert!(state.relax(4.0));
        assert_eq!(state.best_distance(), 4.0);

        state.finalize();
        assert_eq!(state.phase(), Phase::Finalized);
        assert!(!state.is_queued());
    }

    #[test]
    fn test_finalized_distance_is_locked() {
        let mut state = VertexState::origin();
        state.finalize();
        assert!(!state.relax(-1.0));
        assert!(!state.enqueue(-1.0));
        assert_eq!(state.best_distance(), 0.0);
    }
}
