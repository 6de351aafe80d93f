//! R-tree based spatial index using the rstar crate.
//!
//! Provides O(log n) spatial queries over vertex coordinates:
//! - Nearest neighbor
//! - Point-in-radius

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::graph::{Point3, VertexId};

/// A point in the spatial index with associated vertex ID.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexPoint {
    /// The vertex identifier.
    pub id: VertexId,
    /// Coordinates.
    pub position: [f64; 3],
}

impl VertexPoint {
    /// Create a new VertexPoint.
    pub fn new(id: VertexId, position: Point3) -> Self {
        Self {
            id,
            position: position.to_array(),
        }
    }
}

impl RTreeObject for VertexPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for VertexPoint {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        Point3::from(self.position).distance_squared(&Point3::from(*point))
    }

    fn contains_point(&self, point: &[f64; 3]) -> bool {
        self.position == *point
    }
}

/// Spatial index for graph vertices.
///
/// Uses an R*-tree, bulk loaded once since vertices never move.
pub struct SpatialIndex {
    tree: RTree<VertexPoint>,
}

impl SpatialIndex {
    /// Build the index from a list of (id, position) pairs.
    ///
    /// Positions must be finite; bulk loading cannot order NaN.
    pub fn from_points(points: &[(VertexId, Point3)]) -> Self {
        let vertex_points: Vec<_> = points
            .iter()
            .map(|&(id, position)| VertexPoint::new(id, position))
            .collect();

        Self {
            tree: RTree::bulk_load(vertex_points),
        }
    }

    /// Find the nearest vertex to a point. `None` for a non-finite point.
    pub fn nearest(&self, point: Point3) -> Option<VertexId> {
        if !point.is_finite() {
            return None;
        }
        self.tree
            .nearest_neighbor(&point.to_array())
            .map(|p| p.id)
    }

    /// Find all vertices whose squared distance to `point` is at most `radius²`.
    ///
    /// Order is unspecified. Empty for a non-finite point.
    pub fn in_radius(&self, point: Point3, radius: f64) -> Vec<VertexId> {
        if !point.is_finite() {
            return Vec::new();
        }
        self.tree
            .locate_within_distance(point.to_array(), radius * radius)
            .map(|p| p.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(points: &[[f64; 3]]) -> SpatialIndex {
        let points: Vec<_> = points
            .iter()
            .enumerate()
            .map(|(i, &p)| (VertexId(i as u32), Point3::from(p)))
            .collect();
        SpatialIndex::from_points(&points)
    }

    #[test]
    fn test_nearest() {
        let index = index_of(&[[0.0, 0.0, 0.0], [10.0, 10.0, 10.0], [5.0, 5.0, 5.0]]);

        assert_eq!(index.nearest(Point3::new(0.0, 0.0, 0.0)), Some(VertexId(0)));
        assert_eq!(index.nearest(Point3::new(6.0, 6.0, 6.0)), Some(VertexId(2)));
        assert_eq!(index.nearest(Point3::new(11.0, 11.0, 11.0)), Some(VertexId(1)));
    }

    #[test]
    fn test_in_radius() {
        let index = index_of(&[[0.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 10.0]]);

        let mut found = index.in_radius(Point3::new(0.0, 0.0, 0.0), 3.0);
        found.sort();
        assert_eq!(found, vec![VertexId(0), VertexId(1)]);
    }

    #[test]
    fn test_empty() {
        let index = index_of(&[]);
        assert_eq!(index.nearest(Point3::default()), None);
        assert!(index.in_radius(Point3::default(), 3.0).is_empty());
    }

    #[test]
    fn test_non_finite_query() {
        let index = index_of(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);

        assert_eq!(index.nearest(Point3::new(f64::NAN, 0.0, 0.0)), None);
        assert!(index.in_radius(Point3::new(0.0, f64::INFINITY, 0.0), 3.0).is_empty());
    }
}
