//! Spatial indexing for O(log n) neighbor queries.
//!
//! This module provides an R-tree based spatial index over 3D vertex
//! coordinates, used to find candidate neighbors within the edge cutoff.

mod rtree;

pub use rtree::SpatialIndex;
