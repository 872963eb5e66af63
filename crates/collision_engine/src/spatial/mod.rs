//! Spatial partitioning data structures
//!
//! Provides the octree used as the broad phase: the scene is recursively
//! partitioned into cube octants so pairwise narrow-phase tests only run
//! within leaf-local candidate lists.

mod octree;

pub use octree::{NodeKey, Octant, Octree, OctreeConfig};
