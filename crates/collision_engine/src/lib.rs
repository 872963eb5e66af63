//! # Collision Engine
//!
//! Broad-phase/narrow-phase collision detection for real-time 3D scenes.
//!
//! ## Features
//!
//! - **Oriented bounding volumes**: per-object local/global AABB, OBB
//!   half-widths and world transform, with a separating-axis (SAT) overlap
//!   predicate
//! - **Octree broad phase**: recursive spatial index that partitions the
//!   scene so pairwise tests scale sub-quadratically
//! - **Frame pipeline**: rebuild, per-leaf candidate pairs, narrow-phase
//!   SAT, and frame-to-frame entered/exited collision deltas
//! - **Debug visualization hooks**: wireframe draw requests emitted to a
//!   pluggable sink, no rendering dependency
//!
//! ## Quick Start
//!
//! ```rust
//! use collision_engine::prelude::*;
//!
//! let mut world = CollisionWorld::new(OctreeConfig::default());
//!
//! let cube = [
//!     Vec3::new(-0.5, -0.5, -0.5),
//!     Vec3::new(0.5, 0.5, 0.5),
//! ];
//! let a = world.insert(RigidVolume::from_points(&cube));
//! let b = world.insert(RigidVolume::from_points(&cube));
//!
//! world.set_model_matrix(b, Mat4::new_translation(&Vec3::new(0.5, 0.0, 0.0)));
//! world.detect();
//!
//! assert!(world.current_collisions().contains(&CollisionPair::new(a, b)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod collision;
pub mod config;
pub mod debug;
pub mod foundation;
pub mod scene;
pub mod spatial;
pub mod volume;

/// Common imports for engine users
pub mod prelude {
    pub use crate::collision::{CollisionPair, CollisionWorld};
    pub use crate::config::{Config, ConfigError};
    pub use crate::debug::{DebugDraw, DebugShape, LogDraw, RecordingDraw};
    pub use crate::foundation::math::{Mat3, Mat4, Quat, Transform, Vec3, Vec4};
    pub use crate::scene::{Aabb, Entity, EntitySource, SceneEntities};
    pub use crate::spatial::{Octree, OctreeConfig};
    pub use crate::volume::{RigidVolume, VolumeDisplay};
}
