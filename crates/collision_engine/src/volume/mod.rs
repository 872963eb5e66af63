//! Oriented bounding volumes and the narrow-phase overlap predicate
//!
//! [`RigidVolume`] carries one object's local/global bounds and world
//! transform; [`sat`] provides the exact 15-axis separating-axis test used
//! once the broad phase has produced candidate pairs.

mod rigid_volume;
pub mod sat;

pub use rigid_volume::{RigidVolume, VolumeDisplay};
pub use sat::{boxes_overlap, separating_axis, SeparatingAxis};
