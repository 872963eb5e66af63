//! Scene-facing types and the entity-source capability
//!
//! The spatial index never reaches into a global entity registry; instead it
//! is handed an [`EntitySource`] capability that enumerates objects and
//! exposes their bounding volumes as read-only queries. [`SceneEntities`] is
//! the plain container implementation used by tests and demos.

use crate::foundation::math::Vec3;
use crate::volume::RigidVolume;

/// Handle identifying one object in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    id: u32,
}

impl Entity {
    /// Create a new entity with the given ID
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    /// Get the entity ID
    pub fn id(&self) -> u32 {
        self.id
    }
}

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB
    ///
    /// Six half-plane rejections; touching boxes count as intersecting.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Grow this AABB to cover another
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: Vec3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Vec3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }
}

/// Read-only view of the scene's objects for spatial-index construction
///
/// The octree consumes entities only through this interface: a count, a
/// bounding volume per index, and a callback invoked once per
/// (entity, leaf) assignment during tree construction.
pub trait EntitySource {
    /// Number of entities currently in the scene
    fn entity_count(&self) -> usize;

    /// Bounding volume for the entity at `index`, if it exists
    fn volume(&self, index: usize) -> Option<&RigidVolume>;

    /// Record that the entity at `index` was assigned to the leaf `leaf_id`
    fn notify_leaf_assignment(&mut self, index: usize, leaf_id: u32);
}

/// Vec-backed entity container
///
/// The simplest possible [`EntitySource`]: volumes stored densely by index,
/// leaf assignments recorded per entity and cleared on each rebuild.
#[derive(Debug, Default)]
pub struct SceneEntities {
    volumes: Vec<RigidVolume>,
    assignments: Vec<Vec<u32>>,
}

impl SceneEntities {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a volume, returning its index
    pub fn add(&mut self, volume: RigidVolume) -> usize {
        self.volumes.push(volume);
        self.assignments.push(Vec::new());
        self.volumes.len() - 1
    }

    /// Mutable access to a volume (for transform updates)
    pub fn volume_mut(&mut self, index: usize) -> Option<&mut RigidVolume> {
        self.volumes.get_mut(index)
    }

    /// Leaf ids the entity at `index` was assigned to during the last build
    pub fn assignments(&self, index: usize) -> &[u32] {
        self.assignments.get(index).map_or(&[], Vec::as_slice)
    }

    /// Forget all leaf assignments (called before a rebuild)
    pub fn clear_assignments(&mut self) {
        for list in &mut self.assignments {
            list.clear();
        }
    }
}

impl EntitySource for SceneEntities {
    fn entity_count(&self) -> usize {
        self.volumes.len()
    }

    fn volume(&self, index: usize) -> Option<&RigidVolume> {
        self.volumes.get(index)
    }

    fn notify_leaf_assignment(&mut self, index: usize, leaf_id: u32) {
        if let Some(list) = self.assignments.get_mut(index) {
            list.push(leaf_id);
        }
    }
}
