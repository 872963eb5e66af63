//! Two-phase collision pipeline
//!
//! [`CollisionWorld`] owns one [`RigidVolume`] per entity and runs the
//! per-frame flow: octree rebuild (broad phase), per-leaf candidate pairs,
//! exact SAT tests (narrow phase), and overlap-set maintenance. Entities
//! straddling octant boundaries produce the same candidate pair in several
//! leaves; pairs are order-normalized and deduplicated here so the narrow
//! phase runs once per pair.

use std::collections::{HashMap, HashSet};

use crate::debug::DebugDraw;
use crate::foundation::math::Mat4;
use crate::scene::{Entity, EntitySource};
use crate::spatial::{Octree, OctreeConfig};
use crate::volume::RigidVolume;

/// Collision pair representing two entities that are colliding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionPair {
    /// First entity of the pair (smaller id)
    pub entity_a: Entity,
    /// Second entity of the pair (larger id)
    pub entity_b: Entity,
}

impl CollisionPair {
    /// Create a new collision pair (always stores the smaller entity ID
    /// first so the same unordered pair hashes identically)
    pub fn new(entity_a: Entity, entity_b: Entity) -> Self {
        if entity_a.id() < entity_b.id() {
            Self { entity_a, entity_b }
        } else {
            Self {
                entity_a: entity_b,
                entity_b: entity_a,
            }
        }
    }
}

/// Entity-source view over the world's ordered entity list.
///
/// Keeps the octree decoupled from the world's storage: the tree sees dense
/// indices, the world keeps stable `Entity` handles.
struct WorldSource<'a> {
    order: &'a [Entity],
    volumes: &'a HashMap<Entity, RigidVolume>,
    assignments: &'a mut HashMap<Entity, Vec<u32>>,
}

impl EntitySource for WorldSource<'_> {
    fn entity_count(&self) -> usize {
        self.order.len()
    }

    fn volume(&self, index: usize) -> Option<&RigidVolume> {
        self.order.get(index).and_then(|entity| self.volumes.get(entity))
    }

    fn notify_leaf_assignment(&mut self, index: usize, leaf_id: u32) {
        if let Some(entity) = self.order.get(index) {
            self.assignments.entry(*entity).or_default().push(leaf_id);
        }
    }
}

/// Broad-phase + narrow-phase collision world
pub struct CollisionWorld {
    /// Entities in insertion order; index order is what the octree sees
    order: Vec<Entity>,

    /// Bounding volume per entity
    volumes: HashMap<Entity, RigidVolume>,

    /// Leaf ids each entity was assigned to during the last rebuild
    assignments: HashMap<Entity, Vec<u32>>,

    /// Octree from the last `detect` call, kept for queries/visualization
    octree: Option<Octree>,

    config: OctreeConfig,

    /// Collision pairs from the current frame
    current_pairs: HashSet<CollisionPair>,

    /// Collision pairs from the previous frame
    previous_pairs: HashSet<CollisionPair>,

    next_id: u32,
}

impl CollisionWorld {
    /// Create an empty world with the given octree tuning
    pub fn new(config: OctreeConfig) -> Self {
        Self {
            order: Vec::new(),
            volumes: HashMap::new(),
            assignments: HashMap::new(),
            octree: None,
            config,
            current_pairs: HashSet::new(),
            previous_pairs: HashSet::new(),
            next_id: 0,
        }
    }

    /// Add a volume, returning the entity handle that owns it
    pub fn insert(&mut self, volume: RigidVolume) -> Entity {
        let entity = Entity::new(self.next_id);
        self.next_id += 1;

        self.order.push(entity);
        self.volumes.insert(entity, volume);
        entity
    }

    /// Destroy an entity's volume.
    ///
    /// The entity is proactively removed from every peer's overlap set
    /// before the volume is dropped, so no dangling references survive.
    pub fn remove(&mut self, entity: Entity) {
        let Some(volume) = self.volumes.remove(&entity) else {
            return;
        };

        for peer in volume.colliding() {
            if let Some(peer_volume) = self.volumes.get_mut(peer) {
                peer_volume.remove_collision_with(entity);
            }
        }

        self.order.retain(|e| *e != entity);
        self.assignments.remove(&entity);
        self.current_pairs
            .retain(|pair| pair.entity_a != entity && pair.entity_b != entity);
        self.previous_pairs
            .retain(|pair| pair.entity_a != entity && pair.entity_b != entity);
    }

    /// Update an entity's world transform
    pub fn set_model_matrix(&mut self, entity: Entity, matrix: Mat4) {
        if let Some(volume) = self.volumes.get_mut(&entity) {
            volume.set_model_matrix(matrix);
        }
    }

    /// Borrow an entity's volume
    pub fn volume(&self, entity: Entity) -> Option<&RigidVolume> {
        self.volumes.get(&entity)
    }

    /// Mutably borrow an entity's volume
    pub fn volume_mut(&mut self, entity: Entity) -> Option<&mut RigidVolume> {
        self.volumes.get_mut(&entity)
    }

    /// Exact pairwise test with overlap-set side effects.
    ///
    /// On a colliding result both volumes gain each other in their overlap
    /// sets; on a non-colliding result both lose each other. Both edges are
    /// idempotent, so repeated calls are safe. Unknown entities and
    /// self-pairs test false with no side effects.
    pub fn test_overlap(&mut self, a: Entity, b: Entity) -> bool {
        if a == b {
            return false;
        }
        let (Some(volume_a), Some(volume_b)) = (self.volumes.get(&a), self.volumes.get(&b))
        else {
            return false;
        };

        let colliding = volume_a.overlaps(volume_b);

        if colliding {
            if let Some(volume) = self.volumes.get_mut(&a) {
                volume.add_collision_with(b);
            }
            if let Some(volume) = self.volumes.get_mut(&b) {
                volume.add_collision_with(a);
            }
        } else {
            if let Some(volume) = self.volumes.get_mut(&a) {
                volume.remove_collision_with(b);
            }
            if let Some(volume) = self.volumes.get_mut(&b) {
                volume.remove_collision_with(a);
            }
        }

        colliding
    }

    /// Run one frame of collision detection (broad phase + narrow phase).
    ///
    /// Returns the collision pairs for this frame.
    pub fn detect(&mut self) -> &HashSet<CollisionPair> {
        // Move current pairs to previous
        std::mem::swap(&mut self.current_pairs, &mut self.previous_pairs);
        self.current_pairs.clear();
        self.assignments.clear();

        // Phase 1: broad phase - rebuild the octree over current volumes
        let octree = {
            let mut source = WorldSource {
                order: &self.order,
                volumes: &self.volumes,
                assignments: &mut self.assignments,
            };
            Octree::build(&mut source, self.config.clone())
        };

        let candidate_lists: Vec<Vec<Entity>> = octree
            .populated_leaves()
            .iter()
            .filter_map(|&key| octree.node(key))
            .map(|node| {
                node.entities()
                    .iter()
                    .filter_map(|&index| self.order.get(index).copied())
                    .collect()
            })
            .collect();
        self.octree = Some(octree);

        // Phase 2: narrow phase - SAT on each candidate pair, once per pair
        let mut tested: HashSet<CollisionPair> = HashSet::new();
        for list in candidate_lists {
            for i in 0..list.len() {
                for j in (i + 1)..list.len() {
                    let pair = CollisionPair::new(list[i], list[j]);
                    if !tested.insert(pair) {
                        continue;
                    }
                    if self.test_overlap(pair.entity_a, pair.entity_b) {
                        self.current_pairs.insert(pair);
                    }
                }
            }
        }

        // Pairs that dropped out of the candidate set entirely were never
        // retested; their overlap sets still need clearing
        let stale: Vec<CollisionPair> = self
            .previous_pairs
            .difference(&tested)
            .copied()
            .collect();
        for pair in stale {
            if let Some(volume) = self.volumes.get_mut(&pair.entity_a) {
                volume.remove_collision_with(pair.entity_b);
            }
            if let Some(volume) = self.volumes.get_mut(&pair.entity_b) {
                volume.remove_collision_with(pair.entity_a);
            }
        }

        log::debug!(
            "collision frame: {} entities, {} pairs colliding",
            self.order.len(),
            self.current_pairs.len()
        );

        &self.current_pairs
    }

    /// Pairs that started colliding this frame
    pub fn collisions_entered(&self) -> Vec<CollisionPair> {
        self.current_pairs
            .difference(&self.previous_pairs)
            .copied()
            .collect()
    }

    /// Pairs that stopped colliding this frame
    pub fn collisions_exited(&self) -> Vec<CollisionPair> {
        self.previous_pairs
            .difference(&self.current_pairs)
            .copied()
            .collect()
    }

    /// All currently colliding pairs
    pub fn current_collisions(&self) -> &HashSet<CollisionPair> {
        &self.current_pairs
    }

    /// Octree from the last `detect` call (for queries and visualization)
    pub fn octree(&self) -> Option<&Octree> {
        self.octree.as_ref()
    }

    /// Leaf ids the entity was assigned to during the last `detect` call
    pub fn assignments(&self, entity: Entity) -> &[u32] {
        self.assignments
            .get(&entity)
            .map_or(&[], Vec::as_slice)
    }

    /// Number of entities with volumes
    pub fn entity_count(&self) -> usize {
        self.order.len()
    }

    /// True when no entities are registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Octree tuning in use
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Submit every volume's enabled debug bounds to the sink
    pub fn draw_volumes(&self, sink: &mut dyn DebugDraw) {
        for entity in &self.order {
            if let Some(volume) = self.volumes.get(entity) {
                volume.add_to_render_list(sink);
            }
        }
    }
}
