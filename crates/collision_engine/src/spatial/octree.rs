//! Octree spatial index
//!
//! A mutable recursive tree of cube regions. Nodes live in a slotmap arena
//! owned by [`Octree`]; child links are owned handle arrays (exactly zero or
//! eight), parent/root navigation uses plain non-owning handles, so subtree
//! destruction is explicit and cycle-free.
//!
//! Construction is eager and depth-first: any node whose region overlaps
//! more than `ideal_entity_count` entities subdivides, bounded by
//! `max_level`. Entities are assigned to every leaf their world AABB
//! touches; straddling an octant boundary legitimately lands an entity in
//! several sibling leaves, and downstream consumers deduplicate pairs.

use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::config::Config;
use crate::debug::{DebugDraw, DebugShape};
use crate::foundation::math::{Vec3, Vec4};
use crate::scene::{Aabb, EntitySource};

new_key_type! {
    /// Stable handle to an octant in the tree arena
    pub struct NodeKey;
}

/// Configuration for octree construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OctreeConfig {
    /// Entity count a node may hold before it subdivides
    pub ideal_entity_count: usize,

    /// Maximum subdivision depth (root is level 0)
    pub max_level: u32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            ideal_entity_count: 5,
            max_level: 3,
        }
    }
}

impl Config for OctreeConfig {}

/// Single cube region in the octree
#[derive(Debug)]
pub struct Octant {
    id: u32,
    level: u32,
    center: Vec3,
    size: f32,
    parent: Option<NodeKey>,
    children: Option<[NodeKey; 8]>,
    entities: Vec<usize>,
}

impl Octant {
    fn new(id: u32, level: u32, center: Vec3, size: f32, parent: Option<NodeKey>) -> Self {
        Self {
            id,
            level,
            center,
            size,
            parent,
            children: None,
            entities: Vec::new(),
        }
    }

    /// Identifier assigned at construction; stable for one build only
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Depth from the root (root is 0)
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Cube center in world space
    pub fn center_global(&self) -> Vec3 {
        self.center
    }

    /// Cube edge length
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Minimum corner (`center - size/2` per axis)
    pub fn min_global(&self) -> Vec3 {
        self.center - Vec3::new(self.size, self.size, self.size) / 2.0
    }

    /// Maximum corner (`center + size/2` per axis)
    pub fn max_global(&self) -> Vec3 {
        self.center + Vec3::new(self.size, self.size, self.size) / 2.0
    }

    /// This octant's region as an AABB
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.min_global(), self.max_global())
    }

    /// True when the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Indices of entities assigned to this node; non-empty only on leaves
    pub fn entities(&self) -> &[usize] {
        &self.entities
    }
}

/// Octree spatial index over an [`EntitySource`]
#[derive(Debug)]
pub struct Octree {
    nodes: SlotMap<NodeKey, Octant>,
    root: NodeKey,
    config: OctreeConfig,
    /// Non-empty leaves from the last build, in depth-first order
    leaf_cache: Vec<NodeKey>,
    next_id: u32,
}

impl Octree {
    /// Allocate a tree whose root cube covers every entity in the source.
    ///
    /// The root region is the smallest cube centered on the union AABB of
    /// all entity bounds; it is fixed for the lifetime of this tree, so a
    /// scene that outgrows it needs a fresh `from_source`. The tree starts
    /// as a single unbuilt leaf; call [`Octree::construct_tree`] to build.
    pub fn from_source(source: &dyn EntitySource, config: OctreeConfig) -> Self {
        let mut bounds: Option<Aabb> = None;
        for index in 0..source.entity_count() {
            if let Some(volume) = source.volume(index) {
                let aabb = Aabb::new(volume.min_global(), volume.max_global());
                bounds = Some(match bounds {
                    Some(current) => current.union(&aabb),
                    None => aabb,
                });
            }
        }

        let bounds = bounds.unwrap_or_else(|| Aabb::new(Vec3::zeros(), Vec3::zeros()));
        let extents = bounds.extents();
        let half = extents.x.max(extents.y).max(extents.z);

        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Octant::new(0, 0, bounds.center(), half * 2.0, None));

        Self {
            nodes,
            root,
            config,
            leaf_cache: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate and immediately build a tree over the source
    pub fn build(source: &mut dyn EntitySource, config: OctreeConfig) -> Self {
        let mut octree = Self::from_source(&*source, config);
        octree.construct_tree(source);
        octree
    }

    /// Rebuild the tree from current entity state.
    ///
    /// Resets everything below the root (subtree deallocation, entity lists,
    /// leaf cache), then subdivides where entity density demands it, assigns
    /// entities to leaves (notifying the source once per assignment), and
    /// rebuilds the flat populated-leaf cache. Idempotent: calling it twice
    /// with unchanged entity state yields identical leaf lists.
    pub fn construct_tree(&mut self, source: &mut dyn EntitySource) {
        let root = self.root;
        self.next_id = 1;
        self.leaf_cache.clear();
        self.kill_branches(root);
        if let Some(node) = self.nodes.get_mut(root) {
            node.entities.clear();
        }

        if self.contains_more_than(root, &*source, self.config.ideal_entity_count) {
            self.subdivide(root, &*source);
        }

        self.assign_entities(root, source);
        self.construct_list(root);

        log::debug!(
            "octree rebuilt: {} octants, {} populated leaves, {} entities",
            self.nodes.len(),
            self.leaf_cache.len(),
            source.entity_count()
        );
    }

    /// True when more than `count` entities overlap this node's region.
    ///
    /// Scans the full entity source and short-circuits as soon as the count
    /// is exceeded. Deliberately uncached: construction re-scans per node,
    /// which is O(depth * entities) overall and acceptable while both stay
    /// small. This is the scaling limit of the build, not a correctness bug.
    pub fn contains_more_than(
        &self,
        key: NodeKey,
        source: &dyn EntitySource,
        count: usize,
    ) -> bool {
        let mut found = 0;
        for index in 0..source.entity_count() {
            if self.entity_intersects(key, source, index) {
                found += 1;
                if found > count {
                    return true;
                }
            }
        }
        false
    }

    /// Exact AABB-vs-AABB test between this node's region and one entity
    pub fn entity_intersects(
        &self,
        key: NodeKey,
        source: &dyn EntitySource,
        index: usize,
    ) -> bool {
        let Some(node) = self.nodes.get(key) else {
            return false;
        };
        let Some(volume) = source.volume(index) else {
            return false;
        };

        let entity_bounds = Aabb::new(volume.min_global(), volume.max_global());
        node.aabb().intersects(&entity_bounds)
    }

    /// Spawn eight half-size children and recurse where density demands it.
    ///
    /// No-op when the node already has children or sits at `max_level`.
    /// Children are cubes centered at the eight `±size/4` octant offsets;
    /// subdivision is eager and depth-first, so a dense child is fully
    /// expanded before its siblings are visited.
    fn subdivide(&mut self, key: NodeKey, source: &dyn EntitySource) {
        let (center, size, level) = match self.nodes.get(key) {
            Some(node) if node.is_leaf() && node.level < self.config.max_level => {
                (node.center, node.size, node.level)
            }
            _ => return,
        };

        let quarter = size / 4.0;
        let child_size = size / 2.0;

        let mut children = [NodeKey::default(); 8];
        for (octant, slot) in children.iter_mut().enumerate() {
            let x_sign = if octant & 1 != 0 { 1.0 } else { -1.0 };
            let y_sign = if octant & 2 != 0 { 1.0 } else { -1.0 };
            let z_sign = if octant & 4 != 0 { 1.0 } else { -1.0 };

            let child_center = center
                + Vec3::new(quarter * x_sign, quarter * y_sign, quarter * z_sign);

            let id = self.next_id;
            self.next_id += 1;
            *slot = self
                .nodes
                .insert(Octant::new(id, level + 1, child_center, child_size, Some(key)));
        }

        if let Some(node) = self.nodes.get_mut(key) {
            node.children = Some(children);
        }

        for child in children {
            if self.contains_more_than(child, source, self.config.ideal_entity_count) {
                self.subdivide(child, source);
            }
        }
    }

    /// Post-order entity assignment: children first, then leaves collect
    /// every entity whose world AABB touches their region. Internal nodes
    /// never hold entities. The source is notified once per (entity, leaf)
    /// pair; an entity straddling octant boundaries lands in every touched
    /// leaf, and pair consumers deduplicate.
    fn assign_entities(&mut self, key: NodeKey, source: &mut dyn EntitySource) {
        if let Some(children) = self.nodes.get(key).and_then(|node| node.children) {
            for child in children {
                self.assign_entities(child, source);
            }
            return;
        }

        let mut hits = Vec::new();
        for index in 0..source.entity_count() {
            if self.entity_intersects(key, &*source, index) {
                hits.push(index);
            }
        }

        let Some(node) = self.nodes.get_mut(key) else {
            return;
        };
        let id = node.id;
        node.entities.extend_from_slice(&hits);

        for index in hits {
            source.notify_leaf_assignment(index, id);
        }
    }

    /// Rebuild the root's flat cache of populated leaves (depth-first)
    fn construct_list(&mut self, key: NodeKey) {
        if let Some(children) = self.nodes.get(key).and_then(|node| node.children) {
            for child in children {
                self.construct_list(child);
            }
        }

        if self
            .nodes
            .get(key)
            .is_some_and(|node| !node.entities.is_empty())
        {
            self.leaf_cache.push(key);
        }
    }

    /// Deallocate the entire subtree below `key`.
    ///
    /// Safe on a leaf (no-op). Afterwards the node has no child handles and
    /// the arena holds no orphaned descendants.
    fn kill_branches(&mut self, key: NodeKey) {
        let children = self.nodes.get_mut(key).and_then(|node| node.children.take());
        if let Some(children) = children {
            for child in children {
                self.kill_branches(child);
                self.nodes.remove(child);
            }
        }
    }

    // --- query surface ---

    /// Handle of the root node
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Borrow a node by handle
    pub fn node(&self, key: NodeKey) -> Option<&Octant> {
        self.nodes.get(key)
    }

    /// Child `index` (0..8) of a node; `None` on a leaf or out-of-range index
    pub fn child(&self, key: NodeKey, index: usize) -> Option<NodeKey> {
        self.nodes
            .get(key)
            .and_then(|node| node.children)
            .and_then(|children| children.get(index).copied())
    }

    /// Parent handle; `None` at the root
    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(|node| node.parent)
    }

    /// True when the node exists and has no children
    pub fn is_leaf(&self, key: NodeKey) -> bool {
        self.nodes.get(key).is_some_and(Octant::is_leaf)
    }

    /// Number of allocated octants
    pub fn octant_count(&self) -> usize {
        self.nodes.len()
    }

    /// Non-empty leaves from the last build, in depth-first order
    pub fn populated_leaves(&self) -> &[NodeKey] {
        &self.leaf_cache
    }

    /// Construction configuration
    pub fn config(&self) -> &OctreeConfig {
        &self.config
    }

    // --- display hooks ---

    /// Draw every octant as a wire cube, children before parents
    pub fn display(&self, sink: &mut dyn DebugDraw, color: Vec4) {
        self.display_node(self.root, sink, color);
    }

    fn display_node(&self, key: NodeKey, sink: &mut dyn DebugDraw, color: Vec4) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };

        if let Some(children) = node.children {
            for child in children {
                self.display_node(child, sink, color);
            }
        }

        sink.draw(DebugShape::WireCube {
            center: node.center,
            size: node.size,
            color,
            wireframe: true,
        });
    }

    /// Draw the populated leaves plus the root bounds
    pub fn display_leafs(&self, sink: &mut dyn DebugDraw, color: Vec4) {
        for &key in &self.leaf_cache {
            if let Some(node) = self.nodes.get(key) {
                sink.draw(DebugShape::WireCube {
                    center: node.center,
                    size: node.size,
                    color,
                    wireframe: true,
                });
            }
        }

        if let Some(root) = self.nodes.get(self.root) {
            sink.draw(DebugShape::WireCube {
                center: root.center,
                size: root.size,
                color,
                wireframe: true,
            });
        }
    }

    /// Draw only the octant with the matching build id
    pub fn display_octant(&self, id: u32, sink: &mut dyn DebugDraw, color: Vec4) {
        if let Some(node) = self.nodes.values().find(|node| node.id == id) {
            sink.draw(DebugShape::WireCube {
                center: node.center,
                size: node.size,
                color,
                wireframe: true,
            });
        }
    }
}
