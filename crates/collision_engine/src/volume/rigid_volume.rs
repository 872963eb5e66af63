//! Rigid bounding volume: local/global AABB, OBB half-widths, transform
//!
//! Each scene object owns one [`RigidVolume`]. Local-space extents are fixed
//! at construction from the object's point cloud; world-space bounds are
//! recomputed whenever the model matrix changes by transforming the eight
//! local corners and taking componentwise extrema.

use std::collections::HashSet;

use crate::debug::{colors, DebugDraw, DebugShape};
use crate::foundation::math::{Mat4, Point3, Vec3, Vec4};
use crate::scene::Entity;
use crate::volume::sat;

bitflags::bitflags! {
    /// Which bounds to submit from [`RigidVolume::add_to_render_list`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct VolumeDisplay: u8 {
        /// Bounding sphere (cheap pre-filter bound)
        const BOUNDING_SPHERE = 1 << 0;
        /// Oriented bounding box
        const ORIENTED_BOX = 1 << 1;
        /// Axis-realigned box (world AABB of the transformed OBB)
        const AXIS_REALIGNED = 1 << 2;
    }
}

impl Default for VolumeDisplay {
    fn default() -> Self {
        Self::ORIENTED_BOX
    }
}

/// Oriented bounding volume for one scene object
#[derive(Debug, Clone)]
pub struct RigidVolume {
    center_local: Vec3,
    min_local: Vec3,
    max_local: Vec3,

    min_global: Vec3,
    max_global: Vec3,

    half_width: Vec3,
    radius: f32,
    arbb_size: Vec3,

    model_matrix: Mat4,

    colliding: HashSet<Entity>,

    display: VolumeDisplay,
    color_colliding: Vec4,
    color_clear: Vec4,
}

impl RigidVolume {
    /// Build a volume from an object's local-space point cloud.
    ///
    /// An empty list yields a degenerate zero-extent volume at the origin;
    /// overlap tests against it are meaningless and callers should guard.
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut volume = Self {
            center_local: Vec3::zeros(),
            min_local: Vec3::zeros(),
            max_local: Vec3::zeros(),
            min_global: Vec3::zeros(),
            max_global: Vec3::zeros(),
            half_width: Vec3::zeros(),
            radius: 0.0,
            arbb_size: Vec3::zeros(),
            model_matrix: Mat4::identity(),
            colliding: HashSet::new(),
            display: VolumeDisplay::default(),
            color_colliding: colors::RED,
            color_clear: colors::WHITE,
        };

        let Some(first) = points.first() else {
            log::debug!("rigid volume built from empty point list; bounds degenerate");
            return volume;
        };

        let mut min = *first;
        let mut max = *first;
        for point in &points[1..] {
            min.x = min.x.min(point.x);
            min.y = min.y.min(point.y);
            min.z = min.z.min(point.z);

            max.x = max.x.max(point.x);
            max.y = max.y.max(point.y);
            max.z = max.z.max(point.z);
        }

        volume.min_local = min;
        volume.max_local = max;

        // With the model matrix at identity, local and global coincide
        volume.min_global = min;
        volume.max_global = max;

        volume.center_local = (max + min) / 2.0;
        volume.half_width = (max - min) / 2.0;
        volume.radius = (volume.center_local - min).norm();
        volume.arbb_size = max - min;

        volume
    }

    /// Replace the world transform and recompute the global AABB.
    ///
    /// A matrix equal to the current one is a no-op; the recompute transforms
    /// all eight local corners and takes componentwise extrema, so the result
    /// is the *axis-aligned* world bound of the OBB, not the OBB itself.
    pub fn set_model_matrix(&mut self, matrix: Mat4) {
        if matrix == self.model_matrix {
            return;
        }

        self.model_matrix = matrix;

        let corners = self.corners();
        let first = matrix.transform_point(&Point3::from(corners[0])).coords;
        let mut min = first;
        let mut max = first;

        for corner in &corners[1..] {
            let world = matrix.transform_point(&Point3::from(*corner)).coords;

            min.x = min.x.min(world.x);
            min.y = min.y.min(world.y);
            min.z = min.z.min(world.z);

            max.x = max.x.max(world.x);
            max.y = max.y.max(world.y);
            max.z = max.z.max(world.z);
        }

        self.min_global = min;
        self.max_global = max;
        self.arbb_size = max - min;
    }

    /// The eight local-space corners of the OBB, back square then front
    pub fn corners(&self) -> [Vec3; 8] {
        let min = self.min_local;
        let max = self.max_local;
        [
            min,
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            max,
        ]
    }

    /// Exact overlap test against another volume.
    ///
    /// Stage one is a bounding-sphere pre-filter: when the spheres are
    /// disjoint the boxes cannot overlap and the SAT is skipped. Stage two is
    /// the canonical 15-axis separating-axis test. Pure; overlap-set
    /// bookkeeping lives in [`crate::collision::CollisionWorld`].
    pub fn overlaps(&self, other: &Self) -> bool {
        let center_distance = (self.center_global() - other.center_global()).norm();
        if center_distance >= self.radius + other.radius {
            return false;
        }

        sat::separating_axis(self, other).is_none()
    }

    // --- accessors ---

    /// Local-space center
    pub fn center_local(&self) -> Vec3 {
        self.center_local
    }

    /// Local-space minimum corner
    pub fn min_local(&self) -> Vec3 {
        self.min_local
    }

    /// Local-space maximum corner
    pub fn max_local(&self) -> Vec3 {
        self.max_local
    }

    /// World-space center (`model_matrix * center_local`)
    pub fn center_global(&self) -> Vec3 {
        self.model_matrix
            .transform_point(&Point3::from(self.center_local))
            .coords
    }

    /// World-space AABB minimum corner
    pub fn min_global(&self) -> Vec3 {
        self.min_global
    }

    /// World-space AABB maximum corner
    pub fn max_global(&self) -> Vec3 {
        self.max_global
    }

    /// Per-axis half-extent in local space
    pub fn half_width(&self) -> Vec3 {
        self.half_width
    }

    /// Bounding-sphere radius (distance from local center to local min)
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Current world transform
    pub fn model_matrix(&self) -> Mat4 {
        self.model_matrix
    }

    /// Size of the axis-realigned world bound (`max_global - min_global`)
    pub fn arbb_size(&self) -> Vec3 {
        self.arbb_size
    }

    // --- overlap-set bookkeeping ---

    /// Peers currently overlapping this volume
    pub fn colliding(&self) -> &HashSet<Entity> {
        &self.colliding
    }

    /// True if `peer` is in this volume's overlap set
    pub fn is_colliding_with(&self, peer: Entity) -> bool {
        self.colliding.contains(&peer)
    }

    /// Empty the overlap set
    pub fn clear_collisions(&mut self) {
        self.colliding.clear();
    }

    pub(crate) fn add_collision_with(&mut self, peer: Entity) {
        // HashSet insert is already idempotent
        self.colliding.insert(peer);
    }

    pub(crate) fn remove_collision_with(&mut self, peer: Entity) {
        self.colliding.remove(&peer);
    }

    // --- display ---

    /// Choose which bounds to draw
    pub fn set_display(&mut self, display: VolumeDisplay) {
        self.display = display;
    }

    /// Currently enabled display bounds
    pub fn display(&self) -> VolumeDisplay {
        self.display
    }

    /// Override the colliding/not-colliding OBB colors
    pub fn set_colors(&mut self, colliding: Vec4, clear: Vec4) {
        self.color_colliding = colliding;
        self.color_clear = clear;
    }

    /// Submit this volume's enabled bounds to the debug sink.
    ///
    /// The OBB is tinted by whether the overlap set is non-empty; sphere and
    /// axis-realigned bounds use fixed colors.
    pub fn add_to_render_list(&self, sink: &mut dyn DebugDraw) {
        if self.display.contains(VolumeDisplay::BOUNDING_SPHERE) {
            sink.draw(DebugShape::WireSphere {
                center: self.center_global(),
                radius: self.radius,
                color: colors::CORNFLOWER_BLUE,
            });
        }

        if self.display.contains(VolumeDisplay::ORIENTED_BOX) {
            let color = if self.colliding.is_empty() {
                self.color_clear
            } else {
                self.color_colliding
            };
            sink.draw(DebugShape::OrientedBox {
                center: self.center_local,
                half_extents: self.half_width,
                model: self.model_matrix,
                color,
            });
        }

        if self.display.contains(VolumeDisplay::AXIS_REALIGNED) {
            sink.draw(DebugShape::OrientedBox {
                center: self.center_global(),
                half_extents: self.arbb_size / 2.0,
                model: Mat4::identity(),
                color: colors::YELLOW,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::RecordingDraw;
    use crate::foundation::math::{Quat, Vector3};
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    fn unit_cube() -> RigidVolume {
        RigidVolume::from_points(&[
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, 0.5),
        ])
    }

    #[test]
    fn test_from_points_extrema() {
        let volume = RigidVolume::from_points(&[
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-1.0, 4.0, 0.0),
            Vec3::new(0.0, 1.0, -3.0),
        ]);

        assert_relative_eq!(volume.min_local().x, -1.0);
        assert_relative_eq!(volume.max_local().y, 4.0);
        assert_relative_eq!(volume.min_local().z, -3.0);
        assert_relative_eq!(volume.center_local().y, 1.0);
        assert_relative_eq!(volume.half_width().z, 1.75);

        // Global bounds start equal to local under the identity transform
        assert_relative_eq!(volume.min_global().x, volume.min_local().x);
        assert_relative_eq!(volume.max_global().y, volume.max_local().y);
    }

    #[test]
    fn test_empty_points_is_degenerate() {
        let volume = RigidVolume::from_points(&[]);

        assert_relative_eq!(volume.half_width().norm(), 0.0);
        assert_relative_eq!(volume.radius(), 0.0);
        assert_eq!(volume.model_matrix(), Mat4::identity());
    }

    #[test]
    fn test_radius_is_center_to_min_distance() {
        let volume = unit_cube();
        let expected = (3.0f32 * 0.25).sqrt();
        assert_relative_eq!(volume.radius(), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_set_model_matrix_translation() {
        let mut volume = unit_cube();
        volume.set_model_matrix(Mat4::new_translation(&Vec3::new(3.0, 0.0, 0.0)));

        assert_relative_eq!(volume.min_global().x, 2.5);
        assert_relative_eq!(volume.max_global().x, 3.5);
        assert_relative_eq!(volume.center_global().x, 3.0);

        // Local bounds are untouched by transform updates
        assert_relative_eq!(volume.min_local().x, -0.5);
    }

    #[test]
    fn test_set_model_matrix_rotation_grows_global_bounds() {
        let mut volume = unit_cube();
        let rotation = Quat::from_axis_angle(&Vector3::z_axis(), FRAC_PI_4);
        volume.set_model_matrix(rotation.to_homogeneous());

        // A unit cube rotated 45 degrees about Z projects to sqrt(2)/2 on X/Y
        let expected = 0.5f32.hypot(0.5);
        assert_relative_eq!(volume.max_global().x, expected, epsilon = 1e-6);
        assert_relative_eq!(volume.max_global().y, expected, epsilon = 1e-6);
        assert_relative_eq!(volume.max_global().z, 0.5, epsilon = 1e-6);

        assert_relative_eq!(volume.arbb_size().x, 2.0 * expected, epsilon = 1e-6);
    }

    #[test]
    fn test_overlap_set_bookkeeping() {
        let mut volume = unit_cube();
        let peer = Entity::new(7);

        volume.add_collision_with(peer);
        volume.add_collision_with(peer);
        assert!(volume.is_colliding_with(peer));
        assert_eq!(volume.colliding().len(), 1);

        volume.remove_collision_with(peer);
        volume.remove_collision_with(peer);
        assert!(!volume.is_colliding_with(peer));
    }

    #[test]
    fn test_render_list_respects_display_flags() {
        let mut volume = unit_cube();
        let mut sink = RecordingDraw::new();

        volume.set_display(VolumeDisplay::all());
        volume.add_to_render_list(&mut sink);
        assert_eq!(sink.len(), 3);

        sink.clear();
        volume.set_display(VolumeDisplay::empty());
        volume.add_to_render_list(&mut sink);
        assert!(sink.is_empty());
    }
}
