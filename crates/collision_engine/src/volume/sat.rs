//! Separating-axis test for oriented bounding boxes
//!
//! Canonical 15-axis OBB-vs-OBB test after Gottschalk, as presented in
//! Ericson, *Real-Time Collision Detection* §4.4.1. Two convex boxes are
//! disjoint iff some axis among the 3 face normals of A, the 3 face normals
//! of B, and the 9 pairwise edge cross products separates their projections.
//! The test short-circuits on the first separating axis found.

use crate::foundation::math::{basis, Vec3};
use crate::volume::RigidVolume;

/// Guard added to the absolute rotation terms so near-parallel edge pairs
/// (cross product near zero) cannot produce false separation from numerical
/// noise.
const SAT_EPSILON: f32 = 1e-6;

/// The axis that separated two oriented boxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatingAxis {
    /// Face normal `0..3` of the first box
    FaceA(usize),
    /// Face normal `0..3` of the second box
    FaceB(usize),
    /// Cross product of edge direction `i` of A and edge direction `j` of B
    Edge(usize, usize),
}

/// True when no separating axis exists between the two volumes
pub fn boxes_overlap(a: &RigidVolume, b: &RigidVolume) -> bool {
    separating_axis(a, b).is_none()
}

/// Run the 15-axis test, reporting the first separating axis found.
///
/// `None` means the boxes overlap. Degenerate boxes (zero extents, zero
/// transform columns) never panic; the epsilon guard keeps every comparison
/// well-defined.
pub fn separating_axis(a: &RigidVolume, b: &RigidVolume) -> Option<SeparatingAxis> {
    let (axes_a, ea) = world_axes(a);
    let (axes_b, eb) = world_axes(b);

    // Relative rotation expressed in A's frame, and its absolute value with
    // the epsilon guard folded in
    let mut r = [[0.0f32; 3]; 3];
    let mut abs_r = [[0.0f32; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            r[i][j] = axes_a[i].dot(&axes_b[j]);
            abs_r[i][j] = r[i][j].abs() + SAT_EPSILON;
        }
    }

    // Center separation in A's frame
    let t_world = b.center_global() - a.center_global();
    let t = [
        t_world.dot(&axes_a[0]),
        t_world.dot(&axes_a[1]),
        t_world.dot(&axes_a[2]),
    ];

    // Axes L = A0, A1, A2
    for i in 0..3 {
        let ra = ea[i];
        let rb = eb[0] * abs_r[i][0] + eb[1] * abs_r[i][1] + eb[2] * abs_r[i][2];
        if t[i].abs() > ra + rb {
            return Some(SeparatingAxis::FaceA(i));
        }
    }

    // Axes L = B0, B1, B2
    for j in 0..3 {
        let ra = ea[0] * abs_r[0][j] + ea[1] * abs_r[1][j] + ea[2] * abs_r[2][j];
        let rb = eb[j];
        let dist = (t[0] * r[0][j] + t[1] * r[1][j] + t[2] * r[2][j]).abs();
        if dist > ra + rb {
            return Some(SeparatingAxis::FaceB(j));
        }
    }

    // Axes L = Ai x Bj
    for i in 0..3 {
        let i1 = (i + 1) % 3;
        let i2 = (i + 2) % 3;
        for j in 0..3 {
            let j1 = (j + 1) % 3;
            let j2 = (j + 2) % 3;

            let dist = (t[i2] * r[i1][j] - t[i1] * r[i2][j]).abs();
            let ra = ea[i1] * abs_r[i2][j] + ea[i2] * abs_r[i1][j];
            let rb = eb[j1] * abs_r[i][j2] + eb[j2] * abs_r[i][j1];
            if dist > ra + rb {
                return Some(SeparatingAxis::Edge(i, j));
            }
        }
    }

    None
}

/// Unit world-space box axes plus world half-extents.
///
/// Scale lives in the matrix columns, so the half-widths are stretched by
/// each column's length while the axes themselves are normalized.
fn world_axes(volume: &RigidVolume) -> ([Vec3; 3], [f32; 3]) {
    let columns = basis(&volume.model_matrix());
    let half_width = volume.half_width();

    let mut axes = [Vec3::zeros(); 3];
    let mut extents = [0.0f32; 3];
    for (i, column) in columns.iter().enumerate() {
        let length = column.norm();
        axes[i] = if length > SAT_EPSILON {
            *column / length
        } else {
            *column
        };
        extents[i] = half_width[i] * length;
    }

    (axes, extents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Quat, Vector3};
    use crate::scene::Aabb;
    use std::f32::consts::FRAC_PI_4;

    fn unit_cube_at(x: f32, y: f32, z: f32) -> RigidVolume {
        let mut volume = RigidVolume::from_points(&[
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, 0.5),
        ]);
        volume.set_model_matrix(Mat4::new_translation(&Vec3::new(x, y, z)));
        volume
    }

    fn rotated_cube_at(center: Vec3, rotation: Quat) -> RigidVolume {
        let mut volume = RigidVolume::from_points(&[
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, 0.5),
        ]);
        let matrix = Mat4::new_translation(&center) * rotation.to_homogeneous();
        volume.set_model_matrix(matrix);
        volume
    }

    #[test]
    fn test_unit_cube_scenarios() {
        let a = unit_cube_at(0.0, 0.0, 0.0);

        let near = unit_cube_at(0.5, 0.0, 0.0);
        assert!(boxes_overlap(&a, &near));

        let far = unit_cube_at(2.0, 0.0, 0.0);
        assert!(!boxes_overlap(&a, &far));
        assert!(separating_axis(&a, &far).is_some());
    }

    #[test]
    fn test_axis_aligned_matches_aabb_test() {
        // For non-rotated boxes the SAT must agree with the plain AABB test
        let a = unit_cube_at(0.0, 0.0, 0.0);
        let offsets = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.9, 0.0, 0.0),
            Vec3::new(0.9, 0.9, 0.9),
            Vec3::new(1.5, 0.0, 0.0),
            Vec3::new(0.0, -1.2, 0.0),
            Vec3::new(0.7, 0.7, -1.4),
        ];

        for offset in offsets {
            let b = unit_cube_at(offset.x, offset.y, offset.z);
            let aabb_a = Aabb::new(a.min_global(), a.max_global());
            let aabb_b = Aabb::new(b.min_global(), b.max_global());

            assert_eq!(
                boxes_overlap(&a, &b),
                aabb_a.intersects(&aabb_b),
                "disagreement at offset {offset:?}"
            );
        }
    }

    #[test]
    fn test_symmetry() {
        let rotation = Quat::from_axis_angle(&Vector3::z_axis(), FRAC_PI_4);
        let a = unit_cube_at(0.0, 0.0, 0.0);
        let cases = [
            rotated_cube_at(Vec3::new(1.0, 1.0, 0.0), rotation),
            rotated_cube_at(Vec3::new(0.8, 0.2, 0.1), rotation),
            unit_cube_at(3.0, 0.0, 0.0),
        ];

        for b in &cases {
            assert_eq!(boxes_overlap(&a, b), boxes_overlap(b, &a));
        }
    }

    #[test]
    fn test_rotated_box_separated_where_aabbs_overlap() {
        // B is a unit cube rotated 45 degrees about Z at (1, 1, 0). Its world
        // AABB overlaps A's, but B's own face normal separates the boxes.
        let a = unit_cube_at(0.0, 0.0, 0.0);
        let rotation = Quat::from_axis_angle(&Vector3::z_axis(), FRAC_PI_4);
        let b = rotated_cube_at(Vec3::new(1.0, 1.0, 0.0), rotation);

        let aabb_a = Aabb::new(a.min_global(), a.max_global());
        let aabb_b = Aabb::new(b.min_global(), b.max_global());
        assert!(aabb_a.intersects(&aabb_b));

        assert!(!boxes_overlap(&a, &b));
    }

    #[test]
    fn test_rotated_box_overlapping() {
        let a = unit_cube_at(0.0, 0.0, 0.0);
        let rotation = Quat::from_axis_angle(&Vector3::z_axis(), FRAC_PI_4);
        let b = rotated_cube_at(Vec3::new(1.0, 0.0, 0.0), rotation);

        // Corner of the rotated cube reaches x = 1 - sqrt(2)/2 < 0.5
        assert!(boxes_overlap(&a, &b));
    }

    #[test]
    fn test_parallel_edges_use_epsilon_fallback() {
        // Identical orientations make all nine edge cross products zero; the
        // epsilon guard must keep the verdict stable on both sides of touch
        let a = unit_cube_at(0.0, 0.0, 0.0);
        let touching = unit_cube_at(1.0, 0.0, 0.0);
        let separated = unit_cube_at(1.01, 0.0, 0.0);

        assert!(boxes_overlap(&a, &touching));
        assert!(!boxes_overlap(&a, &separated));
    }

    #[test]
    fn test_degenerate_volume_never_panics() {
        let far = unit_cube_at(5.0, 0.0, 0.0);
        let empty = RigidVolume::from_points(&[]);

        // Zero-radius prefilter rejects before SAT; the call must stay total
        assert!(!empty.overlaps(&far));
        assert!(boxes_overlap(&empty, &unit_cube_at(0.0, 0.0, 0.0)));
    }
}
