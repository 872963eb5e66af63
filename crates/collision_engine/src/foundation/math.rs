//! Math utilities and types
//!
//! Provides the fundamental math types used by the bounding volumes and the
//! spatial index. Everything is a thin alias over `nalgebra` so callers can
//! interoperate with the wider ecosystem without conversion glue.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Point3) -> Point3 {
        self.to_matrix().transform_point(&point)
    }
}

/// Extract the world-space basis vectors (local X/Y/Z directions) of an
/// affine transform. Columns are returned unnormalized, so callers that need
/// unit axes must handle scale themselves.
pub fn basis(matrix: &Mat4) -> [Vec3; 3] {
    [
        Vec3::new(matrix.m11, matrix.m21, matrix.m31),
        Vec3::new(matrix.m12, matrix.m22, matrix.m32),
        Vec3::new(matrix.m13, matrix.m23, matrix.m33),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_transform_to_matrix_roundtrip() {
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let point = transform.transform_point(Point3::origin());

        assert_relative_eq!(point.x, 1.0);
        assert_relative_eq!(point.y, 2.0);
        assert_relative_eq!(point.z, 3.0);
    }

    #[test]
    fn test_basis_extracts_rotation_columns() {
        let rotation = Quat::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        let matrix = Transform::from_position_rotation(Vec3::zeros(), rotation).to_matrix();
        let [x, y, _z] = basis(&matrix);

        // Local X maps to world Y under a quarter turn about Z
        assert_relative_eq!(x.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(y.x, -1.0, epsilon = 1e-6);
    }
}
