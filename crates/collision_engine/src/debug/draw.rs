//! Debug drawing primitives and sinks
//!
//! The volume and spatial modules describe what to draw; how the request is
//! rendered (lines, meshes, immediate mode) is the host's concern. Sinks
//! receive shapes depth-first in the order the tree walks its nodes.

use crate::foundation::math::{Mat4, Vec3, Vec4};

/// Well-known debug colors, RGBA in `[0, 1]`
pub mod colors {
    use crate::foundation::math::Vec4;

    /// Default color for volumes that are not colliding
    pub const WHITE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
    /// Default color for colliding volumes
    pub const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
    /// Axis-realigned bound visualization
    pub const YELLOW: Vec4 = Vec4::new(1.0, 1.0, 0.0, 1.0);
    /// Bounding-sphere visualization
    pub const CORNFLOWER_BLUE: Vec4 = Vec4::new(0.39, 0.58, 0.93, 1.0);
    /// Octree node visualization
    pub const GREEN: Vec4 = Vec4::new(0.0, 1.0, 0.0, 1.0);
}

/// Debug shape primitives emitted by the collision core
#[derive(Clone, Debug)]
pub enum DebugShape {
    /// Axis-aligned cube, used for octree nodes
    WireCube {
        /// Cube center in world space
        center: Vec3,
        /// Edge length
        size: f32,
        /// RGBA color
        color: Vec4,
        /// Render as wireframe rather than solid
        wireframe: bool,
    },

    /// Box under an arbitrary affine transform, used for OBB/ARBB display
    OrientedBox {
        /// Box center in the model's local space
        center: Vec3,
        /// Per-axis half-extents in local space
        half_extents: Vec3,
        /// Model-to-world transform
        model: Mat4,
        /// RGBA color
        color: Vec4,
    },

    /// Sphere, used for bounding-sphere display
    WireSphere {
        /// Sphere center in world space
        center: Vec3,
        /// Sphere radius
        radius: f32,
        /// RGBA color
        color: Vec4,
    },
}

/// Sink for debug draw requests
pub trait DebugDraw {
    /// Submit one shape for this frame
    fn draw(&mut self, shape: DebugShape);
}

/// Sink that records every request, for tests and tooling
#[derive(Debug, Default)]
pub struct RecordingDraw {
    shapes: Vec<DebugShape>,
}

impl RecordingDraw {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Shapes recorded so far, in submission order
    pub fn shapes(&self) -> &[DebugShape] {
        &self.shapes
    }

    /// Number of recorded shapes
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// True if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Drop all recorded shapes
    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}

impl DebugDraw for RecordingDraw {
    fn draw(&mut self, shape: DebugShape) {
        self.shapes.push(shape);
    }
}

/// Sink that logs requests at `trace` level, for headless runs
#[derive(Debug, Default)]
pub struct LogDraw;

impl DebugDraw for LogDraw {
    fn draw(&mut self, shape: DebugShape) {
        match &shape {
            DebugShape::WireCube { center, size, .. } => {
                log::trace!("draw wire cube at {:?} size {}", center, size);
            }
            DebugShape::OrientedBox { center, half_extents, .. } => {
                log::trace!("draw oriented box at {:?} half extents {:?}", center, half_extents);
            }
            DebugShape::WireSphere { center, radius, .. } => {
                log::trace!("draw wire sphere at {:?} radius {}", center, radius);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_draw_keeps_submission_order() {
        let mut sink = RecordingDraw::new();
        sink.draw(DebugShape::WireCube {
            center: Vec3::zeros(),
            size: 2.0,
            color: colors::GREEN,
            wireframe: true,
        });
        sink.draw(DebugShape::WireSphere {
            center: Vec3::new(1.0, 0.0, 0.0),
            radius: 0.5,
            color: colors::CORNFLOWER_BLUE,
        });

        assert_eq!(sink.len(), 2);
        assert!(matches!(sink.shapes()[0], DebugShape::WireCube { .. }));
        assert!(matches!(sink.shapes()[1], DebugShape::WireSphere { .. }));

        sink.clear();
        assert!(sink.is_empty());
    }
}
