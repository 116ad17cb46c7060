use nalgebra::Vector3;

use crate::BODY_HALF_EXTENT;

/// A simulated axis-aligned box. The `tint` field is carried for rendering
/// collaborators and never interpreted by the simulation itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vector3<f32>,
    pub half_extent: Vector3<f32>,
    pub velocity: Vector3<f32>,
    pub tint: Vector3<f32>,
}

impl Body {
    pub fn new(position: Vector3<f32>, half_extent: Vector3<f32>) -> Self {
        Self {
            position,
            half_extent,
            velocity: Vector3::zeros(),
            tint: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// A default-sized box at the given position, at rest.
    pub fn cube(x: f32, y: f32, z: f32) -> Self {
        Self::new(
            Vector3::new(x, y, z),
            Vector3::new(BODY_HALF_EXTENT, BODY_HALF_EXTENT, BODY_HALF_EXTENT),
        )
    }

    pub fn with_velocity(mut self, x: f32, y: f32, z: f32) -> Self {
        self.velocity = Vector3::new(x, y, z);
        self
    }

    pub fn with_tint(mut self, r: f32, g: f32, b: f32) -> Self {
        self.tint = Vector3::new(r, g, b);
        self
    }

    pub fn bottom(&self) -> f32 {
        self.position.y - self.half_extent.y
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::cube(0.0, 0.0, 0.0)
    }
}
