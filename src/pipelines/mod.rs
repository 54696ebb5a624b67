//! Projection pipelines turning model geometry into render queues.
//!
//! Both pipelines share the fixed isometric camera defined here:
//!
//! - `cuboid` projects declared (or synthesized) elements, one quad per face
//! - `mesh` projects imported polygon meshes scaled to fit the frame
//!

use cgmath::{Vector2, Vector3};

pub mod cuboid;
pub mod mesh;

const COS_30: f32 = 0.866_025;
const SIN_30: f32 = 0.5;

/// Project a model-space point onto the unscaled isometric plane.
pub fn isometric(point: Vector3<f32>) -> Vector2<f32> {
    Vector2::new(
        (point.x - point.z) * COS_30,
        (point.x + point.z) * SIN_30 - point.y,
    )
}

/// Scaled and offset isometric projection onto a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsoProjection {
    pub scale: f32,
    pub center: Vector2<f32>,
}

impl IsoProjection {
    /// Camera for a one-block model in a frame of `output_size` pixels.
    pub fn for_block(output_size: u32) -> Self {
        let size = output_size as f32;
        let scale = size / 38.0;
        Self {
            scale,
            center: Vector2::new(size / 2.0, size / 2.0 + 2.0 * scale),
        }
    }

    pub fn project(&self, point: Vector3<f32>) -> Vector2<f32> {
        isometric(point) * self.scale + self.center
    }
}

/// Twice the signed area of a screen-space triangle. Screen y grows
/// downwards, so faces turned away from the camera come out negative.
pub fn signed_area(p0: Vector2<f32>, p1: Vector2<f32>, p2: Vector2<f32>) -> f32 {
    (p1.x - p0.x) * (p2.y - p0.y) - (p1.y - p0.y) * (p2.x - p0.x)
}

pub fn is_back_face(p0: Vector2<f32>, p1: Vector2<f32>, p2: Vector2<f32>) -> bool {
    signed_area(p0, p1, p2) < 0.0
}

/// Painter's depth of a polygon: the mean of `x + y + z` over its corners.
pub fn depth_key(points: &[Vector3<f32>]) -> f32 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.x + p.y + p.z).sum::<f32>() / points.len() as f32
}
