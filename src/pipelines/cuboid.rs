//! Projection of cuboid elements.
//!
//! Every present face of every element becomes one textured quad: corners come
//! from the face's fixed table, UVs from the face or from its extents, and the
//! current animation frame shifts the UVs down the texture strip. Projected
//! models are rotated, projected isometrically, back-face culled and tagged
//! with a depth key; flat items are mapped straight onto the frame.

use cgmath::{Vector2, Vector3};
use image::Rgba;

use crate::{
    context::Context,
    data_structures::{
        face::Direction,
        model::{Element, Face, ModelDescriptor},
        texture::{TextureAnimation, TextureSet},
    },
    pipelines::{IsoProjection, depth_key, is_back_face},
    render::{DrawOrder, RenderPolygon, RenderVertex},
};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// How element space is mapped onto the frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CuboidCamera {
    /// Fixed-angle isometric view of rotated elements.
    Isometric(IsoProjection),
    /// Straight front view of the `z = 0` plane, one block filling the frame.
    Flat { scale: f32 },
}

impl CuboidCamera {
    pub fn for_model(descriptor: &ModelDescriptor, output_size: u32) -> Self {
        if descriptor.flat_item {
            CuboidCamera::Flat {
                scale: output_size as f32 / 16.0,
            }
        } else {
            CuboidCamera::Isometric(IsoProjection::for_block(output_size))
        }
    }

    pub fn draw_order(&self) -> DrawOrder {
        match self {
            CuboidCamera::Isometric(_) => DrawOrder::DepthSorted,
            CuboidCamera::Flat { .. } => DrawOrder::Declaration,
        }
    }
}

/// Builds the per-tick render queue of an element-based model.
pub struct CuboidProjector<'a> {
    descriptor: &'a ModelDescriptor,
    textures: &'a TextureSet,
    camera: CuboidCamera,
    max_alias_hops: usize,
}

impl<'a> CuboidProjector<'a> {
    pub fn new(descriptor: &'a ModelDescriptor, textures: &'a TextureSet, ctx: &Context) -> Self {
        Self {
            descriptor,
            textures,
            camera: CuboidCamera::for_model(descriptor, ctx.output_size),
            max_alias_hops: ctx.max_face_alias_hops,
        }
    }

    pub fn camera(&self) -> CuboidCamera {
        self.camera
    }

    /// All visible faces at `tick`, in declaration order.
    pub fn queue(&self, tick: u64) -> Vec<RenderPolygon<'a>> {
        self.descriptor
            .elements()
            .iter()
            .flat_map(|element| {
                element
                    .faces
                    .iter()
                    .filter_map(move |(&direction, face)| self.project_face(element, direction, face, tick))
            })
            .collect()
    }

    fn project_face(&self, element: &Element, direction: Direction, face: &Face, tick: u64) -> Option<RenderPolygon<'a>> {
        let path = self.descriptor.resolve_texture(&face.texture, self.max_alias_hops);
        let texture = self.textures.get(&path)?;
        let corners = direction.corners(element.from, element.to);
        let uvs = face_uvs(direction, face, &corners, texture, tick);

        match self.camera {
            CuboidCamera::Flat { scale } => {
                let vertices = corners
                    .iter()
                    .zip(uvs)
                    .map(|(corner, uv)| RenderVertex {
                        position: Vector2::new(corner.x * scale, (16.0 - corner.y) * scale),
                        uv,
                    })
                    .collect();
                Some(RenderPolygon {
                    vertices,
                    texture: Some(texture),
                    tint: WHITE,
                    depth: 0.0,
                })
            }
            CuboidCamera::Isometric(projection) => {
                let rotated = corners.map(|corner| element.rotate(corner));
                let screen = rotated.map(|corner| projection.project(corner));
                if is_back_face(screen[0], screen[1], screen[2]) {
                    return None;
                }
                let vertices = screen
                    .iter()
                    .zip(uvs)
                    .map(|(&position, uv)| RenderVertex { position, uv })
                    .collect();
                Some(RenderPolygon {
                    vertices,
                    texture: Some(texture),
                    tint: direction.shade(),
                    depth: depth_key(&rotated),
                })
            }
        }
    }
}

/// Texel coordinates of a face's corners for the frame shown at `tick`.
///
/// Explicit UV rectangles are in 16ths of the texture width; without one the
/// UVs follow the face's own extents.
fn face_uvs(
    direction: Direction,
    face: &Face,
    corners: &[Vector3<f32>; 4],
    texture: &TextureAnimation,
    tick: u64,
) -> [Vector2<f32>; 4] {
    let k = texture.width() as f32 / 16.0;
    let offset = Vector2::new(0.0, texture.frame_offset(tick));
    match face.uv {
        Some([u1, v1, u2, v2]) => [
            Vector2::new(u1, v1),
            Vector2::new(u2, v1),
            Vector2::new(u2, v2),
            Vector2::new(u1, v2),
        ]
        .map(|uv| uv * k + offset),
        None => corners.map(|corner| direction.infer_uv(corner) * k + offset),
    }
}
