//! Projection of imported polygon meshes.

use cgmath::{Vector2, Vector3};
use image::Rgba;

use crate::{
    data_structures::{
        mesh::{Mesh, MeshFace},
        texture::TextureSet,
    },
    pipelines::{depth_key, isometric},
    render::{RenderPolygon, RenderVertex},
};

/// Fill colour of faces whose material has no loaded texture.
pub const UNTEXTURED: Rgba<u8> = Rgba([150, 150, 150, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const PADDING: f32 = 0.85;

/// Isometric camera fitted to a mesh's projected bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitProjection {
    pub scale: f32,
    /// Centre of the projected bounding box, before scaling.
    pub content_center: Vector2<f32>,
    pub screen_center: Vector2<f32>,
}

impl FitProjection {
    /// `None` for a mesh without vertices.
    pub fn fit(positions: &[Vector3<f32>], output_size: u32) -> Option<Self> {
        let mut projected = positions.iter().map(|&p| isometric(p));
        let first = projected.next()?;
        let (min, max) = projected.fold((first, first), |(min, max), p| {
            (
                Vector2::new(min.x.min(p.x), min.y.min(p.y)),
                Vector2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        let extent = |d: f32| if d < 0.001 { 1.0 } else { d };
        let size = output_size as f32;
        let scale = (size * PADDING / extent(max.x - min.x)).min(size * PADDING / extent(max.y - min.y));
        Some(Self {
            scale,
            content_center: (min + max) / 2.0,
            screen_center: Vector2::new(size / 2.0, size / 2.0),
        })
    }

    pub fn project(&self, point: Vector3<f32>) -> Vector2<f32> {
        self.screen_center + (isometric(point) - self.content_center) * self.scale
    }
}

/// Builds the render queue of a mesh-sourced model.
pub struct MeshProjector<'a> {
    mesh: &'a Mesh,
    textures: &'a TextureSet,
    projection: Option<FitProjection>,
}

impl<'a> MeshProjector<'a> {
    pub fn new(mesh: &'a Mesh, textures: &'a TextureSet, output_size: u32) -> Self {
        Self {
            mesh,
            textures,
            projection: FitProjection::fit(&mesh.positions, output_size),
        }
    }

    pub fn projection(&self) -> Option<FitProjection> {
        self.projection
    }

    /// One polygon per face with at least three corners. Faces whose material
    /// texture cannot be matched are kept, filled with [`UNTEXTURED`]; faces
    /// without any material are filled white.
    pub fn queue(&self) -> Vec<RenderPolygon<'a>> {
        let Some(projection) = self.projection else {
            return Vec::new();
        };
        self.mesh
            .faces
            .iter()
            .filter(|face| face.arity() >= 3)
            .filter_map(|face| self.project_face(face, &projection))
            .collect()
    }

    fn project_face(&self, face: &MeshFace, projection: &FitProjection) -> Option<RenderPolygon<'a>> {
        let corners = face
            .positions
            .iter()
            .map(|&idx| self.mesh.positions.get(idx).copied())
            .collect::<Option<Vec<_>>>()?;
        let texture = self
            .mesh
            .face_texture(face)
            .and_then(|name| self.textures.find_material(name));

        let vertices = corners
            .iter()
            .enumerate()
            .map(|(i, &corner)| {
                let uv = match texture {
                    Some(texture) => face
                        .texcoords
                        .get(i)
                        .copied()
                        .flatten()
                        .and_then(|idx| self.mesh.texcoords.get(idx))
                        .map(|uv| {
                            Vector2::new(uv.x * texture.width() as f32, (1.0 - uv.y) * texture.height() as f32)
                        })
                        .unwrap_or(Vector2::new(0.0, 0.0)),
                    None => Vector2::new(0.0, 0.0),
                };
                RenderVertex {
                    position: projection.project(corner),
                    uv,
                }
            })
            .collect();

        Some(RenderPolygon {
            vertices,
            texture,
            tint: if texture.is_some() || face.material.is_none() {
                WHITE
            } else {
                UNTEXTURED
            },
            depth: depth_key(&corners),
        })
    }
}
