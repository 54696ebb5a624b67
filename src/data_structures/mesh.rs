//! Imported polygon meshes.
//!
//! A [`Mesh`] is the alternate geometry source of a model: arbitrary polygons
//! (usually triangles or quads) with per-face materials, as read from an OBJ
//! file. Positions and texture coordinates are shared pools indexed by faces.

use cgmath::{Vector2, Vector3};

/// A material of an imported mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshMaterial {
    pub name: String,
    /// Texture name as written in the material file (`map_Kd`).
    pub diffuse_texture: Option<String>,
}

/// One polygon of a mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshFace {
    /// Indices into [`Mesh::positions`], one per corner.
    pub positions: Vec<usize>,
    /// Indices into [`Mesh::texcoords`], one per corner when present.
    pub texcoords: Vec<Option<usize>>,
    /// Index into [`Mesh::materials`].
    pub material: Option<usize>,
}

impl MeshFace {
    pub fn arity(&self) -> usize {
        self.positions.len()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vector3<f32>>,
    /// Normalized texture coordinates with the origin at the bottom left.
    pub texcoords: Vec<Vector2<f32>>,
    pub faces: Vec<MeshFace>,
    pub materials: Vec<MeshMaterial>,
}

impl Mesh {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The texture name of a face's material, if it has one.
    pub fn face_texture(&self, face: &MeshFace) -> Option<&str> {
        face.material
            .and_then(|idx| self.materials.get(idx))
            .and_then(|material| material.diffuse_texture.as_deref())
    }
}
