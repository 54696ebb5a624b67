//! Resolved model descriptors.
//!
//! A [`ModelDescriptor`] is the inheritance-flattened view of one previewable
//! model: its texture alias table and exactly one geometry source, either a
//! list of cuboid [`Element`]s or an imported [`Mesh`]. A [`Model`] pairs the
//! descriptor with the [`TextureSet`] loaded while resolving it.

use std::collections::BTreeMap;

use cgmath::{Deg, Matrix3, Vector3};
use serde::Deserialize;

use crate::data_structures::{face::Direction, mesh::Mesh, texture::TextureSet};

/// Axis an element rotation turns around.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

/// Single-axis rotation of an element about `origin`, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementRotation {
    pub origin: Vector3<f32>,
    pub axis: Axis,
    pub angle: f32,
}

impl ElementRotation {
    pub fn apply(&self, point: Vector3<f32>) -> Vector3<f32> {
        if self.angle == 0.0 {
            return point;
        }
        let matrix = match self.axis {
            Axis::X => Matrix3::from_angle_x(Deg(self.angle)),
            // positive y angles turn +x towards +z
            Axis::Y => Matrix3::from_angle_y(Deg(-self.angle)),
            Axis::Z => Matrix3::from_angle_z(Deg(self.angle)),
        };
        matrix * (point - self.origin) + self.origin
    }
}

/// One face of an element: a texture reference and an optional UV rectangle
/// `[u1, v1, u2, v2]` in 16ths of the texture width.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub texture: String,
    pub uv: Option<[f32; 4]>,
}

/// An axis-aligned box in 16-units-per-block space.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub from: Vector3<f32>,
    pub to: Vector3<f32>,
    pub rotation: Option<ElementRotation>,
    pub faces: BTreeMap<Direction, Face>,
}

impl Element {
    pub fn new(from: Vector3<f32>, to: Vector3<f32>) -> Self {
        Self {
            from,
            to,
            rotation: None,
            faces: BTreeMap::new(),
        }
    }

    pub fn with_face(mut self, direction: Direction, texture: impl Into<String>, uv: Option<[f32; 4]>) -> Self {
        self.faces.insert(
            direction,
            Face {
                texture: texture.into(),
                uv,
            },
        );
        self
    }

    pub fn rotate(&self, point: Vector3<f32>) -> Vector3<f32> {
        match &self.rotation {
            Some(rotation) => rotation.apply(point),
            None => point,
        }
    }
}

/// Where the geometry of a model comes from.
#[derive(Clone, Debug)]
pub enum Geometry {
    Elements(Vec<Element>),
    Mesh(Mesh),
}

/// The resolved description of one model.
#[derive(Clone, Debug)]
pub struct ModelDescriptor {
    pub id: String,
    /// The root model's own parent reference, if any.
    pub parent: Option<String>,
    /// Texture keys to texture paths or `#key` aliases, merged over the parent chain.
    pub textures: BTreeMap<String, String>,
    pub geometry: Geometry,
    /// Rendered as a single 2D billboard instead of projected geometry.
    pub flat_item: bool,
    /// False when the root document could not be read at all.
    pub valid: bool,
}

impl ModelDescriptor {
    /// The descriptor produced for an unreadable root document.
    pub fn invalid(id: &str) -> Self {
        Self {
            id: id.to_string(),
            parent: None,
            textures: BTreeMap::new(),
            geometry: Geometry::Elements(Vec::new()),
            flat_item: false,
            valid: false,
        }
    }

    pub fn elements(&self) -> &[Element] {
        match &self.geometry {
            Geometry::Elements(elements) => elements,
            Geometry::Mesh(_) => &[],
        }
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.geometry {
            Geometry::Mesh(mesh) => Some(mesh),
            Geometry::Elements(_) => None,
        }
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.geometry, Geometry::Mesh(_))
    }

    /// Follow `#key` aliases of `reference` through the texture table.
    pub fn resolve_texture(&self, reference: &str, max_hops: usize) -> String {
        resolve_alias(&self.textures, reference, max_hops)
    }
}

/// Replace a `#key` reference with the table value for `key`, at most
/// `max_hops` times. A missing key or an exhausted hop budget leaves the last
/// value in place.
pub fn resolve_alias<S: AsRef<str>>(table: &BTreeMap<String, S>, reference: &str, max_hops: usize) -> String {
    let mut current = reference.to_string();
    for _ in 0..max_hops {
        let Some(key) = current.strip_prefix('#') else {
            break;
        };
        match table.get(key) {
            Some(next) => current = next.as_ref().to_string(),
            None => break,
        }
    }
    current
}

/// A resolved model together with the textures it references.
#[derive(Clone, Debug)]
pub struct Model {
    pub descriptor: ModelDescriptor,
    pub textures: TextureSet,
}

impl Model {
    pub fn invalid(id: &str) -> Self {
        Self {
            descriptor: ModelDescriptor::invalid(id),
            textures: TextureSet::new(),
        }
    }
}
