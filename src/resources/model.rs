//! Model documents: parsing, parent inheritance and default geometry.

use std::collections::BTreeMap;

use cgmath::Vector3;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    context::Context,
    data_structures::{
        face::Direction,
        model::{Axis, Element, ElementRotation, Face, Geometry, ModelDescriptor},
    },
    resources::{AssetProvider, ResourceLocation},
};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawModel {
    pub parent: Option<String>,
    pub loader: Option<String>,
    #[serde(default)]
    pub textures: BTreeMap<String, Value>,
    pub elements: Option<Vec<RawElement>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawElement {
    pub from: [f32; 3],
    pub to: [f32; 3],
    pub rotation: Option<RawRotation>,
    #[serde(default)]
    pub faces: BTreeMap<String, RawFace>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawRotation {
    #[serde(default = "block_center")]
    pub origin: [f32; 3],
    #[serde(default)]
    pub axis: Axis,
    #[serde(default)]
    pub angle: f32,
}

fn block_center() -> [f32; 3] {
    [8.0; 3]
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawFace {
    #[serde(default)]
    pub texture: String,
    pub uv: Option<[f32; 4]>,
}

impl RawModel {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Texture entries with string values; anything else is ignored.
    pub fn texture_table(&self) -> BTreeMap<String, String> {
        self.textures
            .iter()
            .filter_map(|(key, value)| value.as_str().map(|v| (key.clone(), v.to_string())))
            .collect()
    }

    /// Models inheriting from `item/generated` or carrying a `layer0`
    /// texture are drawn as a flat sprite.
    pub fn is_flat_item(&self) -> bool {
        self.parent
            .as_deref()
            .is_some_and(|parent| parent.contains("item/generated"))
            || self.textures.contains_key("layer0")
    }

    fn inherit(&mut self, parent: &RawModel) {
        for (key, value) in &parent.textures {
            self.textures.entry(key.clone()).or_insert_with(|| value.clone());
        }
        if self.elements.is_none() {
            self.elements = parent.elements.clone();
        }
    }
}

/// Merge parent textures and elements into `model`, climbing at most
/// `ctx.max_parent_depth` levels. A parent that cannot be fetched or parsed
/// ends the climb and keeps what was merged so far.
pub async fn merge_parents<P: AssetProvider>(model: &mut RawModel, provider: &P, ctx: &Context) {
    let mut next_parent = model.parent.clone();
    let mut depth = 0;
    while let Some(parent_id) = next_parent.take() {
        if depth >= ctx.max_parent_depth {
            log::debug!("Stopped climbing parents at {parent_id}: depth limit reached.");
            break;
        }
        if parent_id.contains("builtin/") {
            break;
        }
        let location = ResourceLocation::parse(&parent_id, &ctx.default_namespace);
        let text = match provider.fetch_model_json(&location).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Failed to download parent model {location}: {e:#}");
                break;
            }
        };
        let parent = match RawModel::parse(&text) {
            Ok(parent) => parent,
            Err(e) => {
                log::warn!("Error parsing parent model {location}: {e:#}");
                break;
            }
        };
        model.inherit(&parent);
        next_parent = parent.parent;
        depth += 1;
    }
}

/// Turn a merged document into a descriptor, synthesizing a flat quad or a
/// full cube when it declares no elements.
pub fn into_descriptor(id: &str, raw: RawModel) -> ModelDescriptor {
    let flat_item = raw.is_flat_item();
    let textures = raw.texture_table();
    let elements = match &raw.elements {
        Some(elements) => elements.iter().map(to_element).collect(),
        None if flat_item => vec![flat_item_element()],
        None => vec![default_cube(&textures)],
    };
    ModelDescriptor {
        id: id.to_string(),
        parent: raw.parent,
        textures,
        geometry: Geometry::Elements(elements),
        flat_item,
        valid: true,
    }
}

fn to_element(raw: &RawElement) -> Element {
    let faces = raw
        .faces
        .iter()
        .filter(|(_, face)| !face.texture.is_empty())
        .filter_map(|(name, face)| match name.parse::<Direction>() {
            Ok(direction) => Some((
                direction,
                Face {
                    texture: face.texture.clone(),
                    uv: face.uv,
                },
            )),
            Err(e) => {
                log::debug!("Ignoring face: {e}");
                None
            }
        })
        .collect();
    Element {
        from: raw.from.into(),
        to: raw.to.into(),
        rotation: raw.rotation.as_ref().map(|r| ElementRotation {
            origin: r.origin.into(),
            axis: r.axis,
            angle: r.angle,
        }),
        faces,
    }
}

fn flat_item_element() -> Element {
    Element::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(16.0, 16.0, 0.0)).with_face(
        Direction::North,
        "#layer0",
        Some([0.0, 0.0, 16.0, 16.0]),
    )
}

fn default_cube(textures: &BTreeMap<String, String>) -> Element {
    let mut cube = Element::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(16.0, 16.0, 16.0));
    for direction in Direction::ALL {
        let key = std::iter::once(direction.name())
            .chain(direction.fallback_texture_keys().iter().copied())
            .chain(std::iter::once("all"))
            .find(|key| textures.contains_key(*key));
        if let Some(key) = key {
            cube = cube.with_face(direction, format!("#{key}"), None);
        }
    }
    cube
}
