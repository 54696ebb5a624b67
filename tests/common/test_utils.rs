#![allow(dead_code)]

use std::{collections::HashMap, io::Cursor, sync::Mutex};

use anyhow::anyhow;
use iso_preview::{
    Rgba, RgbaImage,
    render::{RenderPolygon, Surface},
    resources::{AssetProvider, ResourceLocation},
};

/// In-memory asset provider. Every fetch is recorded so tests can check what
/// the loaders asked for.
#[derive(Default)]
pub(crate) struct MemoryAssets {
    models: HashMap<ResourceLocation, String>,
    textures: HashMap<ResourceLocation, Vec<u8>>,
    metadata: HashMap<ResourceLocation, String>,
    meshes: HashMap<ResourceLocation, String>,
    materials: HashMap<ResourceLocation, String>,
    fetched: Mutex<Vec<String>>,
}

fn location(id: &str) -> ResourceLocation {
    ResourceLocation::parse(id, "minecraft")
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, id: &str, json: &str) -> Self {
        self.models.insert(location(id), json.to_string());
        self
    }

    pub fn texture(mut self, id: &str, image: &RgbaImage) -> Self {
        self.textures.insert(location(id), png(image));
        self
    }

    pub fn raw_texture(mut self, id: &str, bytes: &[u8]) -> Self {
        self.textures.insert(location(id), bytes.to_vec());
        self
    }

    pub fn metadata(mut self, texture_id: &str, json: &str) -> Self {
        self.metadata.insert(location(texture_id), json.to_string());
        self
    }

    pub fn mesh(mut self, id: &str, obj: &str, mtl: &str) -> Self {
        self.meshes.insert(location(id), obj.to_string());
        self.materials.insert(location(id), mtl.to_string());
        self
    }

    /// Every fetch so far as `kind namespace:path`.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn fetch_count(&self, entry: &str) -> usize {
        self.fetched().iter().filter(|e| *e == entry).count()
    }

    fn record(&self, kind: &str, location: &ResourceLocation) {
        self.fetched.lock().unwrap().push(format!("{kind} {location}"));
    }
}

fn lookup<T: Clone>(map: &HashMap<ResourceLocation, T>, location: &ResourceLocation) -> anyhow::Result<T> {
    map.get(location).cloned().ok_or_else(|| anyhow!("{location} not found"))
}

impl AssetProvider for MemoryAssets {
    async fn fetch_model_json(&self, location: &ResourceLocation) -> anyhow::Result<String> {
        self.record("model", location);
        lookup(&self.models, location)
    }

    async fn fetch_texture_image(&self, location: &ResourceLocation) -> anyhow::Result<Vec<u8>> {
        self.record("texture", location);
        lookup(&self.textures, location)
    }

    async fn fetch_animation_metadata(&self, texture: &ResourceLocation) -> anyhow::Result<String> {
        self.record("mcmeta", texture);
        lookup(&self.metadata, texture)
    }

    async fn fetch_mesh(&self, location: &ResourceLocation) -> anyhow::Result<String> {
        self.record("obj", location);
        lookup(&self.meshes, location)
    }

    async fn fetch_materials(&self, location: &ResourceLocation) -> anyhow::Result<String> {
        self.record("mtl", location);
        lookup(&self.materials, location)
    }
}

pub(crate) fn solid(width: u32, height: u32, colour: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, colour)
}

/// A vertical strip of `frames` square tiles, tile `i` filled with `colours[i]`.
pub(crate) fn strip(size: u32, colours: &[Rgba<u8>]) -> RgbaImage {
    RgbaImage::from_fn(size, size * colours.len() as u32, |_, y| colours[(y / size) as usize])
}

pub(crate) fn png(image: &RgbaImage) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("Failed to encode test PNG.");
    bytes.into_inner()
}

/// Records the tint and depth of every polygon in draw order.
#[derive(Default)]
pub(crate) struct Recorder {
    pub draws: Vec<(Rgba<u8>, f32, bool)>,
}

impl Surface for Recorder {
    fn draw(&mut self, polygon: &RenderPolygon<'_>) {
        self.draws.push((polygon.tint, polygon.depth, polygon.texture.is_some()));
    }
}

pub(crate) const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub(crate) const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
pub(crate) const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
pub(crate) const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
