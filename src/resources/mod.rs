use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, bail};

use crate::{
    context::Context,
    data_structures::{
        model::{Geometry, Model, ModelDescriptor},
        texture::TextureSet,
    },
};

/**
 * This module contains all logic for loading model descriptors, textures and
 * meshes through an [`AssetProvider`].
 */
pub mod animation;
pub mod mesh;
pub mod model;
pub mod texture;

/// A namespaced asset id such as `minecraft:block/stone`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceLocation {
    pub namespace: String,
    pub path: String,
}

impl ResourceLocation {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// Split `namespace:path`, falling back to `default_namespace` without a colon.
    pub fn parse(id: &str, default_namespace: &str) -> Self {
        match id.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(default_namespace, id),
        }
    }
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

/// Source of model documents, texture images and animation metadata.
///
/// Model locations are relative to the `models/` directory of their namespace
/// and texture locations to `textures/`, both without file extension. Any
/// failure is treated as "asset absent" by the loaders.
#[allow(async_fn_in_trait)]
pub trait AssetProvider {
    async fn fetch_model_json(&self, location: &ResourceLocation) -> anyhow::Result<String>;

    async fn fetch_texture_image(&self, location: &ResourceLocation) -> anyhow::Result<Vec<u8>>;

    /// The `.mcmeta` document next to a texture.
    async fn fetch_animation_metadata(&self, texture: &ResourceLocation) -> anyhow::Result<String>;

    /// OBJ text of a mesh model.
    async fn fetch_mesh(&self, location: &ResourceLocation) -> anyhow::Result<String> {
        bail!("meshes are not provided (requested {location})")
    }

    /// MTL text belonging to a mesh model.
    async fn fetch_materials(&self, location: &ResourceLocation) -> anyhow::Result<String> {
        bail!("materials are not provided (requested {location})")
    }
}

/// Reads assets from a resource-pack style directory:
/// `<root>/<namespace>/models/<path>.json`, `<root>/<namespace>/textures/<path>.png`,
/// `<path>.png.mcmeta`, and `<path>.obj` / `<path>.mtl` next to the models.
#[derive(Clone, Debug)]
pub struct AssetDir {
    root: PathBuf,
}

impl AssetDir {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn file(&self, location: &ResourceLocation, kind: &str, extension: &str) -> PathBuf {
        self.root
            .join(&location.namespace)
            .join(kind)
            .join(format!("{}.{extension}", location.path))
    }
}

impl AssetProvider for AssetDir {
    async fn fetch_model_json(&self, location: &ResourceLocation) -> anyhow::Result<String> {
        let path = self.file(location, "models", "json");
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading model {}", path.display()))
    }

    async fn fetch_texture_image(&self, location: &ResourceLocation) -> anyhow::Result<Vec<u8>> {
        let path = self.file(location, "textures", "png");
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading texture {}", path.display()))
    }

    async fn fetch_animation_metadata(&self, texture: &ResourceLocation) -> anyhow::Result<String> {
        let path = self.file(texture, "textures", "png.mcmeta");
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading animation metadata {}", path.display()))
    }

    async fn fetch_mesh(&self, location: &ResourceLocation) -> anyhow::Result<String> {
        let path = self.file(location, "models", "obj");
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading mesh {}", path.display()))
    }

    async fn fetch_materials(&self, location: &ResourceLocation) -> anyhow::Result<String> {
        let path = self.file(location, "models", "mtl");
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading materials {}", path.display()))
    }
}

/// Fetch the model `id` and resolve it.
///
/// An unreachable root document yields an invalid model, which renders to no frames.
pub async fn load_model<P: AssetProvider>(id: &str, provider: &P, ctx: &Context) -> Model {
    let location = ResourceLocation::parse(id, &ctx.default_namespace);
    match provider.fetch_model_json(&location).await {
        Ok(json) => load_model_json(id, &json, provider, ctx).await,
        Err(e) => {
            log::warn!("Model {id} could not be fetched: {e:#}");
            Model::invalid(id)
        }
    }
}

/// Resolve a model from its JSON text: merge the parent chain, load every
/// referenced texture once and synthesize default geometry when needed.
pub async fn load_model_json<P: AssetProvider>(id: &str, raw_json: &str, provider: &P, ctx: &Context) -> Model {
    let mut raw = match model::RawModel::parse(raw_json) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("Model {id} is not a valid model document: {e:#}");
            return Model::invalid(id);
        }
    };
    if raw.loader.is_some() {
        log::debug!("Model {id} names a custom loader; rendering its declared geometry only.");
    }
    model::merge_parents(&mut raw, provider, ctx).await;
    let textures = texture::load_model_textures(&raw.texture_table(), provider, ctx).await;
    let descriptor = model::into_descriptor(id, raw);
    log::debug!(
        "Resolved {id}: {} element(s), {} texture(s)",
        descriptor.elements().len(),
        textures.len()
    );
    Model { descriptor, textures }
}

/// Build a mesh-sourced model from OBJ and MTL text.
///
/// Material textures are looked up in `namespace` unless they carry their own
/// prefix. Unresolvable textures leave their faces untextured.
pub async fn load_model_obj<P: AssetProvider>(
    id: &str,
    obj_text: &str,
    mtl_text: &str,
    namespace: &str,
    provider: &P,
    ctx: &Context,
) -> anyhow::Result<Model> {
    let mesh = mesh::parse_obj(obj_text, mtl_text).await?;
    let mut textures = TextureSet::new();
    for material in &mesh.materials {
        let Some(name) = material.diffuse_texture.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };
        if textures.contains(name) {
            continue;
        }
        match texture::load_material_texture(name, namespace, provider, ctx).await {
            Some(texture) => {
                textures.insert(name, texture);
            }
            None => log::warn!("Failed to load texture for OBJ material {}: {name}", material.name),
        }
    }
    let descriptor = ModelDescriptor {
        id: id.to_string(),
        parent: None,
        textures: Default::default(),
        geometry: Geometry::Mesh(mesh),
        flat_item: false,
        valid: true,
    };
    Ok(Model { descriptor, textures })
}

/// Fetch a mesh model's OBJ and MTL documents through the provider and build it.
pub async fn load_mesh_model<P: AssetProvider>(id: &str, provider: &P, ctx: &Context) -> anyhow::Result<Model> {
    let location = ResourceLocation::parse(id, &ctx.default_namespace);
    let obj_text = provider.fetch_mesh(&location).await?;
    let mtl_text = match provider.fetch_materials(&location).await {
        Ok(text) => text,
        Err(e) => {
            log::warn!("Mesh {id} has no materials: {e:#}");
            String::new()
        }
    };
    load_model_obj(id, &obj_text, &mtl_text, &location.namespace, provider, ctx).await
}
