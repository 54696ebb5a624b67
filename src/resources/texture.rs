use std::collections::{BTreeMap, HashSet};

use anyhow::Context as _;
use image::RgbaImage;

use crate::{
    context::Context,
    data_structures::{
        model::resolve_alias,
        texture::{TextureAnimation, TextureSet, Wrap},
    },
    resources::{AssetProvider, ResourceLocation, animation},
};

/// Decode raw image file data (PNG, JPEG, ...) into RGBA8.
pub fn decode_image(bytes: &[u8]) -> anyhow::Result<RgbaImage> {
    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgba8())
}

/// Fetch and decode one texture.
///
/// Images taller than wide are animated: frames are square tiles stacked
/// vertically. Their timing comes from the animation metadata when it can be
/// read, otherwise every tile is shown for one tick.
pub async fn load_texture<P: AssetProvider>(
    location: &ResourceLocation,
    provider: &P,
) -> anyhow::Result<TextureAnimation> {
    let bytes = provider.fetch_texture_image(location).await?;
    let image = decode_image(&bytes).with_context(|| format!("decoding texture {location}"))?;
    let mut texture = TextureAnimation::new(image);
    if texture.height() <= texture.width() {
        return Ok(texture);
    }

    texture.animated = true;
    match provider.fetch_animation_metadata(location).await {
        Ok(text) => match animation::parse_metadata(&text) {
            Ok(Some(meta)) => {
                texture.default_frame_time = meta.frame_time;
                texture.sequence = meta.frames;
            }
            Ok(None) => (),
            Err(e) => log::warn!("Animation metadata of {location} is unreadable: {e:#}"),
        },
        Err(e) => log::debug!("No animation metadata for {location}: {e:#}"),
    }
    Ok(texture)
}

/// Load every texture a model's texture table resolves to, once per path.
pub async fn load_model_textures<P: AssetProvider>(
    table: &BTreeMap<String, String>,
    provider: &P,
    ctx: &Context,
) -> TextureSet {
    let mut seen = HashSet::new();
    let mut textures = TextureSet::new();
    for value in table.values() {
        let path = resolve_alias(table, value, ctx.max_alias_hops);
        if path.starts_with('#') {
            log::debug!("Texture alias {value} does not resolve; skipping.");
            continue;
        }
        if !seen.insert(path.clone()) {
            continue;
        }
        let location = ResourceLocation::parse(&path, &ctx.default_namespace);
        match load_texture(&location, provider).await {
            Ok(texture) => {
                textures.insert(path, texture);
            }
            Err(e) => log::warn!("Texture {location} could not be loaded: {e:#}"),
        }
    }
    textures
}

/// Candidate texture locations for a mesh material's texture name.
pub fn material_texture_candidates(name: &str, namespace: &str, default_namespace: &str) -> Vec<ResourceLocation> {
    let (namespace, path) = match name.split_once(':') {
        Some((namespace, path)) => (namespace, path),
        None => (namespace, name),
    };
    let path = path.strip_suffix(".png").unwrap_or(path);
    if let Some(path) = path.strip_prefix("textures/") {
        return vec![ResourceLocation::new(namespace, path)];
    }
    let mut candidates = vec![
        ResourceLocation::new(namespace, path),
        ResourceLocation::new(namespace, format!("block/{path}")),
        ResourceLocation::new(namespace, format!("item/{path}")),
    ];
    if namespace != default_namespace {
        candidates.push(ResourceLocation::new(default_namespace, format!("block/{path}")));
    }
    candidates
}

/// Load the first decodable candidate for a mesh material's texture.
///
/// Mesh textures are never animated: the whole image is one frame, sampled
/// with wrap-around.
pub async fn load_material_texture<P: AssetProvider>(
    name: &str,
    namespace: &str,
    provider: &P,
    ctx: &Context,
) -> Option<TextureAnimation> {
    for location in material_texture_candidates(name, namespace, &ctx.default_namespace) {
        let bytes = match provider.fetch_texture_image(&location).await {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => continue,
            Err(e) => {
                log::debug!("{location} is not a texture for {name}: {e:#}");
                continue;
            }
        };
        match decode_image(&bytes) {
            Ok(image) => {
                let mut texture = TextureAnimation::single_frame(image);
                texture.wrap = Wrap::Repeat;
                return Some(texture);
            }
            Err(e) => log::debug!("{location} could not be decoded: {e:#}"),
        }
    }
    None
}
