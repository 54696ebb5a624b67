//! Frame sequence generation.
//!
//! This module drives the per-tick loop that turns a resolved [`Model`] into
//! one seamless animation loop of RGBA frames. Each tick the model's geometry
//! is projected into a render queue, composited onto a fresh transparent
//! [`Canvas`] and snapshotted.
//!
//! # User-facing types
//!
//! - [`render_sequence`] renders the frames of a model
//! - [`PreviewSequence`] pairs the frames with their playback cadence
//!
//! # Lifecycle
//!
//! For cuboid models:
//! 1. Derive the loop length from the model's animated textures
//! 2. Truncate it to the configured maximum
//! 3. For every tick build the render queue with the cuboid projector
//! 4. Sort by depth (declaration order for flat items) and draw
//! 5. Stop after the first frame when nothing is animated
//!
//! Mesh models always produce a single frame at the mesh output size.

use image::RgbaImage;

use crate::{
    context::Context,
    data_structures::{mesh::Mesh, model::Model, texture::TextureSet},
    pipelines::{cuboid::CuboidProjector, mesh::MeshProjector},
    render::{Canvas, DrawOrder, composite},
};

/// Render every frame of one loop of `model`.
///
/// An invalid model yields no frames; a model without animated textures
/// yields exactly one.
pub fn render_sequence(model: &Model, ctx: &Context) -> Vec<RgbaImage> {
    let descriptor = &model.descriptor;
    if !descriptor.valid {
        log::debug!("Model {} is invalid; no frames rendered.", descriptor.id);
        return Vec::new();
    }
    if let Some(mesh) = descriptor.mesh() {
        return render_mesh(mesh, &model.textures, ctx).into_iter().collect();
    }

    let projector = CuboidProjector::new(descriptor, &model.textures, ctx);
    let order = projector.camera().draw_order();
    let animated = model.textures.any_animated();
    let mut ticks = if animated { model.textures.loop_ticks() } else { 1 };
    if ticks > ctx.max_loop_ticks {
        log::warn!(
            "Animation loop of {} is {ticks} ticks; truncating to {}.",
            descriptor.id,
            ctx.max_loop_ticks
        );
        ticks = ctx.max_loop_ticks.max(1);
    }
    log::debug!("Rendering {} over {ticks} tick(s).", descriptor.id);

    let mut frames = Vec::new();
    for tick in 0..ticks {
        let mut canvas = Canvas::new(ctx.output_size);
        composite(projector.queue(tick), order, &mut canvas);
        frames.push(canvas.into_image());
    }
    frames
}

fn render_mesh(mesh: &Mesh, textures: &TextureSet, ctx: &Context) -> Option<RgbaImage> {
    if mesh.is_empty() {
        log::warn!("Mesh has no vertices; nothing to render.");
        return None;
    }
    let projector = MeshProjector::new(mesh, textures, ctx.mesh_output_size);
    let mut canvas = Canvas::new(ctx.mesh_output_size);
    composite(projector.queue(), DrawOrder::DepthSorted, &mut canvas);
    Some(canvas.into_image())
}

/// The rendered loop of a model together with its playback cadence.
#[derive(Clone, Debug)]
pub struct PreviewSequence {
    pub frames: Vec<RgbaImage>,
    /// Display time of each frame in milliseconds.
    pub tick_millis: u64,
}

impl PreviewSequence {
    pub fn render(model: &Model, ctx: &Context) -> Self {
        Self {
            frames: render_sequence(model, ctx),
            tick_millis: ctx.tick_millis,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Total playback time of one loop.
    pub fn duration_millis(&self) -> u64 {
        self.frames.len() as u64 * self.tick_millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_nothing_for_invalid_model() {
        let preview = PreviewSequence::render(&Model::invalid("broken"), &Context::default());
        assert!(preview.is_empty());
        assert_eq!(preview.duration_millis(), 0);
    }
}
