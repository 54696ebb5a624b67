//! iso-preview
//!
//! Renders animated isometric preview sprites from block and item model
//! descriptors. A model is resolved through its inheritance chain, its
//! textures are loaded once and their animations synchronized into a single
//! loop, and every tick is projected, depth sorted and rasterized in software
//! into an RGBA frame. Imported OBJ meshes are supported as an alternate
//! geometry source.
//!
//! High-level modules
//! - `context`: render configuration shared by all stages
//! - `data_structures`: model descriptors, faces, textures and meshes
//! - `resources`: asset providers and the loaders that resolve models
//! - `pipelines`: isometric projection of cuboid elements and meshes
//! - `render`: render queues, compositing and the software canvas
//! - `flow`: the per-tick loop producing a frame sequence
//!

pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::{Vector2, Vector3};
pub use image::{Rgba, RgbaImage};
