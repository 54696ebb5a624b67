//! Preview data structures: model descriptors, faces, textures and meshes.
//!
//! - `face` holds the six face directions and their fixed corner tables
//! - `model` contains the resolved model descriptor and cuboid elements
//! - `texture` contains decoded textures, animation timelines and the texture registry
//! - `mesh` holds imported polygon meshes for the alternate geometry path

pub mod face;
pub mod mesh;
pub mod model;
pub mod texture;
