//! Render configuration shared by every stage of the preview pipeline.

use serde::Deserialize;

/// Settings for resolving and rendering one preview.
///
/// `Context` can be deserialized from a partial document; missing fields keep
/// their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Context {
    /// Edge length in pixels of frames rendered from cuboid elements.
    pub output_size: u32,
    /// Edge length in pixels of frames rendered from imported meshes.
    pub mesh_output_size: u32,
    /// Real time covered by one animation tick.
    pub tick_millis: u64,
    /// Longest frame sequence rendered for one model; longer loops are truncated.
    pub max_loop_ticks: u64,
    /// Namespace used for references without a `namespace:` prefix.
    pub default_namespace: String,
    /// How many parents are merged into a model at most.
    pub max_parent_depth: usize,
    /// Alias hops followed when loading textures.
    pub max_alias_hops: usize,
    /// Alias hops followed when a face looks up its texture.
    pub max_face_alias_hops: usize,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            output_size: 64,
            mesh_output_size: 128,
            tick_millis: 50,
            max_loop_ticks: 6000,
            default_namespace: "minecraft".to_string(),
            max_parent_depth: 10,
            max_alias_hops: 10,
            max_face_alias_hops: 5,
        }
    }
}

impl Context {
    pub fn with_output_size(mut self, size: u32) -> Self {
        self.output_size = size;
        self
    }

    pub fn with_mesh_output_size(mut self, size: u32) -> Self {
        self.mesh_output_size = size;
        self
    }
}
