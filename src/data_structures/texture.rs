//! Decoded textures and their animation timelines.
//!
//! This module provides [`TextureAnimation`], one decoded raster image plus
//! optional per-frame timing, and [`TextureSet`], the registry of every unique
//! texture a model references. The set also derives the loop period shared by
//! all animated textures.

use std::collections::BTreeMap;

use image::{Rgba, RgbaImage};

/// One entry of an explicit animation sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationFrame {
    /// Index of the physical frame (square tile stacked vertically).
    pub index: u32,
    /// How many ticks the frame stays on screen.
    pub time: u32,
}

/// How texel lookups outside the image are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Wrap {
    #[default]
    Clamp,
    Repeat,
}

/// A decoded texture, possibly animated.
///
/// Animated textures are square frames stacked vertically, so the frame height
/// equals the image width. The timeline either follows an explicit
/// [`AnimationFrame`] sequence or steps through every physical frame with
/// `default_frame_time` ticks each.
#[derive(Clone, Debug)]
pub struct TextureAnimation {
    pub image: RgbaImage,
    pub animated: bool,
    pub frame_height: u32,
    pub default_frame_time: u32,
    pub sequence: Vec<AnimationFrame>,
    pub wrap: Wrap,
}

impl TextureAnimation {
    /// A still texture whose frames are as tall as the image is wide.
    pub fn new(image: RgbaImage) -> Self {
        let frame_height = image.width().max(1);
        Self {
            image,
            animated: false,
            frame_height,
            default_frame_time: 1,
            sequence: Vec::new(),
            wrap: Wrap::Clamp,
        }
    }

    /// A still texture sampled as one frame covering the whole image.
    pub fn single_frame(image: RgbaImage) -> Self {
        let frame_height = image.height().max(1);
        Self {
            frame_height,
            ..Self::new(image)
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Number of frames physically present in the image.
    pub fn physical_frames(&self) -> u32 {
        (self.height() / self.frame_height.max(1)).max(1)
    }

    /// Length of one loop of this texture in ticks, clamped to `1..=u32::MAX`.
    pub fn total_duration(&self) -> u32 {
        let total: u64 = if self.sequence.is_empty() {
            u64::from(self.physical_frames()) * u64::from(self.default_frame_time.max(1))
        } else {
            self.sequence
                .iter()
                .fold(0u64, |sum, frame| sum.saturating_add(u64::from(frame.time)))
        };
        u32::try_from(total).unwrap_or(u32::MAX).max(1)
    }

    /// The physical frame shown at `tick`.
    pub fn frame_index(&self, tick: u64) -> u32 {
        if !self.animated {
            return 0;
        }
        let local = tick % u64::from(self.total_duration());
        if self.sequence.is_empty() {
            let step = local / u64::from(self.default_frame_time.max(1));
            return (step % u64::from(self.physical_frames())) as u32;
        }
        let mut elapsed = 0u64;
        for frame in &self.sequence {
            elapsed += u64::from(frame.time);
            if local < elapsed {
                return frame.index.min(self.physical_frames() - 1);
            }
        }
        0
    }

    /// Vertical texel offset of the frame shown at `tick`.
    pub fn frame_offset(&self, tick: u64) -> f32 {
        (self.frame_index(tick) * self.frame_height) as f32
    }

    /// Point-sample the texel containing `(u, v)` (texel space).
    pub fn sample(&self, u: f32, v: f32) -> Rgba<u8> {
        let (w, h) = (i64::from(self.width()), i64::from(self.height()));
        if w == 0 || h == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        let (x, y) = (u.floor() as i64, v.floor() as i64);
        let (x, y) = match self.wrap {
            Wrap::Clamp => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
            Wrap::Repeat => (x.rem_euclid(w), y.rem_euclid(h)),
        };
        *self.image.get_pixel(x as u32, y as u32)
    }
}

/// Every texture loaded for one model, keyed by resolved texture path.
///
/// Keys are kept ordered so that lookups which scan the set (material name
/// matching) are deterministic.
#[derive(Clone, Debug, Default)]
pub struct TextureSet {
    textures: BTreeMap<String, TextureAnimation>,
}

impl TextureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture. The first registration of a path wins.
    pub fn insert(&mut self, path: impl Into<String>, texture: TextureAnimation) -> bool {
        let path = path.into();
        if self.textures.contains_key(&path) {
            return false;
        }
        self.textures.insert(path, texture);
        true
    }

    pub fn get(&self, path: &str) -> Option<&TextureAnimation> {
        self.textures.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.textures.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TextureAnimation)> {
        self.textures.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn any_animated(&self) -> bool {
        self.textures.values().any(|t| t.animated)
    }

    /// Number of ticks after which every animated texture is back at its
    /// first frame: the least common multiple of their durations, or 1.
    pub fn loop_ticks(&self) -> u64 {
        self.textures
            .values()
            .filter(|t| t.animated)
            .map(|t| u64::from(t.total_duration()))
            .fold(1u64, |total, duration| {
                let step = duration / num::integer::gcd(total, duration);
                match total.checked_mul(step) {
                    Some(lcm) => lcm,
                    None => {
                        log::warn!(
                            "Animation loop overflowed while adding a {duration} tick texture; keeping {total} ticks."
                        );
                        total
                    }
                }
            })
    }

    /// Find the texture for a mesh material's texture name.
    ///
    /// An exact key match wins; otherwise keys and name are compared with
    /// their directories and extensions stripped.
    pub fn find_material(&self, name: &str) -> Option<&TextureAnimation> {
        if let Some(texture) = self.textures.get(name) {
            return Some(texture);
        }
        let wanted = normalize_texture_name(name);
        self.textures
            .iter()
            .find(|(key, _)| normalize_texture_name(key) == wanted)
            .map(|(_, texture)| texture)
    }
}

/// Strip the directory and extension of a texture file name.
pub fn normalize_texture_name(name: &str) -> &str {
    let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match file.rfind('.') {
        Some(dot) => &file[..dot],
        None => file,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(width: u32, frames: u32) -> TextureAnimation {
        let mut texture = TextureAnimation::new(RgbaImage::new(width, width * frames));
        texture.animated = frames > 1;
        texture
    }

    #[test]
    fn should_count_physical_frames_for_uniform_timeline() {
        let texture = strip(16, 3);
        assert_eq!(texture.physical_frames(), 3);
        assert_eq!(texture.total_duration(), 3);
        assert_eq!(texture.frame_index(4), 1);
    }

    #[test]
    fn should_walk_explicit_sequence() {
        let mut texture = strip(16, 4);
        texture.sequence = vec![
            AnimationFrame { index: 3, time: 2 },
            AnimationFrame { index: 0, time: 1 },
        ];
        assert_eq!(texture.total_duration(), 3);
        assert_eq!(texture.frame_index(0), 3);
        assert_eq!(texture.frame_index(1), 3);
        assert_eq!(texture.frame_index(2), 0);
        assert_eq!(texture.frame_index(3), 3);
    }

    #[test]
    fn should_saturate_duration_of_huge_timelines() {
        let mut texture = strip(16, 2);
        texture.sequence = vec![
            AnimationFrame { index: 0, time: u32::MAX },
            AnimationFrame { index: 1, time: u32::MAX },
        ];
        assert_eq!(texture.total_duration(), u32::MAX);
        assert_eq!(texture.frame_index(7), 0);

        let mut texture = strip(16, 2);
        texture.default_frame_time = 4_000_000_000;
        assert_eq!(texture.total_duration(), u32::MAX);
        assert_eq!(texture.frame_index(0), 0);
        assert_eq!(texture.frame_index(4_000_000_000), 1);
    }

    #[test]
    fn should_clamp_sequence_index_to_last_physical_frame() {
        let mut texture = strip(16, 2);
        texture.sequence = vec![AnimationFrame { index: 9, time: 1 }];
        assert_eq!(texture.frame_index(0), 1);
    }

    #[test]
    fn should_use_lcm_of_animated_durations() {
        let mut set = TextureSet::new();
        set.insert("a", strip(16, 3));
        set.insert("b", strip(16, 4));
        set.insert("still", strip(16, 1));
        assert_eq!(set.loop_ticks(), 12);
    }

    #[test]
    fn should_loop_once_without_animation() {
        let mut set = TextureSet::new();
        set.insert("still", strip(16, 1));
        assert_eq!(set.loop_ticks(), 1);
        assert_eq!(TextureSet::new().loop_ticks(), 1);
    }

    #[test]
    fn should_keep_first_registration() {
        let mut set = TextureSet::new();
        assert!(set.insert("a", strip(16, 1)));
        assert!(!set.insert("a", strip(16, 3)));
        assert_eq!(set.get("a").unwrap().physical_frames(), 1);
    }

    #[test]
    fn should_match_material_by_normalized_name() {
        let mut set = TextureSet::new();
        set.insert("minecraft:block/oak_planks", strip(16, 1));
        assert!(set.find_material("textures\\oak_planks.png").is_some());
        assert!(set.find_material("birch_planks.png").is_none());
        assert_eq!(normalize_texture_name("a/b/c.tar.png"), "c.tar");
    }

    #[test]
    fn should_repeat_or_clamp_samples() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([1, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([2, 0, 0, 255]));
        let mut texture = TextureAnimation::single_frame(image);
        assert_eq!(texture.sample(5.0, 0.0).0[0], 2);
        texture.wrap = Wrap::Repeat;
        assert_eq!(texture.sample(2.5, 0.0).0[0], 1);
        assert_eq!(texture.sample(-0.5, 0.0).0[0], 2);
    }
}
