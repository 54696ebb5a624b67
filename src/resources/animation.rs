use serde::Deserialize;
use serde_json::Value;

use crate::data_structures::texture::AnimationFrame;

/// Frame timing read from a texture's `.mcmeta` document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationMeta {
    pub frame_time: u32,
    pub frames: Vec<AnimationFrame>,
}

#[derive(Deserialize)]
struct AnimationSection {
    frametime: Option<i64>,
    #[serde(default)]
    frames: Vec<FrameEntry>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FrameEntry {
    Index(i64),
    Timed { index: Option<i64>, time: Option<i64> },
}

fn to_ticks(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

/// Parse animation metadata.
///
/// Accepts the `{"animation": {...}}` document as well as a bare
/// `{frametime, frames}` object. Returns `None` when the document carries no
/// animation section.
pub fn parse_metadata(text: &str) -> anyhow::Result<Option<AnimationMeta>> {
    let document: Value = serde_json::from_str(text)?;
    let section = match document.get("animation") {
        Some(section) => section.clone(),
        None if document.get("frametime").is_some() || document.get("frames").is_some() => document,
        None => return Ok(None),
    };
    let section: AnimationSection = serde_json::from_value(section)?;
    let frame_time = to_ticks(section.frametime.unwrap_or(1)).max(1);
    let frames = section
        .frames
        .into_iter()
        .map(|entry| match entry {
            FrameEntry::Index(index) => AnimationFrame {
                index: to_ticks(index),
                time: frame_time,
            },
            FrameEntry::Timed { index, time } => AnimationFrame {
                index: to_ticks(index.unwrap_or(0)),
                time: time.map_or(frame_time, to_ticks),
            },
        })
        .collect();
    Ok(Some(AnimationMeta { frame_time, frames }))
}
