//! Face directions of a cuboid element.
//!
//! A [`Direction`] names one of the six planar quads of an element. Each
//! direction carries a fixed corner table, the axes its texture is inferred
//! from, a flat shade and the texture keys a synthesized cube falls back on.

use std::{fmt, str::FromStr};

use cgmath::{Vector2, Vector3};
use image::Rgba;

/// The six faces of an element.
///
/// Variants are declared in draw order, so iterating a `BTreeMap<Direction, _>`
/// yields faces in the order they are enqueued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Up,
    North,
    East,
    West,
    South,
    Down,
}

/// Selects the `to` (true) or `from` (false) coordinate per axis for one corner.
type Corner = [bool; 3];

const UP: [Corner; 4] = [
    [false, true, false],
    [true, true, false],
    [true, true, true],
    [false, true, true],
];
const NORTH: [Corner; 4] = [
    [true, true, false],
    [false, true, false],
    [false, false, false],
    [true, false, false],
];
const EAST: [Corner; 4] = [
    [true, true, true],
    [true, true, false],
    [true, false, false],
    [true, false, true],
];
const WEST: [Corner; 4] = [
    [false, true, false],
    [false, true, true],
    [false, false, true],
    [false, false, false],
];
const SOUTH: [Corner; 4] = [
    [false, true, true],
    [true, true, true],
    [true, false, true],
    [false, false, true],
];
const DOWN: [Corner; 4] = [
    [false, false, false],
    [true, false, false],
    [true, false, true],
    [false, false, true],
];

impl Direction {
    /// All directions in draw order.
    pub const ALL: [Direction; 6] = [
        Direction::Up,
        Direction::North,
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::Down,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::North => "north",
            Direction::East => "east",
            Direction::West => "west",
            Direction::South => "south",
            Direction::Down => "down",
        }
    }

    fn corner_table(self) -> &'static [Corner; 4] {
        match self {
            Direction::Up => &UP,
            Direction::North => &NORTH,
            Direction::East => &EAST,
            Direction::West => &WEST,
            Direction::South => &SOUTH,
            Direction::Down => &DOWN,
        }
    }

    /// The four corners of this face of the box spanned by `from` and `to`.
    ///
    /// The winding is counter-clockwise on screen for faces turned towards the
    /// isometric camera, which is what back-face culling relies on.
    pub fn corners(self, from: Vector3<f32>, to: Vector3<f32>) -> [Vector3<f32>; 4] {
        self.corner_table().map(|[x, y, z]| {
            Vector3::new(
                if x { to.x } else { from.x },
                if y { to.y } else { from.y },
                if z { to.z } else { from.z },
            )
        })
    }

    /// Texture coordinates (in 16ths of a block) inferred from a corner position.
    pub fn infer_uv(self, corner: Vector3<f32>) -> Vector2<f32> {
        match self {
            Direction::Up | Direction::Down => Vector2::new(corner.x, corner.z),
            Direction::North | Direction::South => Vector2::new(corner.x, 16.0 - corner.y),
            Direction::East | Direction::West => Vector2::new(corner.z, 16.0 - corner.y),
        }
    }

    /// Fixed lighting approximation for projected (non-flat) models.
    pub fn shade(self) -> Rgba<u8> {
        match self {
            Direction::West | Direction::East => Rgba([200, 200, 200, 255]),
            Direction::South | Direction::North => Rgba([150, 150, 150, 255]),
            Direction::Down => Rgba([100, 100, 100, 255]),
            Direction::Up => Rgba([255, 255, 255, 255]),
        }
    }

    /// Texture keys tried after the direction's own name when a default cube
    /// is synthesized. The generic `all` key is tried last by the caller.
    pub fn fallback_texture_keys(self) -> &'static [&'static str] {
        match self {
            Direction::Up => &["top"],
            Direction::Down => &["bottom"],
            Direction::North => &["front", "side"],
            Direction::South => &["back", "side"],
            Direction::East | Direction::West => &["side"],
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown face direction `{s}`"))
    }
}
