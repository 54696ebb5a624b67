//! Render queues and software compositing.
//!
//! This module defines [`RenderPolygon`], the per-tick drawable produced by the
//! projection pipelines, and the step that turns a queue of them into a frame:
//! painter's-algorithm sorting followed by drawing onto a [`Surface`].
//!
//! # Key types
//!
//! - [`RenderPolygon<'a>`] is a screen-space polygon with texel coordinates, a tint and a depth key
//! - [`Surface`] is anything polygons can be drawn onto
//! - [`Canvas`] is the in-memory RGBA surface frames are rendered into
//!

use cgmath::Vector2;
use image::{Rgba, RgbaImage};

use crate::data_structures::texture::TextureAnimation;

/// One corner of a polygon: a screen position and a texel-space coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderVertex {
    pub position: Vector2<f32>,
    pub uv: Vector2<f32>,
}

/// A drawable polygon, rebuilt every tick and dropped after compositing.
///
/// Cuboid faces are quads; mesh faces may have any number of corners.
/// Without a texture the polygon is filled with its tint.
#[derive(Clone, Debug)]
pub struct RenderPolygon<'a> {
    pub vertices: Vec<RenderVertex>,
    pub texture: Option<&'a TextureAnimation>,
    pub tint: Rgba<u8>,
    pub depth: f32,
}

/// Order in which a render queue is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOrder {
    /// Ascending depth key, ties kept in queue order.
    DepthSorted,
    /// Queue order, used for flat items.
    Declaration,
}

/// Something polygons can be drawn onto.
pub trait Surface {
    fn draw(&mut self, polygon: &RenderPolygon<'_>);
}

/// Sort a render queue for the painter's algorithm and draw it.
pub fn composite<S: Surface + ?Sized>(mut queue: Vec<RenderPolygon<'_>>, order: DrawOrder, surface: &mut S) {
    if order == DrawOrder::DepthSorted {
        queue.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    }
    for polygon in &queue {
        surface.draw(polygon);
    }
}

/// A transparent RGBA frame drawn with point-sampled textures.
#[derive(Clone, Debug)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(size: u32) -> Self {
        Self {
            image: RgbaImage::new(size, size),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Fill one triangle. Pixel centres inside the triangle (either winding)
    /// are shaded with the barycentric texel coordinate. A centre lying exactly
    /// on an edge belongs to one side only, so triangles sharing that edge
    /// never shade it twice.
    fn fill_triangle(
        &mut self,
        corners: [&RenderVertex; 3],
        texture: Option<&TextureAnimation>,
        tint: Rgba<u8>,
    ) {
        let [a, mut b, mut c] = corners;
        let mut area = edge(a.position, b.position, c.position);
        if area.abs() < f32::EPSILON {
            return;
        }
        if area < 0.0 {
            std::mem::swap(&mut b, &mut c);
            area = -area;
        }
        let (width, height) = self.image.dimensions();
        let min_x = a.position.x.min(b.position.x).min(c.position.x).floor().max(0.0) as u32;
        let min_y = a.position.y.min(b.position.y).min(c.position.y).floor().max(0.0) as u32;
        let max_x = (a.position.x.max(b.position.x).max(c.position.x).ceil().max(0.0) as u32).min(width);
        let max_y = (a.position.y.max(b.position.y).max(c.position.y).ceil().max(0.0) as u32).min(height);

        for y in min_y..max_y {
            for x in min_x..max_x {
                let p = Vector2::new(x as f32 + 0.5, y as f32 + 0.5);
                let wa = edge(b.position, c.position, p);
                let wb = edge(c.position, a.position, p);
                let wc = edge(a.position, b.position, p);
                if !covers(wa, b.position, c.position)
                    || !covers(wb, c.position, a.position)
                    || !covers(wc, a.position, b.position)
                {
                    continue;
                }
                let (wa, wb, wc) = (wa / area, wb / area, wc / area);
                let colour = match texture {
                    Some(texture) => {
                        let uv = a.uv * wa + b.uv * wb + c.uv * wc;
                        modulate(texture.sample(uv.x, uv.y), tint)
                    }
                    None => tint,
                };
                let dst = self.image.get_pixel_mut(x, y);
                *dst = blend(colour, *dst);
            }
        }
    }
}

impl Surface for Canvas {
    fn draw(&mut self, polygon: &RenderPolygon<'_>) {
        let Some((first, rest)) = polygon.vertices.split_first() else {
            return;
        };
        for pair in rest.windows(2) {
            self.fill_triangle([first, &pair[0], &pair[1]], polygon.texture, polygon.tint);
        }
    }
}

fn edge(a: Vector2<f32>, b: Vector2<f32>, p: Vector2<f32>) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Whether an edge function value puts the pixel on the inner side of the
/// edge `from -> to`. Zero counts only for edges running down, or left when
/// horizontal; the same edge traversed the other way rejects it.
fn covers(w: f32, from: Vector2<f32>, to: Vector2<f32>) -> bool {
    if w != 0.0 {
        return w > 0.0;
    }
    let d = to - from;
    d.y > 0.0 || (d.y == 0.0 && d.x < 0.0)
}

fn modulate(texel: Rgba<u8>, tint: Rgba<u8>) -> Rgba<u8> {
    let mul = |t: u8, c: u8| ((u16::from(t) * u16::from(c) + 127) / 255) as u8;
    Rgba([
        mul(texel[0], tint[0]),
        mul(texel[1], tint[1]),
        mul(texel[2], tint[2]),
        mul(texel[3], tint[3]),
    ])
}

/// Source-over alpha compositing of non-premultiplied colours.
fn blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = f32::from(src[3]) / 255.0;
    if sa >= 1.0 {
        return src;
    }
    if sa <= 0.0 {
        return dst;
    }
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |i: usize| {
        let value = (f32::from(src[i]) * sa + f32::from(dst[i]) * da * (1.0 - sa)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };
    Rgba([channel(0), channel(1), channel(2), (out_a * 255.0).round() as u8])
}
