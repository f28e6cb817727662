//! A headless software [`Drawer`].
//!
//! [`Canvas`] rasterises into an in-memory RGBA back buffer. Triangles are
//! filled with edge functions over their bounding box, textured triangles use
//! affine (not perspective-correct) uv interpolation with nearest sampling,
//! and every pixel write is alpha blended. [`Drawer::present`] swaps the back
//! buffer into [`Canvas::frame`] and starts the next frame with the clear
//! colour.

use std::{collections::HashMap, path::Path, rc::Rc};

use fontdue::layout::{CoordinateSystem, Layout, TextStyle};
use image::{Rgba, RgbaImage};

use crate::{
    data_structures::{colour::Colour, texture::Texture},
    drawer::Drawer,
    error::{Error, Result, ResourceKind},
    math::{Vec2, vec2},
    resources::load_binary,
};

struct LoadedFont {
    font: fontdue::Font,
    size: f32,
}

pub struct Canvas {
    back: RgbaImage,
    front: RgbaImage,
    clear_colour: Colour,
    draw_colour: Colour,
    textures: HashMap<String, Rc<Texture>>,
    fonts: HashMap<String, LoadedFont>,
    draw_font: Option<String>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        let clear_colour = Colour::BLACK;
        Self {
            back: RgbaImage::from_pixel(width, height, clear_colour.into()),
            front: RgbaImage::from_pixel(width, height, clear_colour.into()),
            clear_colour,
            draw_colour: Colour::WHITE,
            textures: HashMap::new(),
            fonts: HashMap::new(),
            draw_font: None,
        }
    }

    /// The last presented frame.
    pub fn frame(&self) -> &RgbaImage {
        &self.front
    }

    /// The frame currently being drawn.
    pub fn back_buffer(&self) -> &RgbaImage {
        &self.back
    }

    /// Registers a font from raw TrueType/OpenType bytes.
    pub fn add_font(&mut self, name: &str, bytes: &[u8], size: f32) -> Result<()> {
        if self.fonts.contains_key(name) {
            return Err(Error::Duplicate {
                kind: ResourceKind::Font,
                name: name.to_owned(),
            });
        }
        let settings = fontdue::FontSettings {
            scale: size,
            ..fontdue::FontSettings::default()
        };
        let font = fontdue::Font::from_bytes(bytes, settings).map_err(|e| Error::Font(e.to_string()))?;
        self.fonts.insert(name.to_owned(), LoadedFont { font, size });
        Ok(())
    }

    fn blend(&mut self, x: u32, y: u32, src: Rgba<u8>) {
        let a = src[3] as u32;
        if a == 0 {
            return;
        }
        let dst = self.back.get_pixel_mut(x, y);
        if a == 255 {
            *dst = src;
            return;
        }
        for c in 0..3 {
            dst[c] = ((src[c] as u32 * a + dst[c] as u32 * (255 - a)) / 255) as u8;
        }
        dst[3] = (a + dst[3] as u32 * (255 - a) / 255).min(255) as u8;
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2) {
        let colour: Rgba<u8> = self.draw_colour.into();
        let (w, h) = self.back.dimensions();
        let steps = (to.x - from.x).abs().max((to.y - from.y).abs()).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let p = from + (to - from) * (i as f32 / steps as f32);
            if p.x >= 0.0 && p.y >= 0.0 && (p.x as u32) < w && (p.y as u32) < h {
                self.blend(p.x as u32, p.y as u32, colour);
            }
        }
    }

    /// Calls `shade` with the barycentric weights of every pixel centre inside the triangle.
    fn fill(&mut self, points: [Vec2; 3], mut shade: impl FnMut([f32; 3]) -> Rgba<u8>) {
        let [a, b, c] = points;
        let area = edge(a, b, c);
        if area == 0.0 || !area.is_finite() {
            return;
        }
        let (w, h) = self.back.dimensions();
        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
        let max_x = (a.x.max(b.x).max(c.x).ceil().max(0.0) as u32).min(w);
        let max_y = (a.y.max(b.y).max(c.y).ceil().max(0.0) as u32).min(h);

        for y in min_y..max_y {
            for x in min_x..max_x {
                let p = vec2(x as f32 + 0.5, y as f32 + 0.5);
                let weights = [edge(b, c, p) / area, edge(c, a, p) / area, edge(a, b, p) / area];
                if weights.iter().all(|&w| w >= 0.0) {
                    let colour = shade(weights);
                    self.blend(x, y, colour);
                }
            }
        }
    }
}

/// Twice the signed area of `(a, b, p)`.
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn modulate(texel: Rgba<u8>, tint: Colour) -> Rgba<u8> {
    let mul = |t: u8, c: u8| ((t as u32 * c as u32) / 255) as u8;
    Rgba([mul(texel[0], tint.r), mul(texel[1], tint.g), mul(texel[2], tint.b), texel[3]])
}

impl Drawer for Canvas {
    fn present(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
        let clear: Rgba<u8> = self.clear_colour.into();
        self.back.pixels_mut().for_each(|p| *p = clear);
    }

    fn add_texture(&mut self, name: &str, texture: Texture) -> Result<Rc<Texture>> {
        if self.textures.contains_key(name) {
            return Err(Error::Duplicate {
                kind: ResourceKind::Texture,
                name: name.to_owned(),
            });
        }
        let texture = Rc::new(texture);
        self.textures.insert(name.to_owned(), Rc::clone(&texture));
        log::debug!("Texture '{}' registered ({}x{})", name, texture.width(), texture.height());
        Ok(texture)
    }

    fn unload_texture(&mut self, name: &str) -> Result<()> {
        self.textures
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound {
                kind: ResourceKind::Texture,
                name: name.to_owned(),
            })
    }

    fn load_font(&mut self, path: &Path, name: &str, size: f32) -> Result<()> {
        if self.fonts.contains_key(name) {
            return Err(Error::Duplicate {
                kind: ResourceKind::Font,
                name: name.to_owned(),
            });
        }
        let bytes = load_binary(path)?;
        self.add_font(name, &bytes, size)
    }

    fn unload_font(&mut self, name: &str) -> Result<()> {
        if self.fonts.remove(name).is_none() {
            return Err(Error::NotFound {
                kind: ResourceKind::Font,
                name: name.to_owned(),
            });
        }
        if self.draw_font.as_deref() == Some(name) {
            self.draw_font = None;
        }
        Ok(())
    }

    fn set_clear_colour(&mut self, colour: Colour) {
        self.clear_colour = colour;
    }

    fn set_draw_colour(&mut self, colour: Colour) {
        self.draw_colour = colour;
    }

    fn set_draw_font(&mut self, name: &str) -> Result<()> {
        if !self.fonts.contains_key(name) {
            return Err(Error::NotFound {
                kind: ResourceKind::Font,
                name: name.to_owned(),
            });
        }
        self.draw_font = Some(name.to_owned());
        Ok(())
    }

    fn resolution(&self) -> (u32, u32) {
        self.back.dimensions()
    }

    fn texture(&self, name: &str) -> Option<Rc<Texture>> {
        self.textures.get(name).cloned()
    }

    fn draw_triangle(&mut self, points: [Vec2; 3], fill: bool) {
        if fill {
            let colour: Rgba<u8> = self.draw_colour.into();
            self.fill(points, |_| colour);
        } else {
            let [a, b, c] = points;
            self.draw_line(a, b);
            self.draw_line(b, c);
            self.draw_line(c, a);
        }
    }

    fn draw_triangle_textured(&mut self, points: [Vec2; 3], uv_coords: [Vec2; 3], texture: &Texture) {
        let tint = self.draw_colour;
        self.fill(points, |[w0, w1, w2]| {
            let uv = uv_coords[0] * w0 + uv_coords[1] * w1 + uv_coords[2] * w2;
            modulate(texture.sample(uv), tint)
        });
    }

    fn render_text(&mut self, text: &str, font: Option<&str>) -> Result<Rc<Texture>> {
        let name = match font.or(self.draw_font.as_deref()) {
            Some(name) => name,
            None => return Err(Error::Font("no font given and no draw font set".to_owned())),
        };
        let loaded = self.fonts.get(name).ok_or_else(|| Error::NotFound {
            kind: ResourceKind::Font,
            name: name.to_owned(),
        })?;

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.append(&[&loaded.font], &TextStyle::new(text, loaded.size, 0));
        let glyphs = layout.glyphs();
        let width = glyphs
            .iter()
            .map(|g| g.x + g.width as f32)
            .fold(1.0f32, f32::max)
            .ceil() as u32;
        let height = layout.height().ceil().max(1.0) as u32;

        let colour = self.draw_colour;
        let mut image = RgbaImage::from_pixel(width, height, Rgba([colour.r, colour.g, colour.b, 0]));
        for glyph in glyphs {
            if glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            let (metrics, coverage) = loaded.font.rasterize_config(glyph.key);
            for (i, alpha) in coverage.iter().enumerate() {
                let x = glyph.x as i64 + (i % metrics.width) as i64;
                let y = glyph.y as i64 + (i / metrics.width) as i64;
                if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
                    image.get_pixel_mut(x as u32, y as u32)[3] = *alpha;
                }
            }
        }
        Ok(Rc::new(Texture::from_rgba(image, Some(text))))
    }
}
