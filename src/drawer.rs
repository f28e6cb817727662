//! The 2D drawing surface the renderer draws into.
//!
//! [`Drawer`] is everything [`crate::renderer::Renderer3D`] needs from a
//! backend: a resolution, texture and font registries, a current draw colour
//! and two triangle primitives. [`crate::canvas::Canvas`] is the bundled
//! software implementation; tests use a recording mock.

use std::{path::Path, rc::Rc};

use crate::{
    data_structures::{colour::Colour, texture::Texture},
    error::Result,
    math::Vec2,
    resources,
};

pub trait Drawer {
    /// Shows the finished frame and starts a new one filled with the clear colour.
    fn present(&mut self);

    /// Registers an already decoded texture under `name`.
    ///
    /// Fails with [`crate::error::Error::Duplicate`] if the name is taken.
    fn add_texture(&mut self, name: &str, texture: Texture) -> Result<Rc<Texture>>;

    /// Decodes the image at `path` and registers it under `name`.
    fn load_texture(&mut self, path: &Path, name: &str) -> Result<()> {
        let texture = resources::texture::load_texture(path, name)?;
        self.add_texture(name, texture)?;
        Ok(())
    }

    fn unload_texture(&mut self, name: &str) -> Result<()>;

    /// Loads a TrueType/OpenType font rendered at `size` pixels.
    fn load_font(&mut self, path: &Path, name: &str, size: f32) -> Result<()>;

    fn unload_font(&mut self, name: &str) -> Result<()>;

    fn set_clear_colour(&mut self, colour: Colour);

    /// Colour used by the following draw calls. Textured triangles are tinted by it.
    fn set_draw_colour(&mut self, colour: Colour);

    /// Font used by [`Drawer::render_text`] when no font is named.
    fn set_draw_font(&mut self, name: &str) -> Result<()>;

    /// `(width, height)` in pixels.
    fn resolution(&self) -> (u32, u32);

    /// Width divided by height.
    fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.resolution();
        if h == 0 { 1.0 } else { w as f32 / h as f32 }
    }

    fn texture(&self, name: &str) -> Option<Rc<Texture>>;

    /// Draws a filled triangle, or only its outline when `fill` is false.
    fn draw_triangle(&mut self, points: [Vec2; 3], fill: bool);

    fn draw_triangle_textured(&mut self, points: [Vec2; 3], uv_coords: [Vec2; 3], texture: &Texture);

    /// Rasterises `text` into a new texture using `font`, or the draw font.
    fn render_text(&mut self, text: &str, font: Option<&str>) -> Result<Rc<Texture>>;
}
