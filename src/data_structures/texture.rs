//! CPU textures sampled by the software rasteriser.
//!
//! This module provides [`Texture`], a decoded RGBA image plus a debug label.
//! Textures are created from encoded image data ([`Texture::from_bytes`]), from
//! an already decoded image ([`Texture::from_image`]) or from raw pixels, and
//! are shared between the drawer and queued render data through `Rc`.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage, load_from_memory_with_format};

use crate::{error::Result, math::Vec2};

/// A decoded RGBA texture.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub image: RgbaImage,
    pub label: Option<String>,
}

impl Texture {
    /// Decode a texture from raw file contents.
    ///
    /// # Arguments
    ///
    /// * `bytes` represent raw image file data (PNG, JPEG, etc.)
    /// * `label` is kept as a debug name
    /// * `format` is an optional file extension hint (e.g. "png"). If None or
    ///   unknown, the format is guessed from the data.
    pub fn from_bytes(bytes: &[u8], label: &str, format: Option<&str>) -> Result<Self> {
        let img = match format.and_then(ImageFormat::from_extension) {
            Some(fmt) => load_from_memory_with_format(bytes, fmt)?,
            None => image::load_from_memory(bytes)?,
        };
        Ok(Self::from_image(&img, Some(label)))
    }

    pub fn from_image(img: &DynamicImage, label: Option<&str>) -> Self {
        Self::from_rgba(img.to_rgba8(), label)
    }

    pub fn from_rgba(image: RgbaImage, label: Option<&str>) -> Self {
        Self {
            image,
            label: label.map(str::to_owned),
        }
    }

    /// A single-colour texture, mostly useful for placeholders and tests.
    pub fn solid(width: u32, height: u32, colour: Rgba<u8>, label: Option<&str>) -> Self {
        Self::from_rgba(RgbaImage::from_pixel(width, height, colour), label)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel size as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Nearest-neighbour lookup with clamped coordinates; `(0, 0)` is the top-left texel.
    ///
    /// Empty textures sample as fully transparent.
    pub fn sample(&self, uv: Vec2) -> Rgba<u8> {
        let (w, h) = self.size();
        if w == 0 || h == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        let x = ((uv.x * w as f32).floor().max(0.0) as u32).min(w - 1);
        let y = ((uv.y * h as f32).floor().max(0.0) as u32).min(h - 1);
        *self.image.get_pixel(x, y)
    }
}
