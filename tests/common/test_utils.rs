#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    rc::Rc,
};

use image::Rgba;
use soft_ngin::{
    Colour, Vec2,
    data_structures::{
        mesh::{Mesh, Triangle},
        texture::Texture,
    },
    drawer::Drawer,
    error::{Error, ResourceKind, Result},
    vec3,
};

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Flat {
        points: [Vec2; 3],
        fill: bool,
        colour: Colour,
    },
    Textured {
        points: [Vec2; 3],
        uv_coords: [Vec2; 3],
        colour: Colour,
        texture_size: (u32, u32),
    },
}

impl DrawCall {
    pub fn points(&self) -> [Vec2; 3] {
        match self {
            DrawCall::Flat { points, .. } | DrawCall::Textured { points, .. } => *points,
        }
    }

    pub fn colour(&self) -> Colour {
        match self {
            DrawCall::Flat { colour, .. } | DrawCall::Textured { colour, .. } => *colour,
        }
    }
}

/// A drawer that only records what it is asked to do.
pub struct RecordingDrawer {
    pub resolution: (u32, u32),
    pub calls: Vec<DrawCall>,
    pub presented: usize,
    pub clear_colour: Colour,
    pub draw_colour: Colour,
    pub draw_font: Option<String>,
    textures: HashMap<String, Rc<Texture>>,
    fonts: HashSet<String>,
}

impl RecordingDrawer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            resolution: (width, height),
            calls: Vec::new(),
            presented: 0,
            clear_colour: Colour::BLACK,
            draw_colour: Colour::WHITE,
            draw_font: None,
            textures: HashMap::new(),
            fonts: HashSet::new(),
        }
    }

    pub fn add_font(&mut self, name: &str) {
        self.fonts.insert(name.to_owned());
    }
}

impl Drawer for RecordingDrawer {
    fn present(&mut self) {
        self.presented += 1;
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
        Ok(texture)
    }

    fn unload_texture(&mut self, name: &str) -> Result<()> {
        self.textures.remove(name).map(|_| ()).ok_or(Error::NotFound {
            kind: ResourceKind::Texture,
            name: name.to_owned(),
        })
    }

    fn load_font(&mut self, _path: &Path, name: &str, _size: f32) -> Result<()> {
        self.add_font(name);
        Ok(())
    }

    fn unload_font(&mut self, name: &str) -> Result<()> {
        if self.fonts.remove(name) {
            Ok(())
        } else {
            Err(Error::NotFound {
                kind: ResourceKind::Font,
                name: name.to_owned(),
            })
        }
    }

    fn set_clear_colour(&mut self, colour: Colour) {
        self.clear_colour = colour;
    }

    fn set_draw_colour(&mut self, colour: Colour) {
        self.draw_colour = colour;
    }

    fn set_draw_font(&mut self, name: &str) -> Result<()> {
        if !self.fonts.contains(name) {
            return Err(Error::NotFound {
                kind: ResourceKind::Font,
                name: name.to_owned(),
            });
        }
        self.draw_font = Some(name.to_owned());
        Ok(())
    }

    fn resolution(&self) -> (u32, u32) {
        self.resolution
    }

    fn texture(&self, name: &str) -> Option<Rc<Texture>> {
        self.textures.get(name).cloned()
    }

    fn draw_triangle(&mut self, points: [Vec2; 3], fill: bool) {
        self.calls.push(DrawCall::Flat {
            points,
            fill,
            colour: self.draw_colour,
        });
    }

    fn draw_triangle_textured(&mut self, points: [Vec2; 3], uv_coords: [Vec2; 3], texture: &Texture) {
        self.calls.push(DrawCall::Textured {
            points,
            uv_coords,
            colour: self.draw_colour,
            texture_size: texture.size(),
        });
    }

    /// Renders every character as an 8x16 white cell.
    fn render_text(&mut self, text: &str, font: Option<&str>) -> Result<Rc<Texture>> {
        let name = font
            .map(str::to_owned)
            .or_else(|| self.draw_font.clone())
            .ok_or_else(|| Error::Font("no font".to_owned()))?;
        if !self.fonts.contains(&name) {
            return Err(Error::NotFound {
                kind: ResourceKind::Font,
                name,
            });
        }
        let width = 8 * text.chars().count().max(1) as u32;
        Ok(Rc::new(Texture::solid(width, 16, Rgba([255, 255, 255, 255]), Some(text))))
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A 1x1 quad in the xy plane, centred on the origin and facing -z.
pub fn unit_quad(colour: Colour) -> Mesh {
    let verts = vec![
        vec3(-0.5, 0.5, 0.0),
        vec3(0.5, 0.5, 0.0),
        vec3(0.5, -0.5, 0.0),
        vec3(-0.5, -0.5, 0.0),
    ];
    let triangles = vec![
        Triangle::new([0, 1, 2]).with_colour(colour),
        Triangle::new([0, 2, 3]).with_colour(colour),
    ];
    Mesh::from_parts(verts, Vec::new(), triangles, None).expect("valid quad")
}

pub fn inside_screen(p: Vec2, resolution: (u32, u32)) -> bool {
    let eps = 1e-3;
    p.x >= -eps && p.y >= -eps && p.x <= resolution.0 as f32 + eps && p.y <= resolution.1 as f32 + eps
}

/// A fresh, empty directory below the system temp dir.
pub fn temp_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("soft-ngin-{}-{}", test, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
