//! Per-frame draw requests.
//!
//! A [`RenderData`] is created when a scene enqueues something to draw and is
//! dropped once the frame that drew it is finished. What is drawn is a tagged
//! union, [`RenderKind`], so the renderer dispatches on the variant once per
//! object and then works on plain slices for every triangle.

use std::rc::Rc;

use crate::{
    data_structures::{
        colour::Colour,
        mesh::{Mesh, Triangle},
        texture::Texture,
        transform::Transform,
    },
    math::{Vec2, Vec3},
};

/// uv corners of a quad: top-left, top-right, bottom-right, bottom-left.
pub const QUAD_UV_COORDS: [Vec2; 4] = [
    Vec2 { x: 0.0, y: 0.0 },
    Vec2 { x: 1.0, y: 0.0 },
    Vec2 { x: 1.0, y: 1.0 },
    Vec2 { x: 0.0, y: 1.0 },
];

pub const QUAD_TRIANGLES: [Triangle; 2] = [
    Triangle {
        verts: [0, 1, 2],
        uv_coords: Some([0, 1, 2]),
        normal: None,
        colour: Colour::WHITE,
    },
    Triangle {
        verts: [0, 2, 3],
        uv_coords: Some([0, 2, 3]),
        normal: None,
        colour: Colour::WHITE,
    },
];

/// A textured rectangle centred on the origin in the xy plane, one world
/// unit per texture pixel.
#[derive(Clone, Debug)]
pub struct Quad {
    texture: Rc<Texture>,
    verts: [Vec3; 4],
}

impl Quad {
    pub fn new(texture: Rc<Texture>) -> Self {
        let (w, h) = texture.size();
        let (hw, hh) = (w as f32 / 2.0, h as f32 / 2.0);
        let verts = [
            Vec3::new(-hw, hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(-hw, -hh, 0.0),
        ];
        Self { texture, verts }
    }

    pub fn texture(&self) -> &Rc<Texture> {
        &self.texture
    }

    pub fn verts(&self) -> &[Vec3] {
        &self.verts
    }
}

#[derive(Clone, Debug)]
pub enum RenderKind {
    /// A loaded mesh, drawn with its texture when it has one.
    Mesh {
        mesh: Rc<Mesh>,
        texture: Option<Rc<Texture>>,
    },
    /// A drawer texture shown on a quad.
    Texture(Quad),
    /// A rendered text string shown on a quad.
    Text(Quad),
}

#[derive(Clone, Debug)]
pub struct RenderData {
    pub transform: Transform,
    pub ignore_lighting: bool,
    pub kind: RenderKind,
}

impl RenderData {
    pub fn from_mesh(
        mesh: Rc<Mesh>,
        texture: Option<Rc<Texture>>,
        transform: Transform,
        ignore_lighting: bool,
    ) -> Self {
        Self {
            transform,
            ignore_lighting,
            kind: RenderKind::Mesh { mesh, texture },
        }
    }

    pub fn from_texture(texture: Rc<Texture>, transform: Transform, ignore_lighting: bool) -> Self {
        Self {
            transform,
            ignore_lighting,
            kind: RenderKind::Texture(Quad::new(texture)),
        }
    }

    pub fn from_text(rendered: Rc<Texture>, transform: Transform, ignore_lighting: bool) -> Self {
        Self {
            transform,
            ignore_lighting,
            kind: RenderKind::Text(Quad::new(rendered)),
        }
    }

    pub fn verts(&self) -> &[Vec3] {
        match &self.kind {
            RenderKind::Mesh { mesh, .. } => mesh.verts(),
            RenderKind::Texture(quad) | RenderKind::Text(quad) => quad.verts(),
        }
    }

    pub fn uv_coords(&self) -> &[Vec2] {
        match &self.kind {
            RenderKind::Mesh { mesh, .. } => mesh.uv_coords(),
            RenderKind::Texture(_) | RenderKind::Text(_) => &QUAD_UV_COORDS,
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        match &self.kind {
            RenderKind::Mesh { mesh, .. } => mesh.triangles(),
            RenderKind::Texture(_) | RenderKind::Text(_) => &QUAD_TRIANGLES,
        }
    }

    pub fn texture(&self) -> Option<&Texture> {
        match &self.kind {
            RenderKind::Mesh { texture, .. } => texture.as_deref(),
            RenderKind::Texture(quad) | RenderKind::Text(quad) => Some(quad.texture()),
        }
    }

    pub fn is_light_ignored(&self) -> bool {
        self.ignore_lighting
    }

    /// The three uv coordinates of `tri`, zeros when it has none.
    pub fn triangle_uvs(&self, tri: &Triangle) -> [Vec2; 3] {
        let uvs = self.uv_coords();
        match tri.uv_coords {
            Some(ids) => ids.map(|i| uvs[i]),
            None => [Vec2 { x: 0.0, y: 0.0 }; 3],
        }
    }
}
