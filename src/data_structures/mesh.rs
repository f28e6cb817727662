//! Immutable triangle soup used by the software pipeline.
//!
//! A [`Mesh`] is created once (from an OBJ file via
//! [`crate::resources::mesh::load_mesh`] or from in-memory buffers via
//! [`Mesh::from_parts`]) and is read-only afterwards. All accessors hand out
//! borrowed slices that live as long as the mesh itself.

use crate::{
    data_structures::colour::Colour,
    error::{Error, Result},
    math::{Vec2, Vec3},
};

/// A stored triangle: indices into the owning mesh's buffers plus a flat colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub verts: [usize; 3],
    /// `None` when the face has no texture coordinates.
    pub uv_coords: Option<[usize; 3]>,
    pub normal: Option<usize>,
    pub colour: Colour,
}

impl Triangle {
    pub fn new(verts: [usize; 3]) -> Self {
        Self {
            verts,
            uv_coords: None,
            normal: None,
            colour: Colour::WHITE,
        }
    }

    pub fn with_uv_coords(mut self, uv_coords: [usize; 3]) -> Self {
        self.uv_coords = Some(uv_coords);
        self
    }

    pub fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = colour;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    verts: Vec<Vec3>,
    uv_coords: Vec<Vec2>,
    triangles: Vec<Triangle>,
    texture_name: Option<String>,
}

impl Mesh {
    /// Builds a mesh from raw buffers, checking every triangle index.
    pub fn from_parts(
        verts: Vec<Vec3>,
        uv_coords: Vec<Vec2>,
        triangles: Vec<Triangle>,
        texture_name: Option<String>,
    ) -> Result<Self> {
        for tri in &triangles {
            check_indices("vertex", &tri.verts, verts.len())?;
            if let Some(uv) = &tri.uv_coords {
                check_indices("uv coordinate", uv, uv_coords.len())?;
            }
        }
        Ok(Self {
            verts,
            uv_coords,
            triangles,
            texture_name,
        })
    }

    pub fn verts(&self) -> &[Vec3] {
        &self.verts
    }

    pub fn uv_coords(&self) -> &[Vec2] {
        &self.uv_coords
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Name of the texture registered with the drawer, if the mesh is textured.
    pub fn texture_name(&self) -> Option<&str> {
        self.texture_name.as_deref()
    }
}

fn check_indices(what: &'static str, indices: &[usize; 3], len: usize) -> Result<()> {
    match indices.iter().find(|&&i| i >= len) {
        Some(&index) => Err(Error::IndexOutOfRange { what, index, len }),
        None => Ok(()),
    }
}
