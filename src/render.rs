//! The per-triangle stages of the software pipeline.
//!
//! [`crate::renderer::Renderer3D`] strings these together every frame:
//!
//! 1. [`is_back_face`] drops triangles facing away from the camera (view space)
//! 2. [`light_factor`] computes the flat lighting term from the world-space [`unit_normal`]
//! 3. [`sort_back_to_front`] orders [`RawTriangle`]s for the painter's algorithm
//! 4. [`clip_against_plane`] cuts triangles at the near plane
//! 5. [`project`] maps view-space vertices to pixel coordinates
//!
//! The stages are free functions over plain values so that each can be tested
//! without a drawer.

use cgmath::InnerSpace;

use crate::{
    data_structures::{colour::Colour, texture::Texture},
    math::{Matrix4x4, Vec2, Vec3, VectorExt, vec2, vec3},
};

/// A fully resolved triangle, alive for one frame only.
///
/// Vertices are in view space until [`project`] runs. A `None` texture means
/// the triangle is filled with `colour`; otherwise it is UV-mapped and tinted
/// by `colour`.
#[derive(Clone, Copy, Debug)]
pub struct RawTriangle<'a> {
    pub verts: [Vec3; 3],
    pub uv_coords: [Vec2; 3],
    pub colour: Colour,
    pub texture: Option<&'a Texture>,
}

impl<'a> RawTriangle<'a> {
    /// Sum of the three view-space z values, used as the sort key.
    pub fn depth(&self) -> f32 {
        self.verts.iter().map(|v| v.z).sum()
    }
}

/// Unnormalised face normal: `(v1 - v0) x (v2 - v0)`.
pub fn face_normal(verts: &[Vec3; 3]) -> Vec3 {
    (verts[1] - verts[0]).cross(verts[2] - verts[0])
}

/// True when the triangle faces away from a viewer at the view-space origin.
pub fn is_back_face(view_verts: &[Vec3; 3]) -> bool {
    face_normal(view_verts).dot(view_verts[0]) > 0.0
}

/// Unit normal of a triangle, or `None` when it has zero area.
pub fn unit_normal(verts: &[Vec3; 3]) -> Option<Vec3> {
    face_normal(verts).try_normalize()
}

/// Flat lighting term: maps `dot(normal, sun)` from `[-1, 1]` to `[0, 1]`.
///
/// Both vectors must be normalised.
pub fn light_factor(normal: Vec3, sun: Vec3) -> f32 {
    (1.0 + normal.dot(sun)) / 2.0
}

/// Stable sort by descending depth: the farthest triangle comes first and
/// ties keep their enqueue order.
pub fn sort_back_to_front(triangles: &mut [RawTriangle<'_>]) {
    triangles.sort_by(|a, b| b.depth().total_cmp(&a.depth()));
}

/// A plane given by a point on it and its normal. The normal points to the
/// side that is kept when clipping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub point: Vec3,
    pub normal: Vec3,
}

impl Plane {
    /// The camera's near plane at view-space depth `near`, keeping `z >= near`.
    pub fn near(near: f32) -> Self {
        Self {
            point: vec3(0.0, 0.0, near),
            normal: vec3(0.0, 0.0, 1.0),
        }
    }

    pub fn signed_distance(&self, v: Vec3) -> f32 {
        self.normal.dot(v) - self.normal.dot(self.point)
    }

    /// Where the segment `start..end` meets the plane, with the parameter `t`
    /// along the segment. The segment must not be parallel to the plane.
    pub fn intersect(&self, start: Vec3, end: Vec3) -> (Vec3, f32) {
        let plane_d = self.normal.dot(self.point);
        let start_d = start.dot(self.normal);
        let end_d = end.dot(self.normal);
        let t = (plane_d - start_d) / (end_d - start_d);
        (start + (end - start) * t, t)
    }
}

/// Result of clipping one triangle against one plane.
#[derive(Clone, Copy, Debug)]
pub enum Clipped<'a> {
    Culled,
    One(RawTriangle<'a>),
    Two(RawTriangle<'a>, RawTriangle<'a>),
}

impl<'a> Clipped<'a> {
    pub fn len(&self) -> usize {
        match self {
            Clipped::Culled => 0,
            Clipped::One(_) => 1,
            Clipped::Two(..) => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Clipped::Culled)
    }
}

impl<'a> IntoIterator for Clipped<'a> {
    type Item = RawTriangle<'a>;
    type IntoIter = std::iter::Flatten<std::array::IntoIter<Option<RawTriangle<'a>>, 2>>;

    fn into_iter(self) -> Self::IntoIter {
        let pair = match self {
            Clipped::Culled => [None, None],
            Clipped::One(a) => [Some(a), None],
            Clipped::Two(a, b) => [Some(a), Some(b)],
        };
        pair.into_iter().flatten()
    }
}

/// Clips `tri` against `plane`.
///
/// A vertex is inside when its signed distance is `>= 0`. With no vertex
/// inside the triangle is dropped, with all three it is returned unchanged.
/// Otherwise the triangle is cut along the plane into one or two triangles
/// that keep its colour and texture. New uv coordinates are interpolated with
/// the same `t` as the positions on each edge.
pub fn clip_against_plane<'a>(plane: &Plane, tri: &RawTriangle<'a>) -> Clipped<'a> {
    let mut inside = [0usize; 3];
    let mut outside = [0usize; 3];
    let (mut n_in, mut n_out) = (0, 0);
    for (i, v) in tri.verts.iter().enumerate() {
        if plane.signed_distance(*v) >= 0.0 {
            inside[n_in] = i;
            n_in += 1;
        } else {
            outside[n_out] = i;
            n_out += 1;
        }
    }

    let edge = |from: usize, to: usize| {
        let (point, t) = plane.intersect(tri.verts[from], tri.verts[to]);
        let uv = tri.uv_coords[from] + (tri.uv_coords[to] - tri.uv_coords[from]) * t;
        (point, uv)
    };

    match n_in {
        0 => Clipped::Culled,
        1 => {
            let a = inside[0];
            let (ab, ab_uv) = edge(a, outside[0]);
            let (ac, ac_uv) = edge(a, outside[1]);
            Clipped::One(RawTriangle {
                verts: [tri.verts[a], ab, ac],
                uv_coords: [tri.uv_coords[a], ab_uv, ac_uv],
                ..*tri
            })
        }
        2 => {
            let (a, b) = (inside[0], inside[1]);
            let c = outside[0];
            let (ac, ac_uv) = edge(a, c);
            let (bc, bc_uv) = edge(b, c);
            let first = RawTriangle {
                verts: [tri.verts[a], tri.verts[b], ac],
                uv_coords: [tri.uv_coords[a], tri.uv_coords[b], ac_uv],
                ..*tri
            };
            let second = RawTriangle {
                verts: [tri.verts[b], ac, bc],
                uv_coords: [tri.uv_coords[b], ac_uv, bc_uv],
                ..*tri
            };
            Clipped::Two(first, second)
        }
        _ => Clipped::One(*tri),
    }
}

/// Maps a normalised device coordinate to pixels. y points down on screen.
pub fn to_screen(ndc: Vec3, resolution: (u32, u32)) -> Vec2 {
    let (w, h) = (resolution.0 as f32, resolution.1 as f32);
    vec2((ndc.x + 1.0) * 0.5 * w, (1.0 - (ndc.y + 1.0) * 0.5) * h)
}

/// Projects the triangle's view-space vertices to screen coordinates.
pub fn project(tri: &RawTriangle<'_>, projection: &Matrix4x4, resolution: (u32, u32)) -> [Vec2; 3] {
    tri.verts.map(|v| to_screen(v * *projection, resolution))
}
