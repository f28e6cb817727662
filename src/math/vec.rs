use std::cmp::Ordering;

use cgmath::InnerSpace;

pub use cgmath::{vec2, vec3};

/// A 2D vector, used for texture coordinates and screen-space points.
pub type Vec2 = cgmath::Vector2<f32>;

/// A 3D vector, used for positions, directions and euler rotations (in turns).
pub type Vec3 = cgmath::Vector3<f32>;

/// Additions on top of cgmath's vector API that the pipeline relies on.
///
/// cgmath's `normalize` divides by the magnitude unconditionally, so a zero
/// vector turns into NaNs. Code that can meet degenerate input should use
/// [`VectorExt::try_normalize`] instead.
pub trait VectorExt: InnerSpace<Scalar = f32> {
    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    fn try_normalize(self) -> Option<Self> {
        let length = self.magnitude();
        if length > f32::EPSILON {
            Some(self / length)
        } else {
            None
        }
    }

    /// Orders two vectors by their length.
    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        self.magnitude2().total_cmp(&other.magnitude2())
    }
}

impl VectorExt for Vec2 {}
impl VectorExt for Vec3 {}
