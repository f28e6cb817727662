use crate::math::{Matrix4x4, Vec3, vec3};

/// The pose of a queued object.
///
/// `rotation` holds euler angles in turns, applied around x, then y, then z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// A pose at `position` with no rotation and unit scale.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// World matrix (scale, then rotation, then translation).
    pub fn to_matrix(&self) -> Matrix4x4 {
        Matrix4x4::transform(self.position, self.rotation, self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: vec3(0.0, 0.0, 0.0),
            rotation: vec3(0.0, 0.0, 0.0),
            scale: vec3(1.0, 1.0, 1.0),
        }
    }
}

impl From<Transform> for Matrix4x4 {
    fn from(t: Transform) -> Self {
        t.to_matrix()
    }
}
