//! Row-major 4x4 matrices for affine and perspective transforms.
//!
//! Vectors are treated as *row* vectors: a point `p` is transformed by
//! `p * M`, and `A * B` applies `A` first and `B` second. Translation lives in
//! row 3 and the perspective `w` is stored in column 3.

use std::ops::{Mul, MulAssign};

use cgmath::{Angle, Deg, InnerSpace, Rad};

use super::vec::{Vec3, vec3};

/// A 4x4 transform matrix, indexed as `m[row][column]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix4x4 {
    pub m: [[f32; 4]; 4],
}

impl Matrix4x4 {
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn translation(v: Vec3) -> Self {
        let mut mat = Self::IDENTITY;
        mat.m[3][0] = v.x;
        mat.m[3][1] = v.y;
        mat.m[3][2] = v.z;
        mat
    }

    pub fn scale(v: Vec3) -> Self {
        let mut mat = Self::IDENTITY;
        mat.m[0][0] = v.x;
        mat.m[1][1] = v.y;
        mat.m[2][2] = v.z;
        mat
    }

    /// Rotation around the x axis. Angles are in turns (1.0 = 360 degrees).
    pub fn rotation_x(turns: f32) -> Self {
        let (s, c) = (Rad::<f32>::full_turn() * turns).sin_cos();
        let mut mat = Self::IDENTITY;
        mat.m[1][1] = c;
        mat.m[1][2] = s;
        mat.m[2][1] = -s;
        mat.m[2][2] = c;
        mat
    }

    /// Rotation around the y axis. Angles are in turns.
    pub fn rotation_y(turns: f32) -> Self {
        let (s, c) = (Rad::<f32>::full_turn() * turns).sin_cos();
        let mut mat = Self::IDENTITY;
        mat.m[0][0] = c;
        mat.m[0][2] = -s;
        mat.m[2][0] = s;
        mat.m[2][2] = c;
        mat
    }

    /// Rotation around the z axis. Angles are in turns.
    pub fn rotation_z(turns: f32) -> Self {
        let (s, c) = (Rad::<f32>::full_turn() * turns).sin_cos();
        let mut mat = Self::IDENTITY;
        mat.m[0][0] = c;
        mat.m[0][1] = s;
        mat.m[1][0] = -s;
        mat.m[1][1] = c;
        mat
    }

    /// Euler rotation applied around x, then y, then z. The order is fixed.
    pub fn rotation(euler: Vec3) -> Self {
        Self::rotation_x(euler.x) * Self::rotation_y(euler.y) * Self::rotation_z(euler.z)
    }

    /// World transform: scale, then rotate, then translate.
    ///
    /// The composition order is part of the contract; swapping any two factors
    /// changes where objects end up on screen.
    pub fn transform(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self::scale(scale) * Self::rotation(rotation) * Self::translation(position)
    }

    /// Perspective projection with `w` taken from the view-space z.
    ///
    /// `aspect` is width divided by height. Points transformed by this matrix
    /// need the perspective divide, which `Vec3 * Matrix4x4` performs.
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let focal = 1.0 / Deg(fov_degrees / 2.0).tan();
        let depth = far / (far - near);
        let mut mat = Self { m: [[0.0; 4]; 4] };
        mat.m[0][0] = focal / aspect;
        mat.m[1][1] = focal;
        mat.m[2][2] = depth;
        mat.m[2][3] = 1.0;
        mat.m[3][2] = -near * depth;
        mat
    }

    /// Camera basis placed at `from` and looking at `to`.
    ///
    /// `up` is made orthogonal to the forward axis (Gram-Schmidt) before the
    /// right axis is derived from it. `from` must differ from `to` and `up`
    /// must not be parallel to the viewing direction.
    pub fn point_at(from: Vec3, to: Vec3, up: Vec3) -> Self {
        let forward = (to - from).normalize();
        let up = (up - forward * up.dot(forward)).normalize();
        let right = up.cross(forward);

        Self {
            m: [
                [right.x, right.y, right.z, 0.0],
                [up.x, up.y, up.z, 0.0],
                [forward.x, forward.y, forward.z, 0.0],
                [from.x, from.y, from.z, 1.0],
            ],
        }
    }

    /// View matrix: the inverse of [`Matrix4x4::point_at`].
    pub fn look_at(from: Vec3, to: Vec3, up: Vec3) -> Self {
        Self::point_at(from, to, up).inverse()
    }

    /// Fast inverse for a rotation-plus-translation matrix.
    ///
    /// The upper 3x3 block is transposed and the translation is rotated back.
    /// This is only correct when the upper 3x3 block is orthonormal (no
    /// scale, no shear, no projection). For any other matrix the result is
    /// meaningless.
    pub fn inverse(&self) -> Self {
        let m = &self.m;
        let mut res = Self::IDENTITY;
        for row in 0..3 {
            for col in 0..3 {
                res.m[row][col] = m[col][row];
            }
        }
        for col in 0..3 {
            res.m[3][col] =
                -(m[3][0] * res.m[0][col] + m[3][1] * res.m[1][col] + m[3][2] * res.m[2][col]);
        }
        res
    }

    pub fn right(&self) -> Vec3 {
        vec3(self.m[0][0], self.m[0][1], self.m[0][2])
    }

    pub fn up(&self) -> Vec3 {
        vec3(self.m[1][0], self.m[1][1], self.m[1][2])
    }

    pub fn forward(&self) -> Vec3 {
        vec3(self.m[2][0], self.m[2][1], self.m[2][2])
    }

    /// Transforms `v` as a row vector with `w = 1`, dividing by the
    /// resulting `w` unless it is zero.
    pub fn transform_point(&self, v: Vec3) -> Vec3 {
        let p = cgmath::Matrix4::from(*self) * v.extend(1.0);
        if p.w != 0.0 {
            p.truncate() / p.w
        } else {
            p.truncate()
        }
    }
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Our rows become cgmath's columns, so the cgmath matrix is the transpose:
/// the same transform in column-vector convention.
impl From<Matrix4x4> for cgmath::Matrix4<f32> {
    fn from(mat: Matrix4x4) -> Self {
        cgmath::Matrix4::from(mat.m)
    }
}

impl From<cgmath::Matrix4<f32>> for Matrix4x4 {
    fn from(mat: cgmath::Matrix4<f32>) -> Self {
        Self { m: mat.into() }
    }
}

impl Mul for Matrix4x4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        // (A * B)^T = B^T * A^T
        (cgmath::Matrix4::from(rhs) * cgmath::Matrix4::from(self)).into()
    }
}

impl MulAssign for Matrix4x4 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Matrix4x4> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: Matrix4x4) -> Self::Output {
        rhs.transform_point(self)
    }
}

impl MulAssign<Matrix4x4> for Vec3 {
    fn mul_assign(&mut self, rhs: Matrix4x4) {
        *self = rhs.transform_point(*self);
    }
}
