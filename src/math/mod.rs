//! Vector and matrix math for the software pipeline.
//!
//! Vectors are plain cgmath vectors so that all of cgmath's arithmetic is
//! available. [`Matrix4x4`] is a row-major 4x4 grid used with *row* vectors,
//! which is the convention the whole pipeline is written in.

pub mod matrix;
pub mod vec;

pub use matrix::Matrix4x4;
pub use vec::{Vec2, Vec3, VectorExt, vec2, vec3};
