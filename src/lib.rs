//! soft-ngin
//!
//! A small software 3D rendering engine. Every frame, queued meshes, textured
//! quads and text billboards are transformed, lit, culled, sorted, clipped
//! and projected on the CPU, then handed to a 2D drawing surface as plain
//! triangle draw calls. There is no GPU and no depth buffer: triangles are
//! drawn back to front (painter's algorithm).
//!
//! High-level modules
//! - `math`: vector aliases and the row-major `Matrix4x4`
//! - `data_structures`: meshes, textures, colours, poses and per-frame render data
//! - `render`: the individual pipeline stages (cull, light, sort, clip, project)
//! - `renderer`: `Renderer3D`, which runs the stages over the frame's queue
//! - `drawer`: the 2D drawing surface trait the renderer draws into
//! - `canvas`: a headless software `Drawer` backed by an RGBA image
//! - `resources`: OBJ, image, font and asset-manifest loading
//! - `config`: engine settings and their INI format
//! - `context`: the single owner of renderer, config and camera
//! - `flow`: scenes and the fixed-tick frame loop
//! - `error`: the crate-wide error type
//!

pub mod canvas;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod drawer;
pub mod error;
pub mod flow;
pub mod math;
pub mod render;
pub mod renderer;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use data_structures::{colour::Colour, transform::Transform};
pub use error::{Error, Result};
pub use math::{Matrix4x4, Vec2, Vec3, vec2, vec3};
