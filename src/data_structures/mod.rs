//! Engine data structures: meshes, textures, colours and the per-frame render data.
//!
//! - `colour` holds the flat RGB colour carried by triangles and draw calls
//! - `mesh` contains the immutable triangle soup loaded from OBJ files
//! - `texture` wraps decoded RGBA images sampled by textured triangles
//! - `transform` holds the position/rotation/scale pose of a queued object
//! - `render_data` is the tagged union of everything the renderer can draw

pub mod colour;
pub mod mesh;
pub mod render_data;
pub mod texture;
pub mod transform;
