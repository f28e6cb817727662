//! Error types for the rendering pipeline and its resource registries.

use std::{fmt, path::PathBuf};

use thiserror::Error;

/// The kind of named resource an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Mesh,
    Texture,
    Font,
    Sound,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Mesh => "mesh",
            ResourceKind::Texture => "texture",
            ResourceKind::Font => "font",
            ResourceKind::Sound => "sound",
        };
        f.write_str(name)
    }
}

/// Main error type for soft-ngin operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("a {kind} named '{name}' is already loaded")]
    Duplicate { kind: ResourceKind, name: String },

    #[error("no {kind} named '{name}' is loaded")]
    NotFound { kind: ResourceKind, name: String },

    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid OBJ data on line {line}: {message}")]
    Obj { line: usize, message: String },

    #[error("face {face} has {arity} vertices, only triangles are supported")]
    NonTriangularFace { face: usize, arity: u32 },

    #[error("{what} index {index} is out of range (only {len} available)")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("invalid projection fov={fov} near={near} far={far}, expected 0 < fov < 180 and 0 < near < far")]
    Projection { fov: f32, near: f32, far: f32 },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("font error: {0}")]
    Font(String),

    #[error("cannot normalize a zero-length {0}")]
    ZeroVector(&'static str),

    #[error("config error: {0}")]
    Config(String),

    #[error("asset manifest line {line}: {message}")]
    Manifest { line: usize, message: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for soft-ngin operations.
pub type Result<T> = std::result::Result<T, Error>;
