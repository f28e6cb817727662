//! Loading of meshes, textures, fonts and asset manifests from disk.
//!
//! Every loader reports missing or unreadable files as
//! [`Error::Io`](crate::error::Error::Io) carrying the offending path.

use std::path::Path;

use crate::error::{Error, Result};

pub mod manifest;
pub mod mesh;
pub mod texture;

pub fn load_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

pub fn load_binary(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::io(path, e))
}
