use std::path::Path;

use crate::{data_structures::texture::Texture, error::Result, resources::load_binary};

/// Reads and decodes the image at `path`, using its extension as a format hint.
pub fn load_texture(path: &Path, label: &str) -> Result<Texture> {
    let data = load_binary(path)?;
    let format = path.extension().and_then(|ext| ext.to_str());
    Texture::from_bytes(&data, label, format)
}
