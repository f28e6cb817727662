//! Asset manifests: a plain text list of everything a game loads at start-up.
//!
//! Each non-empty line reads `<type> <file> <name> [extra]`:
//!
//! | type | asset   | directory  | extra                  |
//! |------|---------|------------|------------------------|
//! | `m`  | mesh    | `models`   | texture name, optional |
//! | `t`  | texture | `textures` | -                      |
//! | `f`  | font    | `fonts`    | pixel size, required   |
//! | `s`  | sound   | `sounds`   | -                      |
//!
//! Lines starting with `#` are comments.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result, ResourceKind};

#[derive(Clone, Debug, PartialEq)]
pub struct AssetEntry {
    pub kind: ResourceKind,
    pub file: String,
    pub name: String,
    pub extra: AssetExtra,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AssetExtra {
    None,
    Texture(String),
    FontSize(f32),
}

impl AssetEntry {
    /// Location of the file below the assets `root`.
    pub fn path(&self, root: &Path) -> PathBuf {
        let dir = match self.kind {
            ResourceKind::Mesh => "models",
            ResourceKind::Texture => "textures",
            ResourceKind::Font => "fonts",
            ResourceKind::Sound => "sounds",
        };
        root.join(dir).join(&self.file)
    }
}

pub fn parse_manifest(text: &str) -> Result<Vec<AssetEntry>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| parse_line(line_no, line))
        .collect()
}

fn parse_line(line: usize, text: &str) -> Result<AssetEntry> {
    let err = |message: String| Error::Manifest { line, message };
    let mut fields = text.split_whitespace();
    let (Some(kind), Some(file), Some(name)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(err(format!("expected '<type> <file> <name>', got '{text}'")));
    };
    let extra = fields.next();
    if let Some(unexpected) = fields.next() {
        return Err(err(format!("unexpected field '{unexpected}'")));
    }

    let (kind, extra) = match (kind, extra) {
        ("m", texture) => (
            ResourceKind::Mesh,
            texture.map_or(AssetExtra::None, |t| AssetExtra::Texture(t.to_owned())),
        ),
        ("t", None) => (ResourceKind::Texture, AssetExtra::None),
        ("s", None) => (ResourceKind::Sound, AssetExtra::None),
        ("f", Some(size)) => {
            let size: f32 = size
                .parse()
                .map_err(|_| err(format!("invalid font size '{size}'")))?;
            (ResourceKind::Font, AssetExtra::FontSize(size))
        }
        ("f", None) => return Err(err(format!("font '{name}' needs a size"))),
        ("t" | "s", Some(extra)) => {
            return Err(err(format!("unexpected field '{extra}'")));
        }
        (other, _) => return Err(err(format!("unknown asset type '{other}'"))),
    };

    Ok(AssetEntry {
        kind,
        file: file.to_owned(),
        name: name.to_owned(),
        extra,
    })
}
