//! Engine configuration and its INI file format.
//!
//! ```ini
//! [window]
//! width=1280
//! height=720
//!
//! [renderer]
//! fov=70
//! near=0.1
//! far=1000
//! sun=1,1,1
//!
//! [loop]
//! tick_millis=16
//!
//! [assets]
//! root=assets
//!
//! [drawer]
//! clear_colour=15,15,15
//! ```
//!
//! Every key is optional and falls back to [`EngineConfig::default`]. Lines
//! starting with `;` or `#` are comments. Unknown keys are logged and ignored.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use instant::Duration;

use crate::{
    data_structures::colour::Colour,
    error::{Error, Result},
    math::{Vec3, vec3},
    renderer::{DEFAULT_FAR, DEFAULT_FOV, DEFAULT_NEAR, check_projection},
    resources::load_string,
};

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub sun_direction: Vec3,
    /// Minimum time between two update+render passes.
    pub tick: Duration,
    pub assets_root: PathBuf,
    pub clear_colour: Colour,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fov: DEFAULT_FOV,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            sun_direction: vec3(1.0, 1.0, 1.0),
            tick: Duration::from_millis(16),
            assets_root: PathBuf::from("assets"),
            clear_colour: Colour::new(15, 15, 15),
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = load_string(path)?;
        Self::from_ini_str(&text)
    }

    pub fn from_ini_str(text: &str) -> Result<Self> {
        let mut config = Self::default();
        let mut section = String::new();

        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = name.trim().to_owned();
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(Error::Config(format!(
                    "line {}: expected 'key=value', got '{}'",
                    i + 1,
                    line
                )));
            };
            config.apply(&section, key.trim(), value.trim())?;
        }

        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, section: &str, key: &str, value: &str) -> Result<()> {
        let at = Setting {
            section,
            key,
            value,
        };
        match (section, key) {
            ("window", "width") => self.width = at.parse()?,
            ("window", "height") => self.height = at.parse()?,
            ("renderer", "fov") => self.fov = at.parse()?,
            ("renderer", "near") => self.near = at.parse()?,
            ("renderer", "far") => self.far = at.parse()?,
            ("renderer", "sun") => {
                let [x, y, z] = at.parse_list::<f32, 3>()?;
                self.sun_direction = vec3(x, y, z);
            }
            ("loop", "tick_millis") => self.tick = Duration::from_millis(at.parse()?),
            ("assets", "root") => self.assets_root = PathBuf::from(value),
            ("drawer", "clear_colour") => self.clear_colour = Colour::from(at.parse_list::<u8, 3>()?),
            _ => log::warn!("Ignoring unknown config key '{}' in section [{}]", key, section),
        }
        Ok(())
    }

    /// Checks the resolution and the projection settings.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "resolution must not be empty, got {}x{}",
                self.width, self.height
            )));
        }
        check_projection(self.fov, self.near, self.far).map_err(|e| Error::Config(e.to_string()))
    }
}

struct Setting<'a> {
    section: &'a str,
    key: &'a str,
    value: &'a str,
}

impl Setting<'_> {
    fn invalid(&self) -> Error {
        Error::Config(format!(
            "invalid value '{}' for '{}' in section [{}]",
            self.value, self.key, self.section
        ))
    }

    fn parse<T: FromStr>(&self) -> Result<T> {
        self.value.parse().map_err(|_| self.invalid())
    }

    /// Parses a comma separated list of exactly `N` values.
    fn parse_list<T: FromStr, const N: usize>(&self) -> Result<[T; N]> {
        let items = self
            .value
            .split(',')
            .map(|item| item.trim().parse::<T>().map_err(|_| self.invalid()))
            .collect::<Result<Vec<T>>>()?;
        items.try_into().map_err(|_| self.invalid())
    }
}
