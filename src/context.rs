//! The top-level owner of an engine instance.
//!
//! A [`Context`] is built once by the application and handed to every flow.
//! It owns the renderer (which owns the drawer), the configuration and the
//! camera pose the renderer reads each frame.

use std::{cell::Cell, path::Path, rc::Rc};

use crate::{
    canvas::Canvas,
    config::EngineConfig,
    data_structures::colour::Colour,
    drawer::Drawer,
    error::{Result, ResourceKind},
    math::{Vec3, vec3},
    renderer::{CameraHandle, Renderer3D},
    resources::{
        load_string,
        manifest::{AssetExtra, parse_manifest},
    },
};

pub struct Context<D: Drawer> {
    pub renderer: Renderer3D<D>,
    pub config: EngineConfig,
    camera_position: CameraHandle,
    camera_rotation: CameraHandle,
}

impl<D: Drawer> Context<D> {
    pub fn new(drawer: D, config: EngineConfig) -> Result<Self> {
        let mut renderer = Renderer3D::new(drawer);
        let camera_position = Rc::new(Cell::new(vec3(0.0, 0.0, 0.0)));
        let camera_rotation = Rc::new(Cell::new(vec3(0.0, 0.0, 0.0)));
        renderer.set_camera_transform(
            Some(Rc::clone(&camera_position)),
            Some(Rc::clone(&camera_rotation)),
        );

        let mut ctx = Self {
            renderer,
            config,
            camera_position,
            camera_rotation,
        };
        ctx.apply_config()?;
        Ok(ctx)
    }

    /// Pushes `config` into the renderer and drawer: projection, sun direction
    /// and clear colour. Nothing changes if the config is invalid.
    ///
    /// The resolution belongs to the drawer and cannot change after
    /// construction; a differing `width`/`height` is only logged.
    pub fn apply_config(&mut self) -> Result<()> {
        let config = &self.config;
        config.validate()?;
        self.renderer.set_sun_direction(config.sun_direction)?;
        self.renderer.set_perspective(config.fov, config.near, config.far)?;
        self.renderer.drawer_mut().set_clear_colour(config.clear_colour);

        let resolution = self.renderer.drawer().resolution();
        if resolution != (config.width, config.height) {
            log::warn!(
                "Configured resolution {}x{} differs from the drawer's {}x{}, keeping the drawer's",
                config.width,
                config.height,
                resolution.0,
                resolution.1
            );
        }
        Ok(())
    }

    pub fn drawer(&self) -> &D {
        self.renderer.drawer()
    }

    pub fn drawer_mut(&mut self) -> &mut D {
        self.renderer.drawer_mut()
    }

    pub fn set_clear_colour(&mut self, colour: Colour) {
        self.config.clear_colour = colour;
        self.renderer.drawer_mut().set_clear_colour(colour);
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera_position.get()
    }

    pub fn camera_rotation(&self) -> Vec3 {
        self.camera_rotation.get()
    }

    pub fn set_camera_position(&self, position: Vec3) {
        self.camera_position.set(position);
    }

    /// Euler angles in turns.
    pub fn set_camera_rotation(&self, rotation: Vec3) {
        self.camera_rotation.set(rotation);
    }

    /// Handles to the camera pose, for code that moves the camera without the context.
    pub fn camera_handles(&self) -> (CameraHandle, CameraHandle) {
        (
            Rc::clone(&self.camera_position),
            Rc::clone(&self.camera_rotation),
        )
    }

    /// Loads every entry of an asset manifest, resolving files below
    /// `config.assets_root`. Returns the number of assets loaded.
    pub fn load_assets(&mut self, manifest: &Path) -> Result<usize> {
        log::info!("Loading assets listed in {}", manifest.display());
        let entries = parse_manifest(&load_string(manifest)?)?;
        let mut loaded = 0;

        for entry in &entries {
            let path = entry.path(&self.config.assets_root);
            match (entry.kind, &entry.extra) {
                (ResourceKind::Mesh, extra) => {
                    let texture = match extra {
                        AssetExtra::Texture(name) => Some(name.as_str()),
                        _ => None,
                    };
                    self.renderer.load_mesh(&path, &entry.name, texture)?;
                }
                (ResourceKind::Texture, _) => self.drawer_mut().load_texture(&path, &entry.name)?,
                (ResourceKind::Font, AssetExtra::FontSize(size)) => {
                    self.drawer_mut().load_font(&path, &entry.name, *size)?
                }
                (ResourceKind::Font, _) => {
                    log::warn!("Font '{}' has no size, skipping it", entry.name);
                    continue;
                }
                (ResourceKind::Sound, _) => {
                    log::warn!("Sound '{}' skipped: audio is not supported", entry.name);
                    continue;
                }
            }
            loaded += 1;
        }

        log::info!("Loaded {} of {} assets", loaded, entries.len());
        Ok(loaded)
    }
}

impl Context<Canvas> {
    /// A context drawing into an in-memory [`Canvas`] sized from the config.
    pub fn headless(config: EngineConfig) -> Result<Self> {
        let canvas = Canvas::new(config.width, config.height);
        Self::new(canvas, config)
    }
}
