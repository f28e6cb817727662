//! The frame orchestrator.
//!
//! [`Renderer3D`] owns the mesh registry, the per-frame queue and the
//! camera/projection state. Scenes enqueue draw requests during a frame and
//! [`Renderer3D::render_frame`] drains the queue into draw calls on the
//! owned [`Drawer`]:
//!
//! 1. build the view matrix from the bound camera
//! 2. transform every queued object to world and view space
//! 3. drop back faces and light the rest
//! 4. sort back to front
//! 5. clip at the near plane
//! 6. project and draw
//!
//! There is no depth buffer. Overlapping geometry is ordered per triangle by
//! the sum of its view-space depths, so intersecting triangles can be drawn in
//! the wrong order.

use std::{cell::Cell, collections::HashMap, path::Path, rc::Rc};

use crate::{
    data_structures::{
        mesh::Mesh, render_data::RenderData, texture::Texture, transform::Transform,
    },
    drawer::Drawer,
    error::{Error, Result, ResourceKind},
    math::{Matrix4x4, Vec3, VectorExt, vec3},
    render::{
        Plane, RawTriangle, clip_against_plane, is_back_face, light_factor, project,
        sort_back_to_front, unit_normal,
    },
    resources,
};

pub const DEFAULT_FOV: f32 = 70.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 1000.0;

/// A shared, mutable camera value. The scene keeps one handle and moves the
/// camera through it, the renderer reads it once per frame.
pub type CameraHandle = Rc<Cell<Vec3>>;

/// Triangle counts of one rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Objects that were in the queue.
    pub queued: usize,
    /// Triangles that survived back-face culling.
    pub emitted: usize,
    /// Triangles left after near-plane clipping.
    pub clipped: usize,
    /// Draw calls issued to the drawer.
    pub drawn: usize,
}

pub struct Renderer3D<D: Drawer> {
    drawer: D,
    fov: f32,
    near: f32,
    far: f32,
    camera_position: Option<CameraHandle>,
    camera_rotation: Option<CameraHandle>,
    sun_direction: Vec3,
    meshes: HashMap<String, Rc<Mesh>>,
    queue: Vec<RenderData>,
    view: Matrix4x4,
    projection: Matrix4x4,
}

impl<D: Drawer> Renderer3D<D> {
    pub fn new(drawer: D) -> Self {
        let projection =
            Matrix4x4::perspective(DEFAULT_FOV, drawer.aspect_ratio(), DEFAULT_NEAR, DEFAULT_FAR);
        Self {
            drawer,
            fov: DEFAULT_FOV,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            camera_position: None,
            camera_rotation: None,
            sun_direction: vec3(1.0, 1.0, 1.0) / 3.0f32.sqrt(),
            meshes: HashMap::new(),
            queue: Vec::new(),
            view: Matrix4x4::IDENTITY,
            projection,
        }
    }

    pub fn drawer(&self) -> &D {
        &self.drawer
    }

    pub fn drawer_mut(&mut self) -> &mut D {
        &mut self.drawer
    }

    pub fn into_drawer(self) -> D {
        self.drawer
    }

    // ~ meshes

    /// Loads an OBJ file and registers it under `name`.
    ///
    /// `texture` names a drawer texture the mesh is drawn with.
    pub fn load_mesh(&mut self, path: &Path, name: &str, texture: Option<&str>) -> Result<Rc<Mesh>> {
        self.ensure_free(name)?;
        let mesh = resources::mesh::load_mesh(path, texture)?;
        log::info!(
            "Loaded mesh '{}' from {} ({} verts, {} triangles)",
            name,
            path.display(),
            mesh.verts().len(),
            mesh.triangles().len()
        );
        self.insert_mesh(name, mesh)
    }

    /// Registers an in-memory mesh under `name`.
    pub fn insert_mesh(&mut self, name: &str, mesh: Mesh) -> Result<Rc<Mesh>> {
        self.ensure_free(name)?;
        let mesh = Rc::new(mesh);
        self.meshes.insert(name.to_owned(), Rc::clone(&mesh));
        Ok(mesh)
    }

    pub fn unload_mesh(&mut self, name: &str) -> Result<()> {
        self.meshes.remove(name).ok_or_else(|| mesh_not_found(name))?;
        log::info!("Unloaded mesh '{}'", name);
        Ok(())
    }

    pub fn mesh(&self, name: &str) -> Result<Rc<Mesh>> {
        self.meshes.get(name).cloned().ok_or_else(|| mesh_not_found(name))
    }

    fn ensure_free(&self, name: &str) -> Result<()> {
        if self.meshes.contains_key(name) {
            return Err(Error::Duplicate {
                kind: ResourceKind::Mesh,
                name: name.to_owned(),
            });
        }
        Ok(())
    }

    // ~ projection
    //
    // Every setter rejects settings outside `0 < fov < 180` and
    // `0 < near < far` with `Error::Projection` and keeps the old values.

    pub fn set_perspective(&mut self, fov: f32, near: f32, far: f32) -> Result<()> {
        check_projection(fov, near, far)?;
        self.fov = fov;
        self.near = near;
        self.far = far;
        Ok(())
    }

    pub fn set_fov(&mut self, fov: f32) -> Result<()> {
        self.set_perspective(fov, self.near, self.far)
    }

    pub fn set_near_plane(&mut self, near: f32) -> Result<()> {
        self.set_perspective(self.fov, near, self.far)
    }

    pub fn set_far_plane(&mut self, far: f32) -> Result<()> {
        self.set_perspective(self.fov, self.near, far)
    }

    /// Sets both clipping distances. Note the order: far first.
    pub fn set_planes(&mut self, far: f32, near: f32) -> Result<()> {
        self.set_perspective(self.fov, near, far)
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn near_plane(&self) -> f32 {
        self.near
    }

    pub fn far_plane(&self) -> f32 {
        self.far
    }

    // ~ camera and light

    /// Binds the camera. The handles are read on every frame; a missing
    /// handle falls back to the zero vector with a warning.
    pub fn set_camera_transform(
        &mut self,
        position: Option<CameraHandle>,
        rotation: Option<CameraHandle>,
    ) {
        self.camera_position = position;
        self.camera_rotation = rotation;
    }

    pub fn set_sun_direction(&mut self, direction: Vec3) -> Result<()> {
        self.sun_direction = direction
            .try_normalize()
            .ok_or(Error::ZeroVector("sun direction"))?;
        Ok(())
    }

    /// Points the sun along the forward axis of the euler rotation `rotation` (in turns).
    pub fn set_sun_rotation(&mut self, rotation: Vec3) -> Result<()> {
        self.set_sun_direction(Matrix4x4::rotation(rotation).forward())
    }

    pub fn sun_direction(&self) -> Vec3 {
        self.sun_direction
    }

    // ~ queue

    pub fn add_mesh_to_queue(
        &mut self,
        transform: Transform,
        ignore_lighting: bool,
        mesh_name: &str,
    ) -> Result<()> {
        let mesh = self.mesh(mesh_name)?;
        let texture = match mesh.texture_name() {
            Some(name) => Some(self.drawer_texture(name)?),
            None => None,
        };
        self.enqueue(RenderData::from_mesh(mesh, texture, transform, ignore_lighting));
        Ok(())
    }

    pub fn add_texture_to_queue(
        &mut self,
        transform: Transform,
        ignore_lighting: bool,
        texture_name: &str,
    ) -> Result<()> {
        let texture = self.drawer_texture(texture_name)?;
        self.enqueue(RenderData::from_texture(texture, transform, ignore_lighting));
        Ok(())
    }

    /// Renders `text` with `font` (or the drawer's current font) and queues it as a quad.
    pub fn add_text_to_queue(
        &mut self,
        transform: Transform,
        ignore_lighting: bool,
        text: &str,
        font: Option<&str>,
    ) -> Result<()> {
        let rendered = self.drawer.render_text(text, font)?;
        self.enqueue(RenderData::from_text(rendered, transform, ignore_lighting));
        Ok(())
    }

    pub fn enqueue(&mut self, data: RenderData) {
        self.queue.push(data);
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    fn drawer_texture(&self, name: &str) -> Result<Rc<Texture>> {
        self.drawer.texture(name).ok_or_else(|| Error::NotFound {
            kind: ResourceKind::Texture,
            name: name.to_owned(),
        })
    }

    // ~ frame

    pub fn view_matrix(&self) -> Matrix4x4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Matrix4x4 {
        self.projection
    }

    /// Draws and clears the queue.
    #[doc(alias = "render_queue")]
    pub fn render_frame(&mut self) -> FrameStats {
        self.update_matrices();

        let queue = std::mem::take(&mut self.queue);
        let mut stats = FrameStats {
            queued: queue.len(),
            ..FrameStats::default()
        };

        let mut triangles = Vec::new();
        for data in &queue {
            self.collect_triangles(data, &mut triangles);
        }
        stats.emitted = triangles.len();
        sort_back_to_front(&mut triangles);

        let near = Plane::near(self.near);
        let resolution = self.drawer.resolution();
        for tri in &triangles {
            for clipped in clip_against_plane(&near, tri) {
                stats.clipped += 1;
                let points = project(&clipped, &self.projection, resolution);
                if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
                    continue;
                }
                self.drawer.set_draw_colour(clipped.colour);
                match clipped.texture {
                    Some(texture) => {
                        self.drawer
                            .draw_triangle_textured(points, clipped.uv_coords, texture)
                    }
                    None => self.drawer.draw_triangle(points, true),
                }
                stats.drawn += 1;
            }
        }

        log::debug!(
            "Frame: {} objects, {} triangles emitted, {} after clipping, {} drawn",
            stats.queued,
            stats.emitted,
            stats.clipped,
            stats.drawn
        );
        stats
    }

    fn camera_pose(&self) -> (Vec3, Vec3) {
        let zero = vec3(0.0, 0.0, 0.0);
        let read = |handle: &Option<CameraHandle>, what: &str| match handle {
            Some(cell) => cell.get(),
            None => {
                log::warn!("No camera {} bound, using the zero vector", what);
                zero
            }
        };
        (
            read(&self.camera_position, "position"),
            read(&self.camera_rotation, "rotation"),
        )
    }

    fn update_matrices(&mut self) {
        let (position, rotation) = self.camera_pose();
        let rotation = Matrix4x4::rotation(rotation);
        self.view = Matrix4x4::look_at(position, position + rotation.forward(), rotation.up());
        self.projection =
            Matrix4x4::perspective(self.fov, self.drawer.aspect_ratio(), self.near, self.far);
    }

    fn collect_triangles<'a>(&self, data: &'a RenderData, out: &mut Vec<RawTriangle<'a>>) {
        let world = data.transform.to_matrix();
        let world_verts: Vec<Vec3> = data.verts().iter().map(|v| *v * world).collect();
        let view_verts: Vec<Vec3> = world_verts.iter().map(|v| *v * self.view).collect();
        let texture = data.texture();

        for tri in data.triangles() {
            let view_tri = tri.verts.map(|i| view_verts[i]);
            if is_back_face(&view_tri) {
                continue;
            }

            let Some(normal) = unit_normal(&tri.verts.map(|i| world_verts[i])) else {
                log::trace!("Skipping degenerate triangle {:?}", tri.verts);
                continue;
            };
            let colour = if data.is_light_ignored() {
                tri.colour
            } else {
                tri.colour.scaled(light_factor(normal, self.sun_direction))
            };

            out.push(RawTriangle {
                verts: view_tri,
                uv_coords: data.triangle_uvs(tri),
                colour,
                texture,
            });
        }
    }
}

/// Checks `0 < fov < 180` (degrees) and `0 < near < far`.
///
/// A near plane at zero would leave clipped vertices at `w = 0`, where no
/// perspective divide happens.
pub fn check_projection(fov: f32, near: f32, far: f32) -> Result<()> {
    if fov > 0.0 && fov < 180.0 && near > 0.0 && far > near {
        Ok(())
    } else {
        Err(Error::Projection { fov, near, far })
    }
}

fn mesh_not_found(name: &str) -> Error {
    Error::NotFound {
        kind: ResourceKind::Mesh,
        name: name.to_owned(),
    }
}
