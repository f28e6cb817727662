use std::{cell::Cell, rc::Rc};

use approx::assert_abs_diff_eq;
use image::Rgba;
use soft_ngin::{
    Colour, Error, Transform, Vec3, vec3,
    data_structures::{
        mesh::{Mesh, Triangle},
        texture::Texture,
    },
    drawer::Drawer,
    error::ResourceKind,
    render::to_screen,
    renderer::{FrameStats, Renderer3D},
};

use crate::common::test_utils::{DrawCall, RecordingDrawer, init_logger, inside_screen, unit_quad};

mod common;

const RES: (u32, u32) = (800, 600);

fn renderer() -> Renderer3D<RecordingDrawer> {
    init_logger();
    Renderer3D::new(RecordingDrawer::new(RES.0, RES.1))
}

fn bind_camera(r: &mut Renderer3D<RecordingDrawer>, position: Vec3, rotation: Vec3) -> (Rc<Cell<Vec3>>, Rc<Cell<Vec3>>) {
    let pos = Rc::new(Cell::new(position));
    let rot = Rc::new(Cell::new(rotation));
    r.set_camera_transform(Some(Rc::clone(&pos)), Some(Rc::clone(&rot)));
    (pos, rot)
}

#[test]
fn unit_quad_in_front_of_the_camera_draws_two_triangles() {
    let mut r = renderer();
    r.insert_mesh("quad", unit_quad(Colour::WHITE)).unwrap();
    bind_camera(&mut r, vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 0.0));
    r.set_sun_direction(vec3(0.0, 0.0, 1.0)).unwrap();

    r.add_mesh_to_queue(Transform::default(), false, "quad").unwrap();
    let stats = r.render_frame();

    assert_eq!(
        stats,
        FrameStats {
            queued: 1,
            emitted: 2,
            clipped: 2,
            drawn: 2
        }
    );
    let calls = &r.drawer().calls;
    assert_eq!(calls.len(), 2);
    // equal depth, so the triangles keep their mesh order: {0,1,2} then {0,2,3}
    let top_right = |p: &soft_ngin::Vec2| p.x > 400.0 && p.y < 300.0;
    assert!(calls[0].points().iter().any(top_right));
    assert!(!calls[1].points().iter().any(top_right));
    for call in calls {
        assert!(matches!(call, DrawCall::Flat { fill: true, .. }));
        assert!(call.points().iter().all(|p| inside_screen(*p, RES)), "{call:?}");
        // the quad faces the camera, the sun shines along the view direction
        assert_eq!(call.colour(), Colour::BLACK);
    }
}

#[test]
fn quad_centre_projects_to_screen_centre() {
    let mut r = renderer();
    r.insert_mesh("quad", unit_quad(Colour::WHITE)).unwrap();
    bind_camera(&mut r, vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 0.0));
    r.add_mesh_to_queue(Transform::default(), true, "quad").unwrap();
    r.render_frame();

    // the quad's diagonal 0-2 passes through the centre of the screen
    let first = r.drawer().calls[0].points();
    let mid = (first[0] + first[2]) * 0.5;
    assert_abs_diff_eq!(mid.x, 400.0, epsilon = 1e-2);
    assert_abs_diff_eq!(mid.y, 300.0, epsilon = 1e-2);
}

#[test]
fn view_axis_projects_to_the_centre_for_any_camera_pose() {
    let mut r = renderer();
    let (pos, rot) = bind_camera(&mut r, vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 0.0));
    for (p, e) in [
        (vec3(1.0, 2.0, 3.0), vec3(0.0, 0.2, 0.0)),
        (vec3(-4.0, 0.0, 9.0), vec3(0.07, -0.31, 0.0)),
    ] {
        pos.set(p);
        rot.set(e);
        r.render_frame();
        let forward = soft_ngin::Matrix4x4::rotation(e).forward();
        let point = p + forward * 12.0;
        let screen = to_screen((point * r.view_matrix()) * r.projection_matrix(), RES);
        assert_abs_diff_eq!(screen.x, 400.0, epsilon = 1e-2);
        assert_abs_diff_eq!(screen.y, 300.0, epsilon = 1e-2);
    }
}

#[test]
fn triangles_are_drawn_back_to_front() {
    let mut r = renderer();
    let colours = [Colour::new(255, 0, 0), Colour::new(0, 255, 0), Colour::new(0, 0, 255)];
    for (i, colour) in colours.iter().enumerate() {
        r.insert_mesh(&format!("quad{i}"), unit_quad(*colour)).unwrap();
    }
    bind_camera(&mut r, vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 0.0));

    // enqueued near to far, so sorting has to reverse them
    r.add_mesh_to_queue(Transform::at(vec3(0.0, 0.0, 0.0)), true, "quad2").unwrap();
    r.add_mesh_to_queue(Transform::at(vec3(0.2, 0.0, 5.0)), true, "quad1").unwrap();
    r.add_mesh_to_queue(Transform::at(vec3(-0.2, 0.0, 10.0)), true, "quad0").unwrap();
    r.render_frame();

    let order: Vec<Colour> = r.drawer().calls.iter().map(DrawCall::colour).collect();
    assert_eq!(
        order,
        vec![colours[0], colours[0], colours[1], colours[1], colours[2], colours[2]]
    );
}

#[test]
fn ignored_lighting_keeps_the_declared_colour() {
    let mut r = renderer();
    let colour = Colour::new(120, 60, 30);
    r.insert_mesh("quad", unit_quad(colour)).unwrap();
    bind_camera(&mut r, vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 0.0));
    r.set_sun_direction(vec3(0.0, 0.0, 1.0)).unwrap();

    r.add_mesh_to_queue(Transform::default(), true, "quad").unwrap();
    r.render_frame();
    assert!(r.drawer().calls.iter().all(|c| c.colour() == colour));
}

#[test]
fn sun_facing_the_surface_keeps_full_brightness() {
    let mut r = renderer();
    let colour = Colour::new(120, 60, 30);
    r.insert_mesh("quad", unit_quad(colour)).unwrap();
    bind_camera(&mut r, vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 0.0));
    // world normal of the quad is -z
    r.set_sun_direction(vec3(0.0, 0.0, -3.0)).unwrap();
    assert_abs_diff_eq!(r.sun_direction().z, -1.0);

    r.add_mesh_to_queue(Transform::default(), false, "quad").unwrap();
    r.render_frame();
    assert!(r.drawer().calls.iter().all(|c| c.colour() == colour));
}

#[test]
fn sun_rotation_uses_the_forward_axis() {
    let mut r = renderer();
    r.set_sun_rotation(vec3(0.0, 0.0, 0.0)).unwrap();
    assert_eq!(r.sun_direction(), vec3(0.0, 0.0, 1.0));
    r.set_sun_rotation(vec3(0.0, 0.25, 0.0)).unwrap();
    assert_abs_diff_eq!(r.sun_direction().x, 1.0, epsilon = 1e-6);
}

#[test]
fn zero_sun_direction_is_rejected() {
    let mut r = renderer();
    let before = r.sun_direction();
    assert!(matches!(
        r.set_sun_direction(vec3(0.0, 0.0, 0.0)),
        Err(Error::ZeroVector(_))
    ));
    assert_eq!(r.sun_direction(), before);
}

#[test]
fn back_facing_quad_is_culled() {
    let mut r = renderer();
    r.insert_mesh("quad", unit_quad(Colour::WHITE)).unwrap();
    bind_camera(&mut r, vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 0.0));
    let turned = Transform::new(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.5, 0.0), vec3(1.0, 1.0, 1.0));
    r.add_mesh_to_queue(turned, false, "quad").unwrap();

    let stats = r.render_frame();
    assert_eq!(stats.emitted, 0);
    assert!(r.drawer().calls.is_empty());
}

#[test]
fn renders_with_the_zero_pose_when_no_camera_is_bound() {
    let mut r = renderer();
    r.insert_mesh("quad", unit_quad(Colour::WHITE)).unwrap();
    r.add_mesh_to_queue(Transform::at(vec3(0.0, 0.0, 5.0)), true, "quad").unwrap();
    let stats = r.render_frame();
    assert_eq!(stats.drawn, 2);
    assert_eq!(r.view_matrix(), soft_ngin::Matrix4x4::IDENTITY);
}

#[test]
fn camera_handles_are_read_every_frame() {
    let mut r = renderer();
    let (pos, _rot) = bind_camera(&mut r, vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 0.0));
    r.render_frame();
    let before = r.view_matrix();
    pos.set(vec3(3.0, 0.0, 0.0));
    r.render_frame();
    assert_ne!(r.view_matrix(), before);
    assert_abs_diff_eq!(r.view_matrix().m[3][0], -3.0, epsilon = 1e-6);
}

#[test]
fn triangle_crossing_the_near_plane_is_split() {
    let mut r = renderer();
    let floor = Mesh::from_parts(
        vec![vec3(-1.0, -1.0, 5.0), vec3(1.0, -1.0, 5.0), vec3(0.0, -1.0, -2.0)],
        Vec::new(),
        vec![Triangle::new([0, 1, 2])],
        None,
    )
    .unwrap();
    r.insert_mesh("floor", floor).unwrap();
    bind_camera(&mut r, vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 0.0));
    r.add_mesh_to_queue(Transform::default(), true, "floor").unwrap();

    let stats = r.render_frame();
    assert_eq!(stats.emitted, 1);
    assert_eq!(stats.clipped, 2);
    assert_eq!(stats.drawn, 2);
    for call in &r.drawer().calls {
        assert!(call.points().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}

#[test]
fn texture_quads_are_drawn_textured() {
    let mut r = renderer();
    r.drawer_mut()
        .add_texture("logo", Texture::solid(4, 2, Rgba([255, 0, 0, 255]), None))
        .unwrap();
    bind_camera(&mut r, vec3(0.0, 0.0, -10.0), vec3(0.0, 0.0, 0.0));
    r.add_texture_to_queue(Transform::default(), true, "logo").unwrap();
    r.render_frame();

    let calls = &r.drawer().calls;
    assert_eq!(calls.len(), 2);
    for call in calls {
        let DrawCall::Textured {
            uv_coords,
            texture_size,
            colour,
            ..
        } = call
        else {
            panic!("expected a textured call, got {call:?}");
        };
        assert_eq!(*texture_size, (4, 2));
        assert_eq!(*colour, Colour::WHITE);
        assert!(uv_coords.iter().all(|uv| (0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y)));
    }
}

#[test]
fn text_is_drawn_on_a_quad() {
    let mut r = renderer();
    r.drawer_mut().add_font("mono");
    r.drawer_mut().set_draw_font("mono").unwrap();
    bind_camera(&mut r, vec3(0.0, 0.0, -100.0), vec3(0.0, 0.0, 0.0));
    r.add_text_to_queue(Transform::default(), true, "hi", None).unwrap();
    r.render_frame();

    assert_eq!(r.drawer().calls.len(), 2);
    assert!(matches!(
        r.drawer().calls[0],
        DrawCall::Textured { texture_size: (16, 16), .. }
    ));
}

#[test]
fn textured_mesh_uses_the_drawer_texture() {
    let mut r = renderer();
    r.drawer_mut()
        .add_texture("bricks", Texture::solid(2, 2, Rgba([9, 9, 9, 255]), None))
        .unwrap();
    let quad = unit_quad(Colour::WHITE);
    let mesh = Mesh::from_parts(
        quad.verts().to_vec(),
        vec![soft_ngin::vec2(0.0, 0.0), soft_ngin::vec2(1.0, 0.0), soft_ngin::vec2(1.0, 1.0)],
        vec![Triangle::new([0, 1, 2]).with_uv_coords([0, 1, 2])],
        Some("bricks".to_owned()),
    )
    .unwrap();
    r.insert_mesh("bricks", mesh).unwrap();
    bind_camera(&mut r, vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 0.0));
    r.add_mesh_to_queue(Transform::default(), true, "bricks").unwrap();
    r.render_frame();

    assert!(matches!(
        r.drawer().calls.as_slice(),
        [DrawCall::Textured { texture_size: (2, 2), .. }]
    ));
}

#[test]
fn queue_is_cleared_after_each_frame() {
    let mut r = renderer();
    r.insert_mesh("quad", unit_quad(Colour::WHITE)).unwrap();
    r.add_mesh_to_queue(Transform::at(vec3(0.0, 0.0, 5.0)), true, "quad").unwrap();
    assert_eq!(r.queue_len(), 1);
    r.render_frame();
    assert_eq!(r.queue_len(), 0);

    let stats = r.render_frame();
    assert_eq!(stats, FrameStats::default());
    assert_eq!(r.drawer().calls.len(), 2);
}

#[test]
fn unknown_names_are_reported_instead_of_faulting() {
    let mut r = renderer();
    let not_found = |res: soft_ngin::Result<()>, expected: ResourceKind| match res {
        Err(Error::NotFound { kind, .. }) => assert_eq!(kind, expected),
        other => panic!("expected not found, got {other:?}"),
    };

    not_found(r.add_mesh_to_queue(Transform::default(), false, "ghost"), ResourceKind::Mesh);
    not_found(r.add_texture_to_queue(Transform::default(), false, "ghost"), ResourceKind::Texture);
    not_found(r.unload_mesh("ghost"), ResourceKind::Mesh);
    assert!(matches!(r.mesh("ghost"), Err(Error::NotFound { .. })));

    let textured = Mesh::from_parts(Vec::new(), Vec::new(), Vec::new(), Some("missing".to_owned())).unwrap();
    r.insert_mesh("textured", textured).unwrap();
    not_found(r.add_mesh_to_queue(Transform::default(), false, "textured"), ResourceKind::Texture);
    assert_eq!(r.queue_len(), 0);
}

#[test]
fn mesh_names_are_unique_until_unloaded() {
    let mut r = renderer();
    r.insert_mesh("quad", unit_quad(Colour::WHITE)).unwrap();
    assert!(matches!(
        r.insert_mesh("quad", unit_quad(Colour::BLACK)),
        Err(Error::Duplicate { kind: ResourceKind::Mesh, .. })
    ));
    r.unload_mesh("quad").unwrap();
    r.insert_mesh("quad", unit_quad(Colour::BLACK)).unwrap();
    assert_eq!(r.mesh("quad").unwrap().triangles()[0].colour, Colour::BLACK);
}

#[test]
fn projection_settings_are_independent() {
    let mut r = renderer();
    r.set_perspective(60.0, 0.5, 50.0).unwrap();
    r.set_fov(90.0).unwrap();
    assert_eq!((r.fov(), r.near_plane(), r.far_plane()), (90.0, 0.5, 50.0));
    r.set_planes(200.0, 1.0).unwrap();
    assert_eq!((r.near_plane(), r.far_plane()), (1.0, 200.0));
    r.set_near_plane(2.0).unwrap();
    r.set_far_plane(20.0).unwrap();
    r.render_frame();

    let p = r.projection_matrix();
    assert_abs_diff_eq!(p.m[1][1], 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(p.m[0][0], 600.0 / 800.0, epsilon = 1e-6);
    assert_abs_diff_eq!(p.m[2][2], 20.0 / 18.0, epsilon = 1e-6);
}

#[test]
fn tilted_quad_draws_its_farther_half_first() {
    let mut r = renderer();
    r.insert_mesh("quad", unit_quad(Colour::WHITE)).unwrap();
    bind_camera(&mut r, vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 0.0));
    // turns the right edge towards the camera, so {0,2,3} is farther than {0,1,2}
    let tilted = Transform::new(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.1, 0.0), vec3(1.0, 1.0, 1.0));
    r.add_mesh_to_queue(tilted, true, "quad").unwrap();
    r.render_frame();

    let calls = &r.drawer().calls;
    assert_eq!(calls.len(), 2);
    let bottom_left = |p: &soft_ngin::Vec2| p.x < 400.0 && p.y > 300.0;
    let top_right = |p: &soft_ngin::Vec2| p.x > 400.0 && p.y < 300.0;
    assert!(calls[0].points().iter().any(bottom_left), "{calls:?}");
    assert!(calls[1].points().iter().any(top_right), "{calls:?}");
}

#[test]
fn zero_area_triangles_are_skipped() {
    let mut r = renderer();
    let mesh = Mesh::from_parts(
        vec![
            vec3(-0.5, 0.5, 0.0),
            vec3(0.5, 0.5, 0.0),
            vec3(0.5, -0.5, 0.0),
            vec3(0.0, 0.0, 0.0),
        ],
        Vec::new(),
        vec![
            // all corners on one point, then all on one line
            Triangle::new([3, 3, 3]).with_colour(Colour::new(1, 1, 1)),
            Triangle::new([0, 3, 2]).with_colour(Colour::new(2, 2, 2)),
            Triangle::new([0, 1, 2]).with_colour(Colour::new(200, 100, 50)),
        ],
        None,
    )
    .unwrap();
    r.insert_mesh("mixed", mesh).unwrap();
    bind_camera(&mut r, vec3(0.0, 0.0, -5.0), vec3(0.0, 0.0, 0.0));
    r.set_sun_direction(vec3(0.0, 0.0, -1.0)).unwrap();
    r.add_mesh_to_queue(Transform::default(), false, "mixed").unwrap();

    let stats = r.render_frame();
    assert_eq!(stats.emitted, 1);
    assert_eq!(stats.drawn, 1);
    let calls = &r.drawer().calls;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].colour(), Colour::new(200, 100, 50));
    assert!(calls[0].points().iter().all(|p| p.x.is_finite() && p.y.is_finite()));
}

#[test]
fn invalid_projection_settings_are_rejected() {
    let mut r = renderer();
    r.set_perspective(60.0, 0.5, 50.0).unwrap();
    for result in [
        r.set_near_plane(0.0),
        r.set_near_plane(-1.0),
        r.set_near_plane(50.0),
        r.set_far_plane(0.25),
        r.set_planes(1.0, 2.0),
        r.set_fov(0.0),
        r.set_fov(180.0),
        r.set_perspective(60.0, 0.5, f32::NAN),
    ] {
        assert!(matches!(result, Err(Error::Projection { .. })), "{result:?}");
    }
    assert_eq!((r.fov(), r.near_plane(), r.far_plane()), (60.0, 0.5, 50.0));
}
