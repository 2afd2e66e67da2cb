use std::rc::Rc;

use cgmath::{Matrix4, SquareMatrix, Vector3};
use scene_labs::{
    camera::CameraUniform,
    data_structures::{mesh::MeshData, scene_graph::SceneNode},
    render::{FrameRecorder, RenderTarget},
    viewport::{OrbitCamera, Viewport, quad_views},
};

fn eye_at(z: f32) -> CameraUniform {
    CameraUniform {
        view_position: [0.0, 0.0, z, 1.0],
        ..CameraUniform::new()
    }
}

#[test]
fn new_recorder_has_one_full_surface_view() {
    let frame = FrameRecorder::new(eye_at(3.0));
    assert_eq!(frame.views().len(), 1);
    assert!(frame.views()[0].viewport.is_none());
    assert_eq!(frame.draw_count(), 0);
}

#[test]
fn draws_use_the_latest_world_transform() {
    let mesh = Rc::new(MeshData::cube("cube"));
    let moved = Matrix4::from_translation(Vector3::new(1.0, 0.0, 0.0));
    let mut frame = FrameRecorder::new(eye_at(3.0));

    frame.draw(&mesh);
    frame.set_world_transform(moved);
    frame.draw(&mesh);

    let worlds: Vec<_> = frame.draw_calls().map(|call| call.world).collect();
    assert_eq!(worlds, [Matrix4::identity(), moved]);
}

#[test]
fn begin_view_replaces_an_untouched_first_view() {
    let mut frame = FrameRecorder::new(eye_at(3.0));
    let viewport = Viewport::new(0.0, 0.0, 10.0, 10.0);
    frame.begin_view(Some(viewport), eye_at(40.0));

    assert_eq!(frame.views().len(), 1);
    assert_eq!(frame.views()[0].viewport, Some(viewport));
    assert_eq!(frame.views()[0].camera.view_position[2], 40.0);
}

#[test]
fn begin_view_after_drawing_keeps_earlier_draws() {
    let mesh = Rc::new(MeshData::cube("cube"));
    let mut frame = FrameRecorder::new(eye_at(3.0));
    frame.draw(&mesh);
    frame.begin_view(None, eye_at(20.0));
    frame.draw(&mesh);
    frame.draw(&mesh);

    let per_view: Vec<_> = frame.views().iter().map(|v| v.draws.len()).collect();
    assert_eq!(per_view, [1, 2]);
    assert_eq!(frame.draw_count(), 3);
}

#[test]
fn unlit_flag_applies_until_cleared() {
    let mesh = Rc::new(MeshData::cube("cube"));
    let mut frame = FrameRecorder::new(eye_at(3.0));
    frame.draw(&mesh);
    frame.set_unlit(true);
    frame.draw(&mesh);
    frame.set_unlit(false);
    frame.draw(&mesh);

    let unlit: Vec<_> = frame.draw_calls().map(|call| call.unlit).collect();
    assert_eq!(unlit, [false, true, false]);
}

#[test]
fn quad_view_records_the_scene_once_per_quadrant() {
    let mut root = SceneNode::new(Rc::new(MeshData::cube("engine")));
    root.create_child(Matrix4::from_translation(Vector3::new(0.0, 0.0, -1.0)));

    let mut frame = FrameRecorder::new(eye_at(3.0));
    for (viewport, camera) in quad_views(640, 480, &OrbitCamera::new(15.0)) {
        frame.begin_view(Some(viewport), camera);
        root.display(&mut frame);
    }

    assert_eq!(frame.views().len(), 4);
    assert!(frame.views().iter().all(|view| view.draws.len() == 2));
    assert!(frame.views().iter().all(|view| view.viewport.is_some()));
}

#[cfg(target_pointer_width = "64")]
#[test]
fn oversized_meshes_are_clamped_to_the_largest_draw() {
    let huge = Rc::new(MeshData {
        point_count: u32::MAX as usize + 1,
        ..MeshData::empty("huge")
    });
    let mut frame = FrameRecorder::new(eye_at(3.0));
    frame.draw(&huge);
    assert_eq!(frame.views()[0].draws[0].vertex_count, u32::MAX);
}
