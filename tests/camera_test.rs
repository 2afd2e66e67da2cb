use cgmath::{Deg, Rad, Vector3};
use instant::Duration;
use scene_labs::{
    camera::{Camera, CameraController, CameraUniform, Projection},
    data_structures::transform::TranslationController,
};
use winit::{event::ElementState, keyboard::KeyCode};

use crate::common::test_utils::{assert_mat_near, assert_vec_near};

mod common;

const ONE_SECOND: Duration = Duration::from_secs(1);

fn lab_camera() -> Camera {
    Camera::new((0.0, 0.0, 3.0), Deg(-90.0), Deg(0.0))
}

#[test]
fn forward_moves_down_negative_z() {
    let mut camera = lab_camera();
    let mut controller = CameraController::new(2.0, 0.4);
    assert!(controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed));
    controller.update_camera(&mut camera, ONE_SECOND);
    assert!((camera.position.z - 1.0).abs() < 1e-5);
    assert!(camera.position.x.abs() < 1e-5);
}

#[test]
fn released_keys_stop_the_camera() {
    let mut camera = lab_camera();
    let mut controller = CameraController::new(2.0, 0.4);
    controller.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
    controller.process_keyboard(KeyCode::KeyD, ElementState::Released);
    controller.update_camera(&mut camera, ONE_SECOND);
    assert_vec_near(
        Vector3::new(camera.position.x, camera.position.y, camera.position.z),
        Vector3::new(0.0, 0.0, 3.0),
    );
}

#[test]
fn q_and_e_move_vertically() {
    let mut camera = lab_camera();
    let mut controller = CameraController::new(1.0, 0.4);
    controller.process_keyboard(KeyCode::KeyQ, ElementState::Pressed);
    controller.update_camera(&mut camera, ONE_SECOND);
    assert!((camera.position.y - 1.0).abs() < 1e-5);

    controller.process_keyboard(KeyCode::KeyQ, ElementState::Released);
    controller.process_keyboard(KeyCode::KeyE, ElementState::Pressed);
    controller.update_camera(&mut camera, ONE_SECOND);
    assert!(camera.position.y.abs() < 1e-5);
}

#[test]
fn unrelated_keys_are_ignored() {
    let mut controller = CameraController::new(1.0, 0.4);
    assert!(!controller.process_keyboard(KeyCode::KeyZ, ElementState::Pressed));
    assert!(!controller.process_keyboard(KeyCode::Digit8, ElementState::Pressed));
}

#[test]
fn pitch_is_clamped_short_of_vertical() {
    let mut camera = lab_camera();
    let mut controller = CameraController::new(1.0, 1.0);
    controller.process_mouse(0.0, -1.0e6);
    controller.update_camera(&mut camera, ONE_SECOND);
    assert!(camera.pitch <= Rad::from(Deg(89.0)));
    assert!(camera.pitch > Rad::from(Deg(88.0)));

    controller.process_mouse(0.0, 1.0e6);
    controller.update_camera(&mut camera, ONE_SECOND);
    assert!(camera.pitch >= -Rad::from(Deg(89.0)));
}

#[test]
fn mouse_deltas_apply_once() {
    let mut camera = lab_camera();
    let mut controller = CameraController::new(1.0, 0.5);
    controller.process_mouse(1.0, 0.0);
    controller.update_camera(&mut camera, ONE_SECOND);
    let turned = camera.yaw;
    controller.update_camera(&mut camera, ONE_SECOND);
    assert_eq!(camera.yaw, turned);
}

#[test]
fn uniform_carries_the_eye_position() {
    let camera = lab_camera();
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let mut uniform = CameraUniform::new();
    uniform.update_view_proj(&camera, &projection);
    assert_eq!(uniform.view_position, [0.0, 0.0, 3.0, 1.0]);
}

#[test]
fn sky_matrix_ignores_where_the_camera_stands() {
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let mut here = CameraUniform::new();
    here.update_view_proj(&lab_camera(), &projection);
    let mut there = CameraUniform::new();
    there.update_view_proj(&Camera::new((40.0, -7.0, 12.0), Deg(-90.0), Deg(0.0)), &projection);

    assert_eq!(here.sky_view_proj, there.sky_view_proj);
    assert_ne!(here.view_proj, there.view_proj);
}

#[test]
fn sky_matrix_turns_with_the_camera() {
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let mut ahead = CameraUniform::new();
    ahead.update_view_proj(&lab_camera(), &projection);
    let mut aside = CameraUniform::new();
    aside.update_view_proj(&Camera::new((0.0, 0.0, 3.0), Deg(0.0), Deg(0.0)), &projection);

    assert_ne!(ahead.sky_view_proj, aside.sky_view_proj);
}

#[test]
fn sky_matrix_equals_projection_for_an_unturned_camera() {
    let projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    let mut uniform = CameraUniform::new();
    uniform.update_view_proj(&lab_camera(), &projection);
    assert_mat_near(uniform.sky_view_proj.into(), projection.calc_matrix());
}

#[test]
fn projection_tracks_the_surface_aspect() {
    let mut projection = Projection::new(800, 600, Deg(45.0), 0.1, 100.0);
    assert!((projection.aspect() - 800.0 / 600.0).abs() < 1e-6);
    projection.resize(400, 400);
    assert!((projection.aspect() - 1.0).abs() < 1e-6);
    // A minimized window must not divide by zero
    projection.resize(400, 0);
    assert!(projection.aspect().is_finite());
}

#[test]
fn train_keys_nudge_the_offset() {
    let mut train = TranslationController::new(2.0);
    assert!(train.process_key(KeyCode::Digit8));
    train.update(ONE_SECOND);
    assert_vec_near(train.offset(), Vector3::new(0.0, 2.0, 0.0));

    assert!(train.process_key(KeyCode::Numpad4));
    assert!(train.process_key(KeyCode::Digit9));
    train.update(ONE_SECOND);
    assert_vec_near(train.offset(), Vector3::new(-2.0, 2.0, 2.0));

    // Presses are consumed by the update
    train.update(ONE_SECOND);
    assert_vec_near(train.offset(), Vector3::new(-2.0, 2.0, 2.0));
}

#[test]
fn r_resets_the_train() {
    let mut train = TranslationController::default();
    train.process_key(KeyCode::Digit6);
    train.update(ONE_SECOND);
    assert!(train.offset().x > 0.0);

    train.process_key(KeyCode::Digit6);
    assert!(train.process_key(KeyCode::KeyR));
    train.update(ONE_SECOND);
    assert_vec_near(train.offset(), Vector3::new(0.0, 0.0, 0.0));
    assert!(!train.process_key(KeyCode::KeyW));
}
