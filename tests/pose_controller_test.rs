use cgmath::{Deg, Matrix4, Vector3};
use scene_labs::data_structures::transform::{ObjectPose, PoseController, TransformSpec};
use winit::keyboard::KeyCode;

use crate::common::test_utils::{assert_mat_near, assert_vec_near};

mod common;

fn press(controls: &mut PoseController, keys: &[KeyCode]) {
    for key in keys {
        assert!(controls.process_key(*key), "{key:?} was not handled");
    }
}

#[test]
fn starting_layout_places_four_objects() {
    let controls = PoseController::default();
    let poses = controls.poses();
    assert_vec_near(poses[0].translation, Vector3::new(0.0, 0.0, 0.0));
    assert_vec_near(poses[1].translation, Vector3::new(-0.3, 0.3, 0.0));
    assert_vec_near(poses[2].translation, Vector3::new(0.3, 0.3, 0.0));
    assert_vec_near(poses[3].translation, Vector3::new(-0.8, 0.8, 0.0));
    assert_vec_near(poses[3].spin_axes, Vector3::new(1.0, 1.0, -1.0));
    assert!(poses.iter().all(|pose| pose.scale == Vector3::new(1.0, 1.0, 1.0)));
}

#[test]
fn unrotated_pose_is_a_plain_translation() {
    let controls = PoseController::default();
    // Object 3 has spin axes but no angle yet
    assert_mat_near(
        controls.poses()[3].to_transform().to_matrix(),
        Matrix4::from_translation(Vector3::new(-0.8, 0.8, 0.0)),
    );
    assert!(controls.poses()[0].to_transform().rotations.is_empty());
}

#[test]
fn q_spins_the_first_object_about_negative_z() {
    let mut controls = PoseController::default();
    press(&mut controls, &[KeyCode::KeyQ, KeyCode::KeyQ]);

    let pose = controls.poses()[0];
    assert_eq!(pose.angles.z, 80.0);
    assert_mat_near(
        pose.to_transform().to_matrix(),
        Matrix4::from_axis_angle(-Vector3::unit_z(), Deg(80.0)),
    );
}

#[test]
fn spins_combine_x_then_y_then_z() {
    let mut controls = PoseController::default();
    press(&mut controls, &[KeyCode::KeyQ, KeyCode::KeyW, KeyCode::KeyE]);

    let expected = TransformSpec::new()
        .rotate(40.0, (1.0, 0.0, 0.0))
        .rotate(40.0, (0.0, 1.0, 0.0))
        .rotate(40.0, (0.0, 0.0, -1.0));
    assert_eq!(controls.poses()[0].to_transform(), expected);
}

#[test]
fn movement_keys_step_the_second_object() {
    let mut controls = PoseController::new(PoseController::starting_layout(), 0.5);
    press(&mut controls, &[KeyCode::KeyI, KeyCode::KeyI, KeyCode::KeyL, KeyCode::KeyO]);
    assert_vec_near(controls.poses()[1].translation, Vector3::new(0.2, 1.3, -0.5));

    press(&mut controls, &[KeyCode::KeyK, KeyCode::KeyJ, KeyCode::KeyU]);
    assert_vec_near(controls.poses()[1].translation, Vector3::new(-0.3, 0.8, 0.0));
    // Nothing else moved
    assert_eq!(controls.poses()[0], PoseController::starting_layout()[0]);
}

#[test]
fn scale_keys_grow_and_stretch_the_third_object() {
    let mut controls = PoseController::default();
    press(&mut controls, &[KeyCode::KeyZ]);
    assert_vec_near(controls.poses()[2].scale, Vector3::new(2.0, 2.0, 2.0));

    press(&mut controls, &[KeyCode::KeyX]);
    assert_vec_near(controls.poses()[2].scale, Vector3::new(2.3, 1.9, 3.0));
}

#[test]
fn c_tumbles_and_drifts_the_corner_object() {
    let mut controls = PoseController::default();
    press(&mut controls, &[KeyCode::KeyC]);

    let pose = controls.poses()[3];
    assert_vec_near(pose.angles, Vector3::new(40.0, 40.0, 40.0));
    assert_vec_near(pose.translation, Vector3::new(-0.79, 0.79, 0.0));
    let rotations = pose.to_transform().rotations;
    assert_eq!(rotations.len(), 3);
    assert_eq!(rotations[2].axis, Vector3::new(0.0, 0.0, -1.0));
}

#[test]
fn r_restores_the_starting_layout() {
    let mut controls = PoseController::default();
    press(
        &mut controls,
        &[KeyCode::KeyQ, KeyCode::KeyI, KeyCode::KeyZ, KeyCode::KeyC, KeyCode::KeyR],
    );
    assert_eq!(controls.poses(), &PoseController::starting_layout());
}

#[test]
fn unrelated_keys_are_not_handled() {
    let mut controls = PoseController::default();
    assert!(!controls.process_key(KeyCode::KeyA));
    assert!(!controls.process_key(KeyCode::Digit8));
    assert_eq!(controls.poses(), &PoseController::starting_layout());
}

#[test]
fn pose_scale_applies_before_rotation() {
    let mut pose = ObjectPose::at((1.0, 0.0, 0.0));
    pose.spin_axes = Vector3::new(0.0, 0.0, 1.0);
    pose.angles.z = 90.0;
    pose.scale = Vector3::new(2.0, 1.0, 1.0);

    // Scaled along x first, then turned onto y, then moved
    let tip = pose.to_transform().to_matrix() * Vector3::new(1.0, 0.0, 0.0).extend(1.0);
    assert_vec_near(tip.truncate(), Vector3::new(1.0, 2.0, 0.0));
}
