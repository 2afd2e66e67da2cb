//! Structured descriptions of a node's local transform.
//!
//! A [`TransformSpec`] is baked into a single matrix with a fixed order:
//! translate, then every rotation in sequence, then scale. Reordering the
//! steps changes the result, so the order is not configurable.
//!
//! Two keyboard controllers edit transforms at run time: [`TranslationController`]
//! nudges an offset smoothly, [`PoseController`] steps four objects per key press.

use cgmath::{Deg, InnerSpace, Matrix4, SquareMatrix, Vector3, Zero};
use instant::Duration;
use winit::keyboard::KeyCode;

/// A rotation of `degrees` around `axis`. The axis does not need to be unit length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    pub degrees: f32,
    pub axis: Vector3<f32>,
}

impl Rotation {
    pub fn new(degrees: f32, axis: impl Into<Vector3<f32>>) -> Self {
        Self {
            degrees,
            axis: axis.into(),
        }
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        // A zero axis has no direction to rotate around
        if self.axis.magnitude2() == 0.0 {
            return Matrix4::identity();
        }
        Matrix4::from_axis_angle(self.axis.normalize(), Deg(self.degrees))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransformSpec {
    pub translate: Vector3<f32>,
    pub rotations: Vec<Rotation>,
    pub scale: Vector3<f32>,
}

impl TransformSpec {
    /// The identity transform: no translation, no rotations, unit scale.
    pub fn new() -> Self {
        Self {
            translate: Vector3::zero(),
            rotations: Vec::new(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn translate(mut self, translate: impl Into<Vector3<f32>>) -> Self {
        self.translate = translate.into();
        self
    }

    /// Appends a rotation; rotations apply in the order they were added.
    pub fn rotate(mut self, degrees: f32, axis: impl Into<Vector3<f32>>) -> Self {
        self.rotations.push(Rotation::new(degrees, axis));
        self
    }

    pub fn scale(mut self, scale: impl Into<Vector3<f32>>) -> Self {
        self.scale = scale.into();
        self
    }

    pub fn uniform_scale(self, scale: f32) -> Self {
        self.scale(Vector3::new(scale, scale, scale))
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        let rotated = self
            .rotations
            .iter()
            .fold(Matrix4::from_translation(self.translate), |m, r| {
                m * r.to_matrix()
            });
        rotated * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for TransformSpec {
    fn default() -> Self {
        Self::new()
    }
}

impl From<TransformSpec> for Matrix4<f32> {
    fn from(placement: TransformSpec) -> Self {
        placement.to_matrix()
    }
}

impl From<&TransformSpec> for Matrix4<f32> {
    fn from(placement: &TransformSpec) -> Self {
        placement.to_matrix()
    }
}

/// Keyboard nudging of a translation offset.
///
/// Digits (or numpad keys) 8/2 move along y, 4/6 along x and 7/9 along z at
/// `speed` units per second. `R` snaps the offset back to zero.
#[derive(Debug)]
pub struct TranslationController {
    offset: Vector3<f32>,
    direction: Vector3<f32>,
    speed: f32,
}

impl TranslationController {
    pub const DEFAULT_SPEED: f32 = 2.0;

    pub fn new(speed: f32) -> Self {
        Self {
            offset: Vector3::zero(),
            direction: Vector3::zero(),
            speed,
        }
    }

    /// Registers a key press. Returns `true` when the key belongs to this controller.
    pub fn process_key(&mut self, key: KeyCode) -> bool {
        let step = match key {
            KeyCode::Digit8 | KeyCode::Numpad8 => Vector3::unit_y(),
            KeyCode::Digit2 | KeyCode::Numpad2 => -Vector3::unit_y(),
            KeyCode::Digit4 | KeyCode::Numpad4 => -Vector3::unit_x(),
            KeyCode::Digit6 | KeyCode::Numpad6 => Vector3::unit_x(),
            KeyCode::Digit7 | KeyCode::Numpad7 => -Vector3::unit_z(),
            KeyCode::Digit9 | KeyCode::Numpad9 => Vector3::unit_z(),
            KeyCode::KeyR => {
                self.offset = Vector3::zero();
                self.direction = Vector3::zero();
                return true;
            }
            _ => return false,
        };
        self.direction += step;
        true
    }

    /// Applies the presses collected since the last frame, scaled by the frame time.
    pub fn update(&mut self, dt: Duration) {
        self.offset += self.direction * self.speed * dt.as_secs_f32();
        self.direction = Vector3::zero();
    }

    pub fn offset(&self) -> Vector3<f32> {
        self.offset
    }
}

impl Default for TranslationController {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SPEED)
    }
}

/// The keyboard-driven state of one object in the transform lab.
///
/// `spin_axes` holds a sign per axis: `0` leaves that axis out, `±1` rotates
/// around it (or its negation) by the matching entry of `angles`, in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectPose {
    pub angles: Vector3<f32>,
    pub spin_axes: Vector3<f32>,
    pub translation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl ObjectPose {
    /// Unrotated, unit scale, placed at `translation`.
    pub fn at(translation: impl Into<Vector3<f32>>) -> Self {
        Self {
            angles: Vector3::zero(),
            spin_axes: Vector3::zero(),
            translation: translation.into(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Rotations run x, then y, then z, each only when its axis is enabled.
    pub fn to_transform(&self) -> TransformSpec {
        let turns = [
            (self.angles.x, Vector3::new(self.spin_axes.x, 0.0, 0.0)),
            (self.angles.y, Vector3::new(0.0, self.spin_axes.y, 0.0)),
            (self.angles.z, Vector3::new(0.0, 0.0, self.spin_axes.z)),
        ];
        turns
            .into_iter()
            .filter(|(_, axis)| axis.magnitude2() > 0.0)
            .fold(
                TransformSpec::new().translate(self.translation).scale(self.scale),
                |placement, (degrees, axis)| placement.rotate(degrees, axis),
            )
    }
}

/// Per-object keyboard controls for four independent objects.
///
/// | key     | object | effect                                         |
/// |---------|--------|------------------------------------------------|
/// | Q, W, E | 0      | spin 40° about -z, y or x                      |
/// | I, K    | 1      | move up or down                                |
/// | J, L    | 1      | move left or right                             |
/// | U, O    | 1      | move towards or away from the camera           |
/// | Z       | 2      | grow by one unit on every axis                 |
/// | X       | 2      | stretch by (0.3, -0.1, 1)                      |
/// | C       | 3      | spin 40° on every axis and drift down-right    |
/// | R       | all    | back to the starting layout                    |
///
/// Moves are `translate_step` units per press.
#[derive(Debug)]
pub struct PoseController {
    poses: [ObjectPose; Self::OBJECT_COUNT],
    initial: [ObjectPose; Self::OBJECT_COUNT],
    translate_step: f32,
}

impl PoseController {
    pub const OBJECT_COUNT: usize = 4;
    pub const SPIN_STEP_DEG: f32 = 40.0;
    pub const DEFAULT_TRANSLATE_STEP: f32 = 0.01;

    pub fn new(initial: [ObjectPose; Self::OBJECT_COUNT], translate_step: f32) -> Self {
        Self {
            poses: initial,
            initial,
            translate_step,
        }
    }

    /// Object 0 centred, 1 and 2 above it to the left and right, 3 in the
    /// top-left corner already set to spin about x, y and -z.
    pub fn starting_layout() -> [ObjectPose; Self::OBJECT_COUNT] {
        let mut corner = ObjectPose::at((-0.8, 0.8, 0.0));
        corner.spin_axes = Vector3::new(1.0, 1.0, -1.0);
        [
            ObjectPose::at((0.0, 0.0, 0.0)),
            ObjectPose::at((-0.3, 0.3, 0.0)),
            ObjectPose::at((0.3, 0.3, 0.0)),
            corner,
        ]
    }

    /// Applies one key press. Returns `true` when the key belongs to this controller.
    pub fn process_key(&mut self, key: KeyCode) -> bool {
        if key == KeyCode::KeyR {
            self.reset();
            return true;
        }
        let step = self.translate_step;
        let [spinner, mover, stretcher, tumbler] = &mut self.poses;
        match key {
            KeyCode::KeyQ => {
                spinner.spin_axes.z = -1.0;
                spinner.angles.z += Self::SPIN_STEP_DEG;
            }
            KeyCode::KeyW => {
                spinner.spin_axes.y = 1.0;
                spinner.angles.y += Self::SPIN_STEP_DEG;
            }
            KeyCode::KeyE => {
                spinner.spin_axes.x = 1.0;
                spinner.angles.x += Self::SPIN_STEP_DEG;
            }
            KeyCode::KeyI => mover.translation.y += step,
            KeyCode::KeyK => mover.translation.y -= step,
            KeyCode::KeyJ => mover.translation.x -= step,
            KeyCode::KeyL => mover.translation.x += step,
            KeyCode::KeyU => mover.translation.z += step,
            KeyCode::KeyO => mover.translation.z -= step,
            KeyCode::KeyZ => stretcher.scale += Vector3::new(1.0, 1.0, 1.0),
            KeyCode::KeyX => stretcher.scale += Vector3::new(0.3, -0.1, 1.0),
            KeyCode::KeyC => {
                tumbler.angles += Vector3::new(1.0, 1.0, 1.0) * Self::SPIN_STEP_DEG;
                tumbler.translation += Vector3::new(step, -step, 0.0);
            }
            _ => return false,
        }
        true
    }

    pub fn reset(&mut self) {
        self.poses = self.initial;
    }

    pub fn poses(&self) -> &[ObjectPose; Self::OBJECT_COUNT] {
        &self.poses
    }
}

impl Default for PoseController {
    fn default() -> Self {
        Self::new(Self::starting_layout(), Self::DEFAULT_TRANSLATE_STEP)
    }
}
