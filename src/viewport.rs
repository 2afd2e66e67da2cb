//! Split-screen rendering.
//!
//! [`quad_views`] reproduces the four-way viewport lab: the same scene seen
//! through two perspective lenses, an orthographic lens and an orbiting
//! camera, each in its own quarter of the surface.

use cgmath::{Deg, Matrix4, Point3, Rad, Vector3, ortho, perspective};

use crate::camera::{CameraUniform, OPENGL_TO_WGPU_MATRIX};

/// A pixel rectangle on the surface, origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Splits a `width` x `height` surface into
    /// `[bottom_left, bottom_right, top_left, top_right]`.
    pub fn quadrants(width: u32, height: u32) -> [Viewport; 4] {
        let (w, h) = ((width / 2) as f32, (height / 2) as f32);
        [
            Viewport::new(0.0, h, w, h),
            Viewport::new(w, h, w, h),
            Viewport::new(0.0, 0.0, w, h),
            Viewport::new(w, 0.0, w, h),
        ]
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Lens {
    Perspective {
        fovy: Deg<f32>,
        znear: f32,
        zfar: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        znear: f32,
        zfar: f32,
    },
}

impl Lens {
    /// The projection in wgpu clip space. Orthographic lenses ignore `aspect`.
    pub fn matrix(&self, aspect: f32) -> Matrix4<f32> {
        let projection = match *self {
            Lens::Perspective { fovy, znear, zfar } => perspective(fovy, aspect, znear, zfar),
            Lens::Orthographic {
                left,
                right,
                bottom,
                top,
                znear,
                zfar,
            } => ortho(left, right, bottom, top, znear, zfar),
        };
        OPENGL_TO_WGPU_MATRIX * projection
    }
}

/// A camera circling the origin in the xz-plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub radius: f32,
    pub angle: Rad<f32>,
}

impl OrbitCamera {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            angle: Rad(0.0),
        }
    }

    pub fn advance(&mut self, delta: Rad<f32>) {
        self.angle += delta;
    }

    pub fn eye(&self) -> Point3<f32> {
        let (sin, cos) = self.angle.0.sin_cos();
        Point3::new(sin * self.radius, 0.0, cos * self.radius)
    }

    pub fn view(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye(), Point3::new(0.0, 0.0, 0.0), Vector3::unit_y())
    }
}

/// The four lab views for a `width` x `height` surface, in the same order as
/// [`Viewport::quadrants`].
pub fn quad_views(width: u32, height: u32, orbit: &OrbitCamera) -> [(Viewport, CameraUniform); 4] {
    let [bottom_left, bottom_right, top_left, top_right] = Viewport::quadrants(width, height);
    let backed_off = |distance: f32| {
        (
            Point3::new(0.0, 0.0, distance),
            Matrix4::from_translation(Vector3::new(0.0, 0.0, -distance)),
        )
    };
    let ortho_lens = Lens::Orthographic {
        left: -20.0,
        right: 20.0,
        bottom: -15.0,
        top: 15.0,
        znear: 0.0,
        zfar: 100.0,
    };

    let (eye, view) = backed_off(40.0);
    let lens = Lens::Perspective {
        fovy: Deg(45.0),
        znear: 0.01,
        zfar: 100.0,
    };
    let first = CameraUniform::from_matrices(eye, view, lens.matrix(bottom_left.aspect()));

    let (eye, view) = backed_off(20.0);
    let lens = Lens::Perspective {
        fovy: Deg(90.0),
        znear: 0.01,
        zfar: 100.0,
    };
    let second = CameraUniform::from_matrices(eye, view, lens.matrix(bottom_right.aspect()));

    let (eye, view) = backed_off(40.0);
    let third = CameraUniform::from_matrices(eye, view, ortho_lens.matrix(top_left.aspect()));

    // The orbiting view keeps the orthographic lens of the previous quadrant
    let fourth =
        CameraUniform::from_matrices(orbit.eye(), orbit.view(), ortho_lens.matrix(top_right.aspect()));

    [
        (bottom_left, first),
        (bottom_right, second),
        (top_left, third),
        (top_right, fourth),
    ]
}
