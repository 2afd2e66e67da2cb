//! Six square images forming a cube map, in wgpu layer order
//! `+X, -X, +Y, -Y, +Z, -Z`.

use cgmath::{InnerSpace, Vector3};
use image::{Rgba, RgbaImage};

use crate::error::{Error, Result};

pub const FACE_COUNT: usize = 6;

#[derive(Clone, Debug, PartialEq)]
pub struct CubeFaces {
    size: u32,
    faces: Vec<RgbaImage>,
}

impl CubeFaces {
    /// Checks that there are six faces, all square and of the same size.
    pub fn new(faces: Vec<RgbaImage>) -> Result<Self> {
        if faces.len() != FACE_COUNT {
            return Err(Error::InvalidCubemap(format!(
                "expected {FACE_COUNT} faces, got {}",
                faces.len()
            )));
        }
        let size = faces[0].width();
        if size == 0 {
            return Err(Error::InvalidCubemap("faces are empty".to_string()));
        }
        for (i, face) in faces.iter().enumerate() {
            if face.dimensions() != (size, size) {
                return Err(Error::InvalidCubemap(format!(
                    "face {i} is {}x{}, expected {size}x{size}",
                    face.width(),
                    face.height()
                )));
            }
        }
        Ok(Self { size, faces })
    }

    /// A sky fading from `horizon` up to `zenith` and down to `ground`.
    pub fn gradient(size: u32, zenith: [u8; 3], horizon: [u8; 3], ground: [u8; 3]) -> Self {
        let size = size.max(1);
        let faces = (0..FACE_COUNT)
            .map(|face| {
                RgbaImage::from_fn(size, size, |x, y| {
                    let up = face_direction(face, size, x, y).normalize().y;
                    let rgb = if up >= 0.0 {
                        mix(horizon, zenith, up)
                    } else {
                        mix(horizon, ground, -up)
                    };
                    Rgba([rgb[0], rgb[1], rgb[2], 255])
                })
            })
            .collect();
        Self { size, faces }
    }

    /// Edge length of every face in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn faces(&self) -> &[RgbaImage] {
        &self.faces
    }
}

/// Direction through the centre of pixel `(x, y)` of `face`, rows running downwards.
fn face_direction(face: usize, size: u32, x: u32, y: u32) -> Vector3<f32> {
    let s = 2.0 * (x as f32 + 0.5) / size as f32 - 1.0;
    let t = 2.0 * (y as f32 + 0.5) / size as f32 - 1.0;
    match face {
        0 => Vector3::new(1.0, -t, -s),
        1 => Vector3::new(-1.0, -t, s),
        2 => Vector3::new(s, 1.0, t),
        3 => Vector3::new(s, -1.0, -t),
        4 => Vector3::new(s, -t, 1.0),
        _ => Vector3::new(-s, -t, -1.0),
    }
}

fn mix(from: [u8; 3], to: [u8; 3], amount: f32) -> [u8; 3] {
    let amount = amount.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * amount).round() as u8;
    [
        channel(from[0], to[0]),
        channel(from[1], to[1]),
        channel(from[2], to[2]),
    ]
}
