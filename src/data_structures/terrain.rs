//! Heightmap terrain: a fixed grid of heights with derived per-cell normals.
//!
//! Normals are derived data. Any height edit marks them stale, and the next
//! normal query rebuilds the whole grid. A rebuild always covers the whole
//! grid, never a single cell.

use cgmath::{InnerSpace, Matrix4, Vector3, Zero};
use image::GrayImage;

use crate::{
    data_structures::mesh::MeshData,
    error::{Error, Result},
};

/// Weight given to each direct neighbour's raw normal when smoothing.
const FALLOUT_RATIO: f32 = 0.5;

#[derive(Clone, Debug)]
pub struct HeightField {
    width: usize,
    length: usize,
    heights: Vec<f32>,
    normals: Vec<Vector3<f32>>,
    dirty: bool,
}

impl HeightField {
    /// A flat `width` x `length` grid. Both dimensions must be at least 1 and
    /// the cell count must fit in a `usize`.
    pub fn new(width: usize, length: usize) -> Result<Self> {
        let cells = match width.checked_mul(length) {
            Some(cells) if cells > 0 => cells,
            _ => return Err(Error::InvalidDimensions { width, length }),
        };
        Ok(Self {
            width,
            length,
            heights: vec![0.0; cells],
            normals: vec![Vector3::zero(); cells],
            dirty: true,
        })
    }

    /// Builds a grid from 8-bit grayscale samples laid out row by row
    /// (`z * width + x`). A sample `g` becomes `height_scale * (g / 255 - 0.5)`,
    /// so heights span `[-height_scale / 2, height_scale / 2]`. Normals are
    /// computed before returning.
    pub fn from_pixels(
        pixels: &[u8],
        width: usize,
        length: usize,
        height_scale: f32,
    ) -> Result<Self> {
        let mut field = Self::new(width, length)?;
        let expected = width * length;
        if pixels.len() != expected {
            return Err(Error::PixelCountMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        for (height, &gray) in field.heights.iter_mut().zip(pixels) {
            *height = height_scale * (gray as f32 / 255.0 - 0.5);
        }
        field.compute_normals();
        Ok(field)
    }

    pub fn from_image(image: &GrayImage, height_scale: f32) -> Result<Self> {
        Self::from_pixels(
            image.as_raw(),
            image.width() as usize,
            image.height() as usize,
            height_scale,
        )
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// `true` while the stored normals lag behind the heights.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn height(&self, x: usize, z: usize) -> Result<f32> {
        let idx = self.index(x, z)?;
        Ok(self.heights[idx])
    }

    pub fn set_height(&mut self, x: usize, z: usize, value: f32) -> Result<()> {
        let idx = self.index(x, z)?;
        self.heights[idx] = value;
        self.dirty = true;
        Ok(())
    }

    /// The smoothed normal at `(x, z)`, rebuilding every normal first if any
    /// height changed since the last rebuild.
    pub fn normal(&mut self, x: usize, z: usize) -> Result<Vector3<f32>> {
        let idx = self.index(x, z)?;
        if self.dirty {
            self.compute_normals();
        }
        Ok(self.normals[idx])
    }

    /// All normals in row order, rebuilt first when stale.
    pub fn normals(&mut self) -> &[Vector3<f32>] {
        if self.dirty {
            self.compute_normals();
        }
        &self.normals
    }

    /// Rebuilds every normal from the current heights and clears the dirty flag.
    ///
    /// The first pass sums the normalized cross products of each pair of
    /// neighbour directions present around a cell (fewer at edges and
    /// corners). The second pass adds half of each direct neighbour's raw
    /// normal to the cell's own. The result is left unnormalized; a zero sum
    /// falls back to straight up.
    pub fn compute_normals(&mut self) {
        let (w, l) = (self.width, self.length);
        let mut raw = vec![Vector3::zero(); w * l];

        for z in 0..l {
            for x in 0..w {
                let here = self.heights[z * w + x];
                let out = (z > 0).then(|| Vector3::new(0.0, self.heights[(z - 1) * w + x] - here, -1.0));
                let inward = (z + 1 < l).then(|| Vector3::new(0.0, self.heights[(z + 1) * w + x] - here, 1.0));
                let left = (x > 0).then(|| Vector3::new(-1.0, self.heights[z * w + x - 1] - here, 0.0));
                let right = (x + 1 < w).then(|| Vector3::new(1.0, self.heights[z * w + x + 1] - here, 0.0));

                let mut sum = Vector3::zero();
                for (a, b) in [(left, out), (left, inward), (inward, right), (right, out)] {
                    if let (Some(a), Some(b)) = (a, b) {
                        sum += a.cross(b).normalize();
                    }
                }
                raw[z * w + x] = sum;
            }
        }

        for z in 0..l {
            for x in 0..w {
                let mut sum = raw[z * w + x];
                if x > 0 {
                    sum += raw[z * w + x - 1] * FALLOUT_RATIO;
                }
                if x + 1 < w {
                    sum += raw[z * w + x + 1] * FALLOUT_RATIO;
                }
                if z > 0 {
                    sum += raw[(z - 1) * w + x] * FALLOUT_RATIO;
                }
                if z + 1 < l {
                    sum += raw[(z + 1) * w + x] * FALLOUT_RATIO;
                }
                if sum.magnitude2() == 0.0 {
                    sum = Vector3::unit_y();
                }
                self.normals[z * w + x] = sum;
            }
        }

        self.dirty = false;
    }

    /// Triangulates the grid: two triangles per cell quad, positioned at
    /// `(x, height, z)` in grid units with the smoothed normals. A grid with a
    /// single row or column has no quads and yields an empty mesh.
    pub fn to_mesh(&mut self, name: impl Into<String>) -> MeshData {
        let (w, l) = (self.width, self.length);
        if w < 2 || l < 2 {
            return MeshData::empty(name);
        }
        if self.dirty {
            self.compute_normals();
        }

        let quads = (w - 1) * (l - 1);
        let mut positions = Vec::with_capacity(quads * 6);
        let mut normals = Vec::with_capacity(quads * 6);
        let mut tex_coords = Vec::with_capacity(quads * 6);
        let (du, dv) = (1.0 / (w - 1) as f32, 1.0 / (l - 1) as f32);

        for z in 0..l - 1 {
            for x in 0..w - 1 {
                // Counter-clockwise seen from above (+y)
                for (cx, cz) in [(x, z), (x, z + 1), (x + 1, z), (x + 1, z), (x, z + 1), (x + 1, z + 1)] {
                    let idx = cz * w + cx;
                    positions.push([cx as f32, self.heights[idx], cz as f32]);
                    normals.push(self.normals[idx].into());
                    tex_coords.push([cx as f32 * du, cz as f32 * dv]);
                }
            }
        }
        MeshData::new(name, positions, normals, tex_coords)
    }

    /// Centres the grid on the origin and scales its longer side to `extent`
    /// world units.
    pub fn fit_transform(&self, extent: f32) -> Matrix4<f32> {
        let span = (self.width.max(self.length) - 1).max(1) as f32;
        let scale = extent / span;
        Matrix4::from_scale(scale)
            * Matrix4::from_translation(Vector3::new(
                -((self.width - 1) as f32) / 2.0,
                0.0,
                -((self.length - 1) as f32) / 2.0,
            ))
    }

    fn index(&self, x: usize, z: usize) -> Result<usize> {
        if x >= self.width || z >= self.length {
            return Err(Error::IndexOutOfRange {
                x,
                z,
                width: self.width,
                length: self.length,
            });
        }
        Ok(z * self.width + x)
    }
}
