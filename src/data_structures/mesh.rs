//! Shared, immutable mesh geometry.
//!
//! A [`MeshData`] is loaded (or generated) once and then handed around as an
//! `Rc<MeshData>`; scene nodes never copy vertex data.

/// Flattened triangle-list geometry: every three points form one triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub point_count: usize,
}

impl MeshData {
    pub fn new(
        name: impl Into<String>,
        positions: Vec<[f32; 3]>,
        normals: Vec<[f32; 3]>,
        tex_coords: Vec<[f32; 2]>,
    ) -> Self {
        let point_count = positions.len();
        Self {
            name: name.into(),
            positions,
            normals,
            tex_coords,
            point_count,
        }
    }

    /// A mesh with nothing to draw. Scene nodes holding one are kept in the
    /// hierarchy but never submitted to the renderer.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.point_count == 0
    }

    /// Unit cube centred on the origin, 36 vertices with outward normals.
    pub fn cube(name: impl Into<String>) -> Self {
        // (normal, tangent u, tangent v) per face
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ];
        const CORNERS: [[f32; 2]; 6] = [
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [1.0, 1.0],
            [0.0, 1.0],
            [0.0, 0.0],
        ];

        let mut positions = Vec::with_capacity(36);
        let mut normals = Vec::with_capacity(36);
        let mut tex_coords = Vec::with_capacity(36);
        for (n, u, v) in FACES {
            for [s, t] in CORNERS {
                let (a, b) = (s - 0.5, t - 0.5);
                positions.push([
                    n[0] * 0.5 + u[0] * a + v[0] * b,
                    n[1] * 0.5 + u[1] * a + v[1] * b,
                    n[2] * 0.5 + u[2] * a + v[2] * b,
                ]);
                normals.push(n);
                tex_coords.push([s, 1.0 - t]);
            }
        }
        Self::new(name, positions, normals, tex_coords)
    }

    /// Interleaves the attribute arrays for upload. Missing normals or texture
    /// coordinates are filled with zeros.
    pub fn vertices(&self) -> Vec<MeshVertex> {
        (0..self.point_count)
            .map(|i| MeshVertex {
                position: self.positions[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0; 3]),
                tex_coords: self.tex_coords.get(i).copied().unwrap_or([0.0; 2]),
            })
            .collect()
    }
}

/// The per-vertex layout the Phong pipeline consumes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_faces_point_outward() {
        let cube = MeshData::cube("cube");
        assert_eq!(cube.point_count, 36);
        for (p, n) in cube.positions.iter().zip(&cube.normals) {
            let along = p[0] * n[0] + p[1] * n[1] + p[2] * n[2];
            assert!((along - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn vertices_fill_missing_attributes() {
        let mesh = MeshData::new("tri", vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], vec![], vec![]);
        let vertices = mesh.vertices();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[1].normal, [0.0; 3]);
    }
}
