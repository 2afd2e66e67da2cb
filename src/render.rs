//! Draw submission.
//!
//! Scene nodes do not talk to the GPU directly. They push world matrices and
//! draw requests into a [`RenderTarget`]. The engine's target is the
//! [`FrameRecorder`], which captures one frame's draws grouped into views.
//! The Phong pipeline later uploads and replays them. Tests inspect the same
//! recording to check draw order and transforms.
//!
//! # Key types
//!
//! - [`RenderTarget`] is the seam scene nodes draw through
//! - [`DrawCall`] is one captured draw: mesh, world matrix and vertex count
//! - [`View`] is a camera (and optional viewport) with the draws made under it

use std::rc::Rc;

use cgmath::{Matrix4, SquareMatrix};

use crate::{camera::CameraUniform, data_structures::mesh::MeshData, viewport::Viewport};

/// Receives world transforms and draw requests from the scene graph.
pub trait RenderTarget {
    /// Sets the world matrix used by the next [`draw`](Self::draw).
    fn set_world_transform(&mut self, world: Matrix4<f32>);

    /// Draws all `mesh.point_count` vertices of `mesh` with the current world matrix.
    fn draw(&mut self, mesh: &Rc<MeshData>);
}

#[derive(Clone, Debug)]
pub struct DrawCall {
    pub mesh: Rc<MeshData>,
    pub world: Matrix4<f32>,
    pub vertex_count: u32,
    /// Drawn in flat white instead of lit, e.g. a lamp marker.
    pub unlit: bool,
}

/// A camera plus the draws recorded while it was active.
///
/// `viewport: None` covers the whole surface.
#[derive(Clone, Debug)]
pub struct View {
    pub viewport: Option<Viewport>,
    pub camera: CameraUniform,
    pub draws: Vec<DrawCall>,
}

#[derive(Debug)]
pub struct FrameRecorder {
    views: Vec<View>,
    world: Matrix4<f32>,
    unlit: bool,
}

impl FrameRecorder {
    /// A recording with a single full-surface view seen through `camera`.
    pub fn new(camera: CameraUniform) -> Self {
        Self {
            views: vec![View {
                viewport: None,
                camera,
                draws: Vec::new(),
            }],
            world: Matrix4::identity(),
            unlit: false,
        }
    }

    /// Starts a new view; later draws land in it. An untouched initial view
    /// is replaced rather than left behind empty.
    pub fn begin_view(&mut self, viewport: Option<Viewport>, camera: CameraUniform) {
        if let [only] = self.views.as_slice() {
            if only.draws.is_empty() {
                self.views.clear();
            }
        }
        self.views.push(View {
            viewport,
            camera,
            draws: Vec::new(),
        });
    }

    /// Marks the following draws as unlit until switched back.
    pub fn set_unlit(&mut self, unlit: bool) {
        self.unlit = unlit;
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Every recorded draw, in submission order across all views.
    pub fn draw_calls(&self) -> impl Iterator<Item = &DrawCall> {
        self.views.iter().flat_map(|view| view.draws.iter())
    }

    pub fn draw_count(&self) -> usize {
        self.views.iter().map(|view| view.draws.len()).sum()
    }
}

impl RenderTarget for FrameRecorder {
    fn set_world_transform(&mut self, world: Matrix4<f32>) {
        self.world = world;
    }

    fn draw(&mut self, mesh: &Rc<MeshData>) {
        let vertex_count = u32::try_from(mesh.point_count).unwrap_or_else(|_| {
            log::warn!(
                "mesh {:?} has {} points, drawing only the first {}",
                mesh.name,
                mesh.point_count,
                u32::MAX
            );
            u32::MAX
        });
        let call = DrawCall {
            mesh: Rc::clone(mesh),
            world: self.world,
            vertex_count,
            unlit: self.unlit,
        };
        // `new` always creates a view and `begin_view` always pushes one
        if let Some(view) = self.views.last_mut() {
            view.draws.push(call);
        }
    }
}
