//! Scene graph and hierarchical scene organization.
//!
//! A [`SceneNode`] owns its children outright, so the hierarchy is always a
//! tree. Each node stores a transform relative to its parent; the world
//! transform used for drawing is the product of every ancestor's local
//! transform followed by the node's own:
//!
//! ```text
//! world(node) = local(root) * ... * local(parent) * local(node)
//! ```
//!
//! Geometry is shared: all nodes created through [`SceneNode::create_child`]
//! point at the same `Rc<MeshData>` as their parent.

use std::rc::Rc;

use cgmath::{Matrix4, SquareMatrix};
use log::debug;

use crate::{
    data_structures::{mesh::MeshData, transform::TransformSpec},
    render::RenderTarget,
};

#[derive(Clone, Debug)]
pub struct SceneNode {
    mesh: Rc<MeshData>,
    transform: Matrix4<f32>,
    children: Vec<SceneNode>,
}

impl SceneNode {
    /// A node with an identity local transform.
    pub fn new(mesh: Rc<MeshData>) -> Self {
        Self::with_matrix(mesh, Matrix4::identity())
    }

    pub fn with_matrix(mesh: Rc<MeshData>, transform: Matrix4<f32>) -> Self {
        Self {
            mesh,
            transform,
            children: Vec::new(),
        }
    }

    /// Builds the node's local matrix from `placement` once, at construction.
    pub fn with_transform(mesh: Rc<MeshData>, placement: &TransformSpec) -> Self {
        Self::with_matrix(mesh, placement.to_matrix())
    }

    /// Appends a child drawing the same mesh as `self`, placed relative to
    /// `self` by `local`. Accepts a raw `Matrix4` or a `TransformSpec`.
    pub fn create_child(&mut self, local: impl Into<Matrix4<f32>>) -> &mut SceneNode {
        let child = SceneNode::with_matrix(Rc::clone(&self.mesh), local.into());
        self.add_child(child)
    }

    /// Attaches a node that brings its own mesh, e.g. a box car hitched to a train.
    pub fn add_child(&mut self, child: SceneNode) -> &mut SceneNode {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn child(&self, index: usize) -> Option<&SceneNode> {
        self.children.get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut SceneNode> {
        self.children.get_mut(index)
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    pub fn mesh(&self) -> &Rc<MeshData> {
        &self.mesh
    }

    pub fn transform(&self) -> Matrix4<f32> {
        self.transform
    }

    pub fn set_transform(&mut self, transform: Matrix4<f32>) {
        self.transform = transform;
    }

    /// Re-bakes the local matrix from `placement`. Only call this between frames.
    pub fn set_transformation(&mut self, placement: &TransformSpec) {
        self.transform = placement.to_matrix();
    }

    /// Renders this node as the root of a hierarchy (identity parent).
    pub fn display(&self, target: &mut dyn RenderTarget) {
        self.display_with_parent(&Matrix4::identity(), target);
    }

    /// Draws this node with `parent * local`, then every child in insertion order.
    pub fn display_with_parent(&self, parent: &Matrix4<f32>, target: &mut dyn RenderTarget) {
        let world = parent * self.transform;
        target.set_world_transform(world);
        if self.mesh.is_empty() {
            debug!("skipping draw of empty mesh {:?}", self.mesh.name);
        } else {
            target.draw(&self.mesh);
        }
        for child in &self.children {
            child.display_with_parent(&world, target);
        }
    }

    /// World transforms of this node and all descendants, in draw order.
    pub fn world_transforms(&self) -> Vec<Matrix4<f32>> {
        let mut out = Vec::with_capacity(self.node_count());
        self.collect_world_transforms(&Matrix4::identity(), &mut out);
        out
    }

    fn collect_world_transforms(&self, parent: &Matrix4<f32>, out: &mut Vec<Matrix4<f32>>) {
        let world = parent * self.transform;
        out.push(world);
        for child in &self.children {
            child.collect_world_transforms(&world, out);
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }
}
