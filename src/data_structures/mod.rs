//! Scene data structures: meshes, transforms, scene graphs and terrain.
//!
//! - `mesh` holds shared, immutable geometry and its GPU vertex layout
//! - `transform` turns translate/rotate/scale descriptions into matrices
//! - `scene_graph` composes parent-relative transforms into world transforms
//! - `terrain` is the heightmap grid with lazily rebuilt normals
//! - `cubemap` holds the six skybox faces before upload
//! - `texture` wraps GPU textures: depth buffer, material maps and the skybox

pub mod cubemap;
pub mod mesh;
pub mod scene_graph;
pub mod terrain;
pub mod texture;
pub mod transform;
