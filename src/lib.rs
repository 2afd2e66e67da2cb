//! scene-labs
//!
//! Small real-time 3D labs built on wgpu. The core is GPU-free and can be
//! used (and tested) on its own: a scene graph of parent-relative transforms
//! and a heightmap terrain with smoothed normals. Around it sits a thin shell
//! that opens a window and draws the labs with multi-light Phong shading,
//! texture-mapped materials and a skybox.
//!
//! High-level modules
//! - `data_structures`: meshes, transforms, the scene graph and terrain
//! - `render`: the draw-submission seam and the frame recorder
//! - `resources`: OBJ mesh, heightmap, texture and skybox loading
//! - `camera`: fly camera, projection and controller
//! - `viewport`: split-screen views
//! - `pipelines`: typed lights, the Phong pipeline and the skybox pass
//! - `context`: the render context handed to every flow hook
//! - `flow`: the event loop and the `GraphicsFlow` trait
//! - `config`: demo configuration

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod viewport;

pub use error::{Error, Result};

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use winit::event::{DeviceEvent, WindowEvent};
