//! The transform lab.
//!
//! Four small cubes in front of the camera, each driven by its own keys:
//! Q/W/E spin the centre cube, I/K/J/L/U/O move the left one, Z/X scale the
//! right one and C tumbles the corner one. R resets, Escape quits. The fly
//! camera ignores the keyboard here but still looks around with the right
//! mouse button.

use std::rc::Rc;

use cgmath::{Deg, Matrix4};
use instant::Duration;
use scene_labs::{
    camera::Camera,
    config::LabConfig,
    context::Context,
    data_structures::{mesh::MeshData, scene_graph::SceneNode, transform::PoseController},
    flow::{self, GraphicsFlow, Out},
    render::FrameRecorder,
};
use winit::{
    event::{DeviceEvent, ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

const CUBE_SIZE: f32 = 0.2;

struct TransformLab {
    objects: Vec<SceneNode>,
    controls: PoseController,
}

impl TransformLab {
    fn new() -> Self {
        let cube = Rc::new(MeshData::cube("cube"));
        let controls = PoseController::default();
        let objects = controls
            .poses()
            .iter()
            .enumerate()
            .map(|(i, pose)| {
                let pivot_mesh = Rc::new(MeshData::empty(format!("object {i}")));
                let mut pivot = SceneNode::with_transform(pivot_mesh, &pose.to_transform());
                pivot.add_child(SceneNode::with_matrix(
                    Rc::clone(&cube),
                    Matrix4::from_scale(CUBE_SIZE),
                ));
                pivot
            })
            .collect();
        Self { objects, controls }
    }
}

impl GraphicsFlow for TransformLab {
    fn on_init(&mut self, ctx: &mut Context) -> Out {
        ctx.camera = Camera::new((0.0, 0.0, 3.0), Deg(-90.0), Deg(0.0));
        Out::Empty
    }

    fn on_update(&mut self, _ctx: &Context, _dt: Duration) -> Out {
        for (node, pose) in self.objects.iter_mut().zip(self.controls.poses()) {
            node.set_transformation(&pose.to_transform());
        }
        Out::Empty
    }

    fn on_window_events(&mut self, _ctx: &Context, event: &WindowEvent) -> Out {
        let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state: ElementState::Pressed,
                    ..
                },
            ..
        } = event
        else {
            return Out::Empty;
        };
        if *code == KeyCode::Escape {
            return Out::Exit;
        }
        if self.controls.process_key(*code) {
            log::debug!("{code:?} -> {:?}", self.controls.poses());
        }
        Out::Empty
    }

    fn on_device_events(&mut self, _ctx: &Context, _event: &DeviceEvent) -> Out {
        Out::Empty
    }

    fn on_render(&self, _ctx: &Context, frame: &mut FrameRecorder) {
        for object in &self.objects {
            object.display(frame);
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let lab = LabConfig {
        title: "Transform Lab".to_string(),
        clear_colour: wgpu::Color::BLACK,
        skybox_dir: None,
        camera_keys: false,
        ..LabConfig::from_env()
    };
    flow::run(
        lab,
        Box::new(|_ctx: &Context| Ok(Box::new(TransformLab::new()) as Box<dyn GraphicsFlow>)),
    )
}
