//! The object hierarchy lab.
//!
//! A train engine with a box car hitched to it and a second engine coupled
//! behind, lit by one directional light, four point lights and a flashlight on
//! the camera. A terrain sits below the train.
//!
//! Controls: W/S/A/D/Q/E fly, right mouse button looks around, 8/2/4/6/7/9
//! move the train, R resets it, V toggles the four-viewport view, Escape quits.

use std::rc::Rc;

use cgmath::{EuclideanSpace, Matrix4, Rad, Vector3};
use instant::Duration;
use scene_labs::{
    config::LabConfig,
    context::Context,
    data_structures::{
        mesh::MeshData,
        scene_graph::SceneNode,
        terrain::HeightField,
        transform::{TransformSpec, TranslationController},
    },
    flow::{self, GraphicsFlow, Out},
    render::FrameRecorder,
    resources,
    viewport::{OrbitCamera, quad_views},
};
use winit::{
    event::{DeviceEvent, ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

const BOX_CAR_OFFSET: [f32; 3] = [-170.0, -10.0, -500.0];
const TERRAIN_DROP: f32 = -2.0;
const PROCEDURAL_TERRAIN_SIZE: usize = 64;
const ORBIT_SPEED: f32 = 0.6;

/// Translate `(0, 0, 3) + offset`, turn a quarter around y, shrink to model scale.
fn train_transform(offset: Vector3<f32>) -> TransformSpec {
    TransformSpec::new()
        .translate(Vector3::new(0.0, 0.0, 3.0) + offset)
        .rotate(90.0, (0.0, 1.0, 0.0))
        .uniform_scale(0.001)
}

fn load_or_cube(ctx: &Context, file_name: &str) -> Rc<MeshData> {
    match resources::load_mesh(resources::asset_path(&ctx.lab.asset_dir, file_name)) {
        Ok(mesh) => Rc::new(mesh),
        Err(e) => {
            log::error!("{e}; drawing a cube instead");
            Rc::new(MeshData::cube(file_name))
        }
    }
}

/// Rolling hills, for when no heightmap file is available.
fn procedural_terrain(height_scale: f32) -> scene_labs::Result<HeightField> {
    let n = PROCEDURAL_TERRAIN_SIZE;
    let mut field = HeightField::new(n, n)?;
    for z in 0..n {
        for x in 0..n {
            let (fx, fz) = (x as f32 / n as f32, z as f32 / n as f32);
            let h = (fx * std::f32::consts::TAU).sin() * (fz * std::f32::consts::TAU * 2.0).cos();
            field.set_height(x, z, h * height_scale * 0.25)?;
        }
    }
    field.compute_normals();
    Ok(field)
}

struct HierarchyLab {
    train: SceneNode,
    lamp: SceneNode,
    terrain: SceneNode,
    offset: TranslationController,
    orbit: OrbitCamera,
    quad_view: bool,
}

impl HierarchyLab {
    fn new(ctx: &Context) -> anyhow::Result<Self> {
        let lab = &ctx.lab;

        let mut train = SceneNode::with_transform(
            load_or_cube(ctx, &lab.root_mesh),
            &train_transform(Vector3::new(0.0, 0.0, 0.0)),
        );
        train.add_child(SceneNode::with_matrix(
            load_or_cube(ctx, &lab.child_mesh),
            Matrix4::from_translation(BOX_CAR_OFFSET.into()),
        ));
        // Same engine mesh, coupled behind the box car and facing back
        train.create_child(
            TransformSpec::new()
                .translate((0.0, 0.0, -1000.0))
                .rotate(180.0, (0.0, 1.0, 0.0)),
        );

        let lamp = SceneNode::with_transform(
            Rc::new(MeshData::cube("lamp")),
            &TransformSpec::new()
                .translate(ctx.lighting.points[0].position.to_vec())
                .uniform_scale(0.2),
        );

        let heightmap = resources::asset_path(&lab.asset_dir, &lab.heightmap);
        let mut field = match resources::load_heightmap(&heightmap, lab.height_scale) {
            Ok(field) => field,
            Err(e) => {
                log::warn!("{e}; generating terrain instead");
                procedural_terrain(lab.height_scale)?
            }
        };
        let placement = Matrix4::from_translation(Vector3::new(0.0, TERRAIN_DROP, 0.0))
            * field.fit_transform(lab.terrain_extent);
        let terrain = SceneNode::with_matrix(Rc::new(field.to_mesh("terrain")), placement);

        log::info!("scene ready: {} train nodes", train.node_count());
        Ok(Self {
            train,
            lamp,
            terrain,
            offset: TranslationController::default(),
            orbit: OrbitCamera::new(15.0),
            quad_view: false,
        })
    }

    fn draw_scene(&self, frame: &mut FrameRecorder) {
        self.terrain.display(frame);
        self.train.display(frame);
        frame.set_unlit(true);
        self.lamp.display(frame);
        frame.set_unlit(false);
    }
}

impl GraphicsFlow for HierarchyLab {
    fn on_init(&mut self, _ctx: &mut Context) -> Out {
        Out::Empty
    }

    fn on_update(&mut self, _ctx: &Context, dt: Duration) -> Out {
        self.offset.update(dt);
        self.train
            .set_transformation(&train_transform(self.offset.offset()));
        self.orbit.advance(Rad(ORBIT_SPEED * dt.as_secs_f32()));
        Out::Empty
    }

    fn on_window_events(&mut self, _ctx: &Context, event: &WindowEvent) -> Out {
        let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state: ElementState::Pressed,
                    repeat,
                    ..
                },
            ..
        } = event
        else {
            return Out::Empty;
        };
        match code {
            KeyCode::Escape => Out::Exit,
            KeyCode::KeyV if !repeat => {
                self.quad_view = !self.quad_view;
                log::info!("quad view {}", if self.quad_view { "on" } else { "off" });
                Out::Empty
            }
            _ => {
                self.offset.process_key(*code);
                Out::Empty
            }
        }
    }

    fn on_device_events(&mut self, _ctx: &Context, _event: &DeviceEvent) -> Out {
        Out::Empty
    }

    fn on_render(&self, ctx: &Context, frame: &mut FrameRecorder) {
        if self.quad_view {
            let [width, height] = ctx.surface_size();
            for (viewport, camera) in quad_views(width, height, &self.orbit) {
                frame.begin_view(Some(viewport), camera);
                self.draw_scene(frame);
            }
        } else {
            self.draw_scene(frame);
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let lab = LabConfig::from_env();
    log::info!("assets from {}", lab.asset_dir.display());
    flow::run(
        lab,
        Box::new(|ctx: &Context| Ok(Box::new(HierarchyLab::new(ctx)?) as Box<dyn GraphicsFlow>)),
    )
}
