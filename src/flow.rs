//! Flow control and application event loop.
//!
//! A "flow" is the scene being shown: it reacts to input, advances its own
//! state every frame and records what to draw. The engine owns the window, the
//! [`Context`] and the renderer, and drives the flow through one
//! single-threaded loop.
//!
//! # User-facing types
//!
//! - [`GraphicsFlow`] is the trait a scene implements
//! - [`Out`] lets a hook reconfigure the context or end the program
//!
//! # Lifecycle Flow
//!
//! Each frame:
//! 1. Window and device events reach the camera controller, then the flow
//! 2. The camera moves and the spot light follows it
//! 3. `on_update` advances the flow
//! 4. `on_render` records the frame into a [`FrameRecorder`]
//! 5. The Phong renderer uploads the recording and draws it
//! 6. The skybox fills whatever the scene left uncovered
//! 7. The frame is presented

use std::{fmt::Debug, iter, sync::Arc};

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::PhysicalKey,
    window::Window,
};

use crate::{
    config::LabConfig,
    context::Context,
    data_structures::{cubemap::CubeFaces, texture::Texture},
    pipelines::{phong::PhongRenderer, skybox::SkyboxRenderer},
    render::FrameRecorder,
    resources::{asset_path, load_cubemap, load_texture},
};

/// What a lifecycle hook asks the engine to do next.
///
/// `Configure` runs once with mutable access to the context, e.g. to change
/// the clear colour or move the camera. `Exit` closes the window and ends
/// [`run`]. `Empty` is the default: nothing to do.
pub enum Out {
    Configure(Box<dyn FnOnce(&mut Context)>),
    Exit,
    Empty,
}

impl Default for Out {
    fn default() -> Self {
        Self::Empty
    }
}

impl Debug for Out {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configure(_) => f.write_str("Configure(|&mut Context| {...})"),
            Self::Exit => f.write_str("Exit"),
            Self::Empty => f.write_str("Empty"),
        }
    }
}

/// A scene driven by the engine.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once after the context exists
/// 2. `on_window_events()` and `on_device_events()` are called for each winit input event
/// 3. `on_update()` is called every frame with the elapsed time
/// 4. `on_render()` is called every frame to record draw calls
pub trait GraphicsFlow {
    /// The only hook with mutable access to the context.
    fn on_init(&mut self, ctx: &mut Context) -> Out;

    fn on_update(&mut self, ctx: &Context, dt: Duration) -> Out;

    /// Handle window events (keyboard, mouse buttons, resizing, ...).
    fn on_window_events(&mut self, ctx: &Context, event: &WindowEvent) -> Out;

    /// Handle raw device events such as mouse motion.
    fn on_device_events(&mut self, ctx: &Context, event: &DeviceEvent) -> Out;

    /// Record this frame's draws. Called after `on_update`.
    fn on_render(&self, ctx: &Context, frame: &mut FrameRecorder);
}

/// Builds the flow once the context exists, so it can size itself to the surface.
pub type FlowConstructor = Box<dyn FnOnce(&Context) -> anyhow::Result<Box<dyn GraphicsFlow>>>;

struct AppState {
    ctx: Context,
    renderer: PhongRenderer,
    skybox: Option<SkyboxRenderer>,
    flow: Box<dyn GraphicsFlow>,
    is_surface_configured: bool,
}

impl AppState {
    fn new(window: Arc<Window>, lab: LabConfig, constructor: FlowConstructor) -> anyhow::Result<Self> {
        let ctx = futures::executor::block_on(Context::new(window, lab))?;
        let mut renderer = PhongRenderer::new(&ctx.device, &ctx.queue, ctx.config.format);
        load_material_maps(&ctx, &mut renderer);
        let skybox = ctx.lab.skybox_dir.as_deref().map(|dir| {
            let faces = load_cubemap(asset_path(&ctx.lab.asset_dir, dir), &ctx.lab.skybox_faces)
                .unwrap_or_else(|e| {
                    log::warn!("{e}, using a generated sky instead");
                    CubeFaces::gradient(64, [70, 120, 200], [200, 210, 225], [60, 55, 50])
                });
            SkyboxRenderer::new(&ctx.device, &ctx.queue, ctx.config.format, &faces)
        });
        let flow = constructor(&ctx)?;
        Ok(Self {
            ctx,
            renderer,
            skybox,
            flow,
            is_surface_configured: true,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.resize(width, height);
            self.is_surface_configured = true;
        }
    }

    fn render(&mut self) -> Result<(), wgpu::CurrentSurfaceTexture> {
        self.ctx.window.request_redraw();
        // Rendering requires the surface to be configured
        if !self.is_surface_configured {
            return Ok(());
        }

        let mut frame = FrameRecorder::new(self.ctx.camera_uniform());
        self.flow.on_render(&self.ctx, &mut frame);
        self.renderer.prepare(&self.ctx, &frame);
        if let Some(skybox) = &mut self.skybox {
            skybox.prepare(&self.ctx, &frame);
        }

        let output = match self.ctx.surface.get_current_texture() {
            wgpu::CurrentSurfaceTexture::Success(texture)
            | wgpu::CurrentSurfaceTexture::Suboptimal(texture) => texture,
            other => return Err(other),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });
            self.renderer
                .render(&mut render_pass, &frame, self.ctx.surface_size());
            if let Some(skybox) = &self.skybox {
                skybox.render(&mut render_pass, &frame, self.ctx.surface_size());
            }
        }
        self.ctx.queue.submit(iter::once(encoder.finish()));
        self.ctx.window.pre_present_notify();
        output.present();
        Ok(())
    }
}

/// Replaces the renderer's white maps with the configured images. A map that
/// fails to load stays white.
fn load_material_maps(ctx: &Context, renderer: &mut PhongRenderer) {
    let lab = &ctx.lab;
    if lab.diffuse_map.is_none() && lab.specular_map.is_none() {
        return;
    }
    let load = |file: Option<&str>, linear: bool, fallback: &str| {
        file.and_then(|file| {
            load_texture(asset_path(&lab.asset_dir, file), linear, &ctx.device, &ctx.queue)
                .inspect_err(|e| log::warn!("{e}, using a white map instead"))
                .ok()
        })
        .unwrap_or_else(|| Texture::solid(&ctx.device, &ctx.queue, [255; 4], fallback, linear))
    };
    let diffuse = load(lab.diffuse_map.as_deref(), false, "default diffuse map");
    let specular = load(lab.specular_map.as_deref(), true, "default specular map");
    renderer.set_material_maps(&ctx.device, &diffuse, &specular);
}

pub struct App {
    lab: Option<LabConfig>,
    // Taken once the window exists.
    constructor: Option<FlowConstructor>,
    state: Option<AppState>,
    last_time: Instant,
    mouse_look: bool,
}

impl App {
    fn new(lab: LabConfig, constructor: FlowConstructor) -> Self {
        Self {
            lab: Some(lab),
            constructor: Some(constructor),
            state: None,
            last_time: Instant::now(),
            mouse_look: false,
        }
    }
}

fn handle_flow_output(out: Out, ctx: &mut Context, event_loop: &ActiveEventLoop) {
    match out {
        Out::Configure(f) => f(ctx),
        Out::Exit => event_loop.exit(),
        Out::Empty => (),
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Only the first resume creates the window
        let (Some(lab), Some(constructor)) = (self.lab.take(), self.constructor.take()) else {
            return;
        };
        let window_attributes = Window::default_attributes()
            .with_title(lab.title.clone())
            .with_inner_size(LogicalSize::new(lab.width, lab.height));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("cannot open a window: {e}");
                event_loop.exit();
                return;
            }
        };

        match AppState::new(window, lab, constructor) {
            Ok(mut state) => {
                let out = state.flow.on_init(&mut state.ctx);
                handle_flow_output(out, &mut state.ctx, event_loop);
                state.ctx.window.request_redraw();
                self.last_time = Instant::now();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("initialization failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn device_event(&mut self, event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(state) = &mut self.state else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.mouse_look {
                state.ctx.controller.process_mouse(dx, dy);
            }
        }
        let out = state.flow.on_device_events(&state.ctx, &event);
        handle_flow_output(out, &mut state.ctx, event_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        match &event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        ..
                    },
                ..
            } if state.ctx.lab.camera_keys => {
                state.ctx.controller.process_keyboard(*code, *key_state);
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Right,
                ..
            } => self.mouse_look = button_state.is_pressed(),
            _ => {}
        }

        let out = state.flow.on_window_events(&state.ctx, &event);
        handle_flow_output(out, &mut state.ctx, event_loop);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                let ctx = &mut state.ctx;
                ctx.controller.update_camera(&mut ctx.camera, dt);
                ctx.lighting.follow_camera(ctx.camera.position, ctx.camera.front());

                let out = state.flow.on_update(&state.ctx, dt);
                handle_flow_output(out, &mut state.ctx, event_loop);

                match state.render() {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::CurrentSurfaceTexture::Lost | wgpu::CurrentSurfaceTexture::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => log::error!("unable to render: {e:?}"),
                }
            }
            _ => {}
        }
    }
}

/// Opens the window and runs `constructor`'s flow until the window closes.
pub fn run(lab: LabConfig, constructor: FlowConstructor) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(lab, constructor);
    event_loop.run_app(&mut app)?;
    Ok(())
}

