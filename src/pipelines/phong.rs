//! The multi-light Phong pipeline.
//!
//! Rendering a [`FrameRecorder`] happens in two steps. [`PhongRenderer::prepare`]
//! runs before the render pass: it uploads the lights, one uniform slot per
//! recorded draw and vertex buffers for meshes it has not seen yet.
//! [`PhongRenderer::render`] then replays the draws inside the pass, selecting
//! each slot with a dynamic offset.
//!
//! Diffuse and specular maps are shared by every draw. Until
//! [`PhongRenderer::set_material_maps`] is called both are plain white, which
//! leaves the constant material untouched.

use std::{
    collections::{HashMap, hash_map::Entry},
    mem,
    num::NonZeroU64,
    rc::Rc,
};

use cgmath::{Matrix, Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::{
    context::Context,
    data_structures::{
        mesh::{MeshData, MeshVertex},
        texture::{self, Texture},
    },
    pipelines::{light::LightingSetup, mk_render_pipeline, set_view_viewport},
    render::{DrawCall, FrameRecorder},
    resources::texture::diffuse_specular_layout,
};

/// Per-draw uniform data, one slot per recorded draw call.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`, so normals survive non-uniform scaling.
    pub normal: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub flags: [f32; 4],
}

impl DrawUniform {
    pub fn new(call: &DrawCall, view_proj: [[f32; 4]; 4], eye: [f32; 4]) -> Self {
        let normal = call
            .world
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);
        Self {
            model: call.world.into(),
            normal: normal.into(),
            view_proj,
            eye,
            flags: [if call.unlit { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }
}

struct GpuMesh {
    // Holding the mesh keeps its address from being reused by another mesh
    mesh: Rc<MeshData>,
    vertex_buffer: wgpu::Buffer,
}

pub struct PhongRenderer {
    pipeline: wgpu::RenderPipeline,
    light_buffer: wgpu::Buffer,
    light_bind_group: wgpu::BindGroup,
    draw_layout: wgpu::BindGroupLayout,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_capacity: usize,
    stride: u64,
    material_layout: wgpu::BindGroupLayout,
    material_bind_group: wgpu::BindGroup,
    fallback_sampler: wgpu::Sampler,
    meshes: HashMap<*const MeshData, GpuMesh>,
}

impl PhongRenderer {
    const INITIAL_DRAWS: usize = 64;

    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let light_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("light_bind_group_layout"),
        });
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(mem::size_of::<DrawUniform>() as u64),
                },
                count: None,
            }],
            label: Some("draw_bind_group_layout"),
        });

        let light_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[LightingSetup::default().to_raw()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let light_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &light_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: light_buffer.as_entire_binding(),
            }],
            label: Some("light_bind_group"),
        });

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let stride = (mem::size_of::<DrawUniform>() as u64).div_ceil(alignment) * alignment;
        let (draw_buffer, draw_bind_group) =
            mk_draw_buffer(device, &draw_layout, stride, Self::INITIAL_DRAWS);

        let material_layout = diffuse_specular_layout(device);
        let fallback_sampler = texture::create_default_sampler(device);
        let white_diffuse = Texture::solid(device, queue, [255; 4], "default diffuse map", false);
        let white_specular = Texture::solid(device, queue, [255; 4], "default specular map", true);
        let material_bind_group = mk_material_bind_group(
            device,
            &material_layout,
            &fallback_sampler,
            &white_diffuse,
            &white_specular,
        );

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Phong Pipeline Layout"),
            bind_group_layouts: &[Some(&light_layout), Some(&draw_layout), Some(&material_layout)],
            immediate_size: 0,
        });
        let shader = wgpu::ShaderModuleDescriptor {
            label: Some("Phong Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("phong.wgsl").into()),
        };
        let pipeline = mk_render_pipeline(
            device,
            &layout,
            format,
            Some(wgpu::BlendState::REPLACE),
            Some(Texture::DEPTH_FORMAT),
            &[MeshVertex::desc()],
            shader,
        );

        Self {
            pipeline,
            light_buffer,
            light_bind_group,
            draw_layout,
            draw_buffer,
            draw_bind_group,
            draw_capacity: Self::INITIAL_DRAWS,
            stride,
            material_layout,
            material_bind_group,
            fallback_sampler,
            meshes: HashMap::new(),
        }
    }

    /// Samples `diffuse` and `specular` in every following draw.
    pub fn set_material_maps(&mut self, device: &wgpu::Device, diffuse: &Texture, specular: &Texture) {
        self.material_bind_group = mk_material_bind_group(
            device,
            &self.material_layout,
            &self.fallback_sampler,
            diffuse,
            specular,
        );
    }

    /// Number of meshes with a live vertex buffer.
    pub fn cached_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Uploads everything `frame` needs. Call once per frame before [`render`](Self::render).
    pub fn prepare(&mut self, ctx: &Context, frame: &FrameRecorder) {
        ctx.queue.write_buffer(
            &self.light_buffer,
            0,
            bytemuck::cast_slice(&[ctx.lighting.to_raw()]),
        );

        // Meshes only the cache still references are gone from the scene
        self.meshes.retain(|_, gpu| Rc::strong_count(&gpu.mesh) > 1);
        for call in frame.draw_calls() {
            if let Entry::Vacant(slot) = self.meshes.entry(Rc::as_ptr(&call.mesh)) {
                log::debug!("uploading mesh {:?} ({} vertices)", call.mesh.name, call.vertex_count);
                let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Vertex Buffer", call.mesh.name)),
                    contents: bytemuck::cast_slice(&call.mesh.vertices()),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                slot.insert(GpuMesh {
                    mesh: Rc::clone(&call.mesh),
                    vertex_buffer,
                });
            }
        }

        let count = frame.draw_count();
        if count > self.draw_capacity {
            let capacity = count.next_power_of_two();
            log::debug!("growing draw uniform buffer to {} slots", capacity);
            let (buffer, bind_group) = mk_draw_buffer(&ctx.device, &self.draw_layout, self.stride, capacity);
            self.draw_buffer = buffer;
            self.draw_bind_group = bind_group;
            self.draw_capacity = capacity;
        }

        let stride = self.stride as usize;
        let mut bytes = vec![0u8; count * stride];
        let slots = frame.views().iter().flat_map(|view| {
            view.draws
                .iter()
                .map(move |call| DrawUniform::new(call, view.camera.view_proj, view.camera.view_position))
        });
        for (slot, uniform) in bytes.chunks_exact_mut(stride).zip(slots) {
            slot[..mem::size_of::<DrawUniform>()].copy_from_slice(bytemuck::bytes_of(&uniform));
        }
        if !bytes.is_empty() {
            ctx.queue.write_buffer(&self.draw_buffer, 0, &bytes);
        }
    }

    /// Replays `frame` into `pass`. `surface_size` is used for views without a viewport.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>, frame: &FrameRecorder, surface_size: [u32; 2]) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.light_bind_group, &[]);
        pass.set_bind_group(2, &self.material_bind_group, &[]);

        let mut slot = 0u64;
        for view in frame.views() {
            set_view_viewport(pass, view.viewport, surface_size);
            for call in &view.draws {
                let offset = (slot * self.stride) as wgpu::DynamicOffset;
                slot += 1;
                let Some(gpu) = self.meshes.get(&Rc::as_ptr(&call.mesh)) else {
                    log::warn!("mesh {:?} was drawn without being prepared", call.mesh.name);
                    continue;
                };
                pass.set_bind_group(1, &self.draw_bind_group, &[offset]);
                pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
                pass.draw(0..call.vertex_count, 0..1);
            }
        }
    }
}

fn mk_draw_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Draw Uniform Buffer"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: NonZeroU64::new(mem::size_of::<DrawUniform>() as u64),
            }),
        }],
        label: Some("draw_bind_group"),
    });
    (buffer, bind_group)
}

fn mk_material_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    fallback_sampler: &wgpu::Sampler,
    diffuse: &Texture,
    specular: &Texture,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&diffuse.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(
                    diffuse.sampler.as_ref().unwrap_or(fallback_sampler),
                ),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&specular.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(
                    specular.sampler.as_ref().unwrap_or(fallback_sampler),
                ),
            },
        ],
        label: Some("material_maps_bind_group"),
    })
}
