//! The skybox pass.
//!
//! Drawn after the scene in the same render pass, once per recorded view.
//! The vertex shader pins every vertex to the far plane and the depth test is
//! `LessEqual` without writes, so the sky fills only uncovered pixels.

use std::{mem, num::NonZeroU64};

use wgpu::util::DeviceExt;

use crate::{
    context::Context,
    data_structures::{cubemap::CubeFaces, texture::Texture},
    pipelines::set_view_viewport,
    render::FrameRecorder,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkyUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Unit cube around the origin, 12 triangles.
#[rustfmt::skip]
pub const CUBE_POSITIONS: [[f32; 3]; 36] = [
    [-1.0,  1.0, -1.0], [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0],

    [-1.0, -1.0,  1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], [-1.0, -1.0,  1.0],

    [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [ 1.0, -1.0, -1.0],

    [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [ 1.0, -1.0,  1.0], [-1.0, -1.0,  1.0],

    [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0],
    [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0],

    [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0],
];

pub struct SkyboxRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    cube_bind_group: wgpu::BindGroup,
    sky_layout: wgpu::BindGroupLayout,
    sky_buffer: wgpu::Buffer,
    sky_bind_group: wgpu::BindGroup,
    capacity: usize,
    stride: u64,
}

impl SkyboxRenderer {
    const INITIAL_VIEWS: usize = 4;

    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        faces: &CubeFaces,
    ) -> Self {
        let cube = Texture::cube(device, queue, faces, "skybox");

        let sky_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(mem::size_of::<SkyUniform>() as u64),
                },
                count: None,
            }],
            label: Some("sky_bind_group_layout"),
        });
        let cube_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("skybox_texture_bind_group_layout"),
        });
        let fallback_sampler;
        let sampler = match &cube.sampler {
            Some(sampler) => sampler,
            None => {
                fallback_sampler = device.create_sampler(&wgpu::SamplerDescriptor::default());
                &fallback_sampler
            }
        };
        let cube_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &cube_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&cube.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some("skybox_texture_bind_group"),
        });

        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let stride = (mem::size_of::<SkyUniform>() as u64).div_ceil(alignment) * alignment;
        let (sky_buffer, sky_bind_group) =
            mk_sky_buffer(device, &sky_layout, stride, Self::INITIAL_VIEWS);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Skybox Vertex Buffer"),
            contents: bytemuck::cast_slice(&CUBE_POSITIONS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Skybox Pipeline Layout"),
            bind_group_layouts: &[Some(&sky_layout), Some(&cube_layout)],
            immediate_size: 0,
        });
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Skybox Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("skybox.wgsl").into()),
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            cache: None,
            label: Some("Skybox Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Seen from inside
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Texture::DEPTH_FORMAT,
                depth_write_enabled: Some(false),
                depth_compare: Some(wgpu::CompareFunction::LessEqual),
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview_mask: None,
        });

        Self {
            pipeline,
            vertex_buffer,
            cube_bind_group,
            sky_layout,
            sky_buffer,
            sky_bind_group,
            capacity: Self::INITIAL_VIEWS,
            stride,
        }
    }

    /// Uploads one sky matrix per view of `frame`.
    pub fn prepare(&mut self, ctx: &Context, frame: &FrameRecorder) {
        let count = frame.views().len();
        if count > self.capacity {
            let capacity = count.next_power_of_two();
            let (buffer, bind_group) = mk_sky_buffer(&ctx.device, &self.sky_layout, self.stride, capacity);
            self.sky_buffer = buffer;
            self.sky_bind_group = bind_group;
            self.capacity = capacity;
        }

        let stride = self.stride as usize;
        let mut bytes = vec![0u8; count * stride];
        for (slot, view) in bytes.chunks_exact_mut(stride).zip(frame.views()) {
            let uniform = SkyUniform {
                view_proj: view.camera.sky_view_proj,
            };
            slot[..mem::size_of::<SkyUniform>()].copy_from_slice(bytemuck::bytes_of(&uniform));
        }
        if !bytes.is_empty() {
            ctx.queue.write_buffer(&self.sky_buffer, 0, &bytes);
        }
    }

    /// Draws the sky behind every view of `frame`. Call after the scene.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>, frame: &FrameRecorder, surface_size: [u32; 2]) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(1, &self.cube_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        for (slot, view) in frame.views().iter().enumerate() {
            set_view_viewport(pass, view.viewport, surface_size);
            let offset = (slot as u64 * self.stride) as wgpu::DynamicOffset;
            pass.set_bind_group(0, &self.sky_bind_group, &[offset]);
            pass.draw(0..CUBE_POSITIONS.len() as u32, 0..1);
        }
    }
}

fn mk_sky_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sky Uniform Buffer"),
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
                size: NonZeroU64::new(mem::size_of::<SkyUniform>() as u64),
            }),
        }],
        label: Some("sky_bind_group"),
    });
    (buffer, bind_group)
}
