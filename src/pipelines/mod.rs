//! Render pipelines.
//!
//! - `light`: typed light/material parameters and their uniform layout
//! - `phong`: the lit triangle-list pipeline every scene node is drawn with
//! - `skybox`: the cube-mapped background drawn after the scene

use crate::viewport::Viewport;

pub mod light;
pub mod phong;
pub mod skybox;

/// Restricts drawing to `viewport`, or to the whole surface when `None`.
pub fn set_view_viewport(pass: &mut wgpu::RenderPass<'_>, viewport: Option<Viewport>, surface_size: [u32; 2]) {
    match viewport {
        Some(vp) => pass.set_viewport(vp.x, vp.y, vp.width, vp.height, 0.0, 1.0),
        None => pass.set_viewport(
            0.0,
            0.0,
            surface_size[0] as f32,
            surface_size[1] as f32,
            0.0,
            1.0,
        ),
    }
}

/// Builds a triangle-list pipeline with back-face culling and a `Less` depth test.
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_format: Option<wgpu::TextureFormat>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let label = shader.label;
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label,
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: Some(true),
            depth_compare: Some(wgpu::CompareFunction::Less),
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
    })
}
