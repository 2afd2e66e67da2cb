use std::path::Path;

use image::DynamicImage;

use crate::{
    data_structures::{
        cubemap::{CubeFaces, FACE_COUNT},
        texture::Texture,
    },
    error::{Error, Result},
    resources::load_binary,
};

/// Decodes an image file (PNG, JPEG or BMP).
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    let failed = |reason: String| Error::ImageLoadFailed {
        path: path.display().to_string(),
        reason,
    };
    let bytes = load_binary(path).map_err(|e| failed(format!("{e:#}")))?;
    image::load_from_memory(&bytes).map_err(|e| failed(e.to_string()))
}

/// Reads the six faces of a skybox from `dir`, given in `+X, -X, +Y, -Y, +Z, -Z` order.
pub fn load_cubemap(dir: impl AsRef<Path>, face_names: &[String; FACE_COUNT]) -> Result<CubeFaces> {
    let dir = dir.as_ref();
    let faces = face_names
        .iter()
        .map(|name| load_image(dir.join(name)).map(DynamicImage::into_rgba8))
        .collect::<Result<Vec<_>>>()?;
    let cube = CubeFaces::new(faces)?;
    log::info!("loaded skybox {} ({}px faces)", dir.display(), cube.size());
    Ok(cube)
}

/// Loads an image file straight into a GPU texture.
pub fn load_texture(
    path: impl AsRef<Path>,
    linear: bool,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> Result<Texture> {
    let path = path.as_ref();
    let image = load_image(path)?;
    let label = path.display().to_string();
    Ok(Texture::from_image(device, queue, &image, Some(&label), linear))
}

/// Layout of the material maps: diffuse texture and sampler, then specular
/// texture and sampler.
pub fn diffuse_specular_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let map = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    };
    let sampler = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    };
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[map(0), sampler(1), map(2), sampler(3)],
        label: Some("material_maps_bind_group_layout"),
    })
}
