use std::path::Path;

use anyhow::Context;

use crate::data_structures::texture::{self, ColorSpace, Owner};

/// Layout of the material bind group: diffuse texture and sampler at 0/1,
/// specular texture and sampler at 2/3.
pub fn diffuse_specular_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            multisampled: false,
            view_dimension: wgpu::TextureViewDimension::D2,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
        },
        count: None,
    };
    let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    };
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            texture_entry(0),
            sampler_entry(1),
            texture_entry(2),
            sampler_entry(3),
        ],
        label: Some("material_bind_group_layout"),
    })
}

pub fn material_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    diffuse: &texture::Texture,
    specular: &texture::Texture,
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
                resource: wgpu::BindingResource::Sampler(&diffuse.sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&specular.view),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(&specular.sampler),
            },
        ],
        label: Some(&format!("material {} + {}", diffuse.path, specular.path)),
    })
}

pub async fn load_string(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

pub async fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

/// Read and decode an image file without touching the GPU.
pub async fn load_image(path: &Path) -> anyhow::Result<image::DynamicImage> {
    let data = load_binary(path).await?;
    let format = path.extension().and_then(image::ImageFormat::from_extension);
    let img = match format {
        Some(format) => image::load_from_memory_with_format(&data, format),
        None => image::load_from_memory(&data),
    }
    .with_context(|| format!("decoding {}", path.display()))?;
    Ok(img)
}

pub async fn load_texture(
    path: &Path,
    color_space: ColorSpace,
    owner: Owner,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<texture::Texture> {
    let img = load_image(path).await?;
    let label = path.display().to_string();
    log::debug!(
        "loaded {} ({}x{}, {:?})",
        label,
        img.width(),
        img.height(),
        img.color()
    );
    Ok(texture::Texture::from_image(
        device,
        queue,
        &img,
        &label,
        color_space,
        owner,
    ))
}
