//! GPU textures.
//!
//! [`Texture`] wraps a wgpu texture with its view and sampler plus the
//! bookkeeping the renderer needs: where it came from and who owns it.
//! Every colour texture is uploaded as RGBA8 regardless of the source format.

use image::GenericImageView;

use crate::{
    data_structures::store::{ModelId, Store, TextureId},
    error::RendererError,
};

/// How the texels of an image are interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    /// Colour data (diffuse maps). Sampled with sRGB decoding.
    Srgb,
    /// Non-colour data (specular maps).
    Linear,
}

impl ColorSpace {
    pub fn format(self) -> wgpu::TextureFormat {
        match self {
            ColorSpace::Srgb => wgpu::TextureFormat::Rgba8UnormSrgb,
            ColorSpace::Linear => wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

/// Who is responsible for destroying a texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    /// Default resources, released with the renderer.
    Renderer,
    /// Imported with a model, released with it.
    Model(ModelId),
    /// Loaded explicitly by the application.
    User,
}

/// Anything that records who is responsible for destroying it.
pub trait Owned {
    fn owner(&self) -> Owner;
    /// Name used in diagnostics.
    fn label(&self) -> &str;
}

/// Remove `id` if the application owns it. `Ok(None)` if it does not exist.
pub fn remove_user_owned<T: Owned>(
    textures: &mut Store<TextureId, T>,
    id: TextureId,
) -> Result<Option<T>, RendererError> {
    match textures.get(id) {
        None => Ok(None),
        Some(texture) if texture.owner() != Owner::User => {
            Err(RendererError::NotOwned(texture.label().to_string()))
        }
        Some(_) => Ok(textures.remove(id)),
    }
}

/// Remove every texture imported with `model` and return their ids.
pub fn remove_model_owned<T: Owned>(textures: &mut Store<TextureId, T>, model: ModelId) -> Vec<TextureId> {
    textures.drain_where(|t| t.owner() == Owner::Model(model))
}

#[derive(Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    /// Source path or label, diagnostic only.
    pub path: String,
    pub format: wgpu::TextureFormat,
    pub owner: Owner,
}

impl Owned for Texture {
    fn owner(&self) -> Owner {
        self.owner
    }

    fn label(&self) -> &str {
        &self.path
    }
}

impl Texture {
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create the depth attachment for a surface of the given size.
    pub fn create_depth_texture(
        device: &wgpu::Device,
        size: [u32; 2],
        label: &str,
    ) -> (wgpu::Texture, wgpu::TextureView) {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// A 1x1 texture of a single colour, used for the default material.
    pub fn create_solid(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: [u8; 4],
        label: &str,
        color_space: ColorSpace,
        owner: Owner,
    ) -> Texture {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            1,
            1,
            image::Rgba(rgba),
        ));
        Self::from_image(device, queue, &img, label, color_space, owner)
    }

    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: &str,
        color_space: ColorSpace,
        owner: Owner,
    ) -> Self {
        let dimensions = img.dimensions();
        let rgba = img.to_rgba8();

        let size = wgpu::Extent3d {
            width: dimensions.0.max(1),
            height: dimensions.1.max(1),
            depth_or_array_layers: 1,
        };
        let format = color_space.format();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * dimensions.0),
                rows_per_image: Some(dimensions.1),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = create_default_sampler(device);

        Self {
            texture,
            view,
            sampler,
            path: label.to_string(),
            format,
            owner,
        }
    }
}

pub fn create_default_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Linear,
        ..Default::default()
    })
}
