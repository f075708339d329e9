//! The GPU context and the process-wide single-instance guard.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use winit::window::Window;

use crate::{data_structures::texture, error::RendererError};

static LIVE: AtomicBool = AtomicBool::new(false);

/// Proof that this is the only live renderer in the process.
///
/// Acquired first during construction and released on drop, so a failed
/// construction frees the slot again.
#[derive(Debug)]
pub struct InstanceGuard {
    _private: (),
}

impl InstanceGuard {
    pub fn acquire() -> Result<Self, RendererError> {
        LIVE.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self { _private: () })
            .map_err(|_| RendererError::AlreadyInitialized)
    }

    pub fn is_live() -> bool {
        LIVE.load(Ordering::Acquire)
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        LIVE.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
}

impl Context {
    pub async fn new(
        window: Arc<Window>,
        present_mode: wgpu::PresentMode,
    ) -> Result<Self, RendererError> {
        let size = window.inner_size();

        log::info!("wgpu setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("scppr device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Shaders write linear colour, so prefer an sRGB surface.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);
        let present_mode = if surface_caps.present_modes.contains(&present_mode) {
            present_mode
        } else {
            log::warn!("{:?} is not supported here, using Fifo", present_mode);
            wgpu::PresentMode::Fifo
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let (depth_texture, depth_view) = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        log::info!(
            "surface {}x{} {:?} {:?}",
            config.width,
            config.height,
            config.format,
            config.present_mode
        );

        Ok(Self {
            window,
            depth_texture,
            depth_view,
            surface,
            device,
            queue,
            config,
        })
    }

    /// Reconfigure the surface and depth buffer. Zero sizes (minimised
    /// windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            (self.depth_texture, self.depth_view) = texture::Texture::create_depth_texture(
                &self.device,
                [width, height],
                "depth_texture",
            );
            log::debug!("resized to {}x{}", width, height);
        }
    }

    /// Reconfigure with the current window size, e.g. after a lost surface.
    pub fn reconfigure(&mut self) {
        let size = self.window.inner_size();
        self.resize(size.width, size.height);
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_guard_at_a_time() {
        let first = InstanceGuard::acquire().unwrap();
        assert!(InstanceGuard::is_live());
        assert!(matches!(
            InstanceGuard::acquire(),
            Err(RendererError::AlreadyInitialized)
        ));
        drop(first);
        assert!(!InstanceGuard::is_live());
        let again = InstanceGuard::acquire();
        assert!(again.is_ok());
    }
}
