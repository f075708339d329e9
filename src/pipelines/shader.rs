//! Shader sources and checked GPU object creation.
//!
//! Every shader ships embedded in the library. An application can replace one
//! by placing `<assets>/shaders/<name>.wgsl` next to its assets; that file is
//! read instead. Compilation problems are logged and the affected pipeline is
//! left out of the draw; they never stop the renderer.

use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use crate::error::RendererError;

/// WGSL text and where it came from.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub name: &'static str,
    pub text: Cow<'static, str>,
    /// `None` for the embedded copy.
    pub path: Option<PathBuf>,
}

impl ShaderSource {
    pub fn embedded(name: &'static str, text: &'static str) -> Self {
        Self {
            name,
            text: Cow::Borrowed(text),
            path: None,
        }
    }

    pub fn describe(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => format!("{} (embedded)", self.name),
        }
    }

    /// Look for an override of `name` under `assets`, falling back to `embedded`.
    pub async fn load(
        assets: &Path,
        name: &'static str,
        embedded: &'static str,
    ) -> Result<Self, RendererError> {
        let path = assets.join("shaders").join(format!("{name}.wgsl"));
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                log::info!("using shader override {}", path.display());
                Ok(Self {
                    name,
                    text: Cow::Owned(text),
                    path: Some(path),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::embedded(name, embedded)),
            Err(source) => Err(RendererError::Shader { path, source }),
        }
    }

    pub fn module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(self.name),
            source: wgpu::ShaderSource::Wgsl(self.text.clone()),
        })
    }
}

/// Run `create` inside a validation error scope and log whatever it raised.
///
/// Returns the created object together with whether it validated.
pub async fn checked<T>(device: &wgpu::Device, what: &str, create: impl FnOnce() -> T) -> (T, bool) {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match scope.pop().await {
        Some(error) => {
            log::error!("{what} failed validation:\n{error}");
            (value, false)
        }
        None => (value, true),
    }
}
