use std::path::PathBuf;

use thiserror::Error;

/// Failures of renderer construction and explicit resource loads.
///
/// Shader compilation problems are not part of this type: they are logged
/// and the failing pipeline is skipped at draw.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("a renderer is already live in this process")]
    AlreadyInitialized,
    #[error("cannot start the IO runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("cannot create the event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("cannot create the window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("the windowing system never delivered a window")]
    WindowNeverCreated,
    #[error("cannot create the surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("cannot open the graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("cannot read shader {path}: {source}")]
    Shader {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot load {path}: {cause:#}")]
    Asset { path: PathBuf, cause: anyhow::Error },
    #[error("unsupported model format: {0}")]
    UnknownModelFormat(PathBuf),
    #[error("{0} is not owned by the application")]
    NotOwned(String),
}

impl RendererError {
    pub(crate) fn asset(path: impl Into<PathBuf>, cause: anyhow::Error) -> Self {
        Self::Asset {
            path: path.into(),
            cause,
        }
    }
}
