//! Error types for the shape studio
//!
//! Library code returns [`Result`]; the binary wraps these in `anyhow` with context.

use std::path::PathBuf;

/// Errors raised by the viewer and its rendering backend
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("unknown shape '{0}'")]
    UnknownShape(String),

    #[error("unknown texture '{0}'")]
    UnknownTexture(String),

    #[error("failed to load texture at {path}: {source}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("texture loader worker could not be started: {0}")]
    TextureWorker(#[source] std::io::Error),

    #[error("failed to create rendering surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible graphics adapter: {0}")]
    AdapterUnavailable(#[from] wgpu::RequestAdapterError),

    #[error("failed to request graphics device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ViewerError>;
