//! Shape Studio
//!
//! A native 3D shape viewer built on wgpu and winit. Pick one of fifteen
//! procedural shapes, edit its transform and material from a Dear ImGui
//! panel, apply a texture, spin it or go fullscreen.
//!
//! ```no_run
//! use shape_studio::{gfx::geometry::ShapeKind, ShapeStudioApp, ViewerConfig};
//!
//! fn main() -> shape_studio::Result<()> {
//!     let config = ViewerConfig::default().with_startup_shape(ShapeKind::TorusKnot);
//!     ShapeStudioApp::new(config)?.run()
//! }
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod ui;
pub mod viewer;
pub mod wgpu_utils;

pub use app::ShapeStudioApp;
pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
pub use viewer::Viewer;
