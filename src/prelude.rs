//! # Prelude
//!
//! The types most code touching the studio needs:
//!
//! ```rust
//! use shape_studio::prelude::*;
//!
//! let mut viewer = Viewer::new(&ViewerConfig::default());
//! let id = viewer.select_shape(ShapeKind::Capsule);
//! assert_eq!(viewer.active_id(), Some(id));
//! ```

pub use crate::app::ShapeStudioApp;
pub use crate::config::ViewerConfig;
pub use crate::error::{Result, ViewerError};
pub use crate::gfx::geometry::{GeometryCatalog, GeometryData, ShapeKind};
pub use crate::gfx::resources::Material;
pub use crate::gfx::scene::{Renderable, RenderableId, Scene, Transform};
pub use crate::ui::{PanelAction, PanelBinder};
pub use crate::viewer::{TextureSource, Viewer};
