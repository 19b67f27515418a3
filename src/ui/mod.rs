//! # User Interface
//!
//! The debug panel is a Dear ImGui window drawn over the scene.
//!
//! - [`UiManager`] - ImGui context, winit input and wgpu rendering
//! - [`schema`] - static field tables: label, range, step and widget kind
//! - [`panel`] - the binder that turns the schema into control groups over the
//!   active renderable
//!
//! Input captured by the UI never reaches the camera.

pub mod manager;
pub mod panel;
pub mod schema;

pub use manager::UiManager;
pub use panel::{ControlGroup, PanelAction, PanelBinder, PanelBinding, PanelEdit};
pub use schema::{FieldKind, FieldSpec, FieldTarget, FlagTarget, GroupKind, Trigger};
