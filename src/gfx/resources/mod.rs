//! GPU resource management
//!
//! Handles textures, materials and the global bind group.

pub mod global_bindings;
pub mod layouts;
pub mod material;
pub mod texture_resource;

pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO};
pub use layouts::SceneLayouts;
pub use material::{Material, TextureSlot};
pub use texture_resource::{DepthBuffer, TextureImage, TextureResource};
