//! Bind group layouts shared between the pipelines and per-object resources

use super::material::create_material_layout;
use crate::wgpu_utils::{
    binding_builder::{BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
};

/// Group 1 (per-object transform) and group 2 (material) layouts
pub struct SceneLayouts {
    pub transform: BindGroupLayoutWithDesc,
    pub material: BindGroupLayoutWithDesc,
}

impl SceneLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let transform = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform_buffer())
            .create(device, "Transform Bind Group Layout");

        Self {
            transform,
            material: create_material_layout(device),
        }
    }
}
