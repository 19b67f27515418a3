//! Global uniform bindings for camera and lighting
//!
//! Everything shared by all draws in a frame lives in one uniform buffer bound
//! at group 0: the camera matrices plus the ambient and directional lights.

use crate::{
    gfx::{
        camera::camera_utils::CameraUniform,
        scene::lights::{AmbientLight, DirectionalLight},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// MUST match `Globals` in `standard.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    /// Ambient color premultiplied by intensity (w unused)
    ambient: [f32; 4],
    /// Unit vector pointing towards the directional light (w unused)
    light_direction: [f32; 4],
    /// Directional color premultiplied by intensity (w unused)
    light_color: [f32; 4],
}

impl GlobalUBOContent {
    pub fn new(camera: CameraUniform, ambient: &AmbientLight, light: &DirectionalLight) -> Self {
        let a = ambient.radiance();
        let c = light.radiance();
        let d = light.direction();
        Self {
            view_position: camera.eye,
            view_proj: camera.view_proj,
            ambient: [a[0], a[1], a[2], 0.0],
            light_direction: [d[0], d[1], d[2], 0.0],
            light_color: [c[0], c[1], c[2], 0.0],
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Writes this frame's camera and lights; unchanged frames skip the upload
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    ambient: &AmbientLight,
    light: &DirectionalLight,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, ambient, light));
}

/// Bind group layout and bind group for the global uniforms (group 0)
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform_buffer())
            .create(device, "Globals Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
