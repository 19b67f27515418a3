//! Material system for PBR rendering
//!
//! One [`Material`] per renderable, mirroring a standard metal/rough material:
//! base color, metalness, roughness, an optional color map and a wireframe flag.
//! GPU state is created lazily and rebuilt only when `needs_update` is set.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use wgpu::Device;

use super::texture_resource::{TextureImage, TextureResource};
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub metalness: f32,
    pub roughness: f32,
    pub use_texture: f32,
    _padding: f32,
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Layout shared by every material bind group: uniform, color map, sampler
pub fn create_material_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_fragment(binding_types::uniform_buffer())
        .next_binding_fragment(binding_types::color_texture())
        .next_binding_fragment(binding_types::filtering_sampler())
        .create(device, "Material Bind Group Layout")
}

/// A color map applied to a material
#[derive(Debug, Clone)]
pub struct TextureSlot {
    pub path: PathBuf,
    pub image: Arc<TextureImage>,
}

struct MaterialGpu {
    ubo: MaterialUBO,
    // Keeps the sampled texture alive for the bind group
    _texture: TextureResource,
    bind_group: wgpu::BindGroup,
}

pub struct Material {
    pub color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    pub wireframe: bool,
    texture: Option<TextureSlot>,
    needs_update: bool,
    texture_generation: u64,
    gpu: Option<MaterialGpu>,
}

impl Default for Material {
    fn default() -> Self {
        Self::new([1.0, 1.0, 1.0], 0.5, 0.5)
    }
}

/// Copies the parameters; the clone starts without GPU resources
impl Clone for Material {
    fn clone(&self) -> Self {
        Self {
            color: self.color,
            metalness: self.metalness,
            roughness: self.roughness,
            wireframe: self.wireframe,
            texture: self.texture.clone(),
            needs_update: true,
            texture_generation: self.texture_generation,
            gpu: None,
        }
    }
}

impl std::fmt::Debug for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Material")
            .field("color", &self.color)
            .field("metalness", &self.metalness)
            .field("roughness", &self.roughness)
            .field("wireframe", &self.wireframe)
            .field("texture", &self.texture_path())
            .field("needs_update", &self.needs_update)
            .field("texture_generation", &self.texture_generation)
            .finish()
    }
}

impl Material {
    pub fn new(color: [f32; 3], metalness: f32, roughness: f32) -> Self {
        Self {
            color,
            metalness: metalness.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            wireframe: false,
            texture: None,
            needs_update: true,
            texture_generation: 0,
            gpu: None,
        }
    }

    pub fn texture(&self) -> Option<&TextureSlot> {
        self.texture.as_ref()
    }

    pub fn texture_path(&self) -> Option<&Path> {
        self.texture.as_ref().map(|slot| slot.path.as_path())
    }

    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }

    /// Removes the color map and resets the base color to white
    pub fn clear_texture(&mut self) {
        self.texture = None;
        self.color = [1.0, 1.0, 1.0];
        self.needs_update = true;
    }

    /// Installs a color map and resets the base color to white
    pub fn set_texture(&mut self, slot: TextureSlot) {
        self.texture = Some(slot);
        self.color = [1.0, 1.0, 1.0];
        self.needs_update = true;
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    pub fn mark_needs_update(&mut self) {
        self.needs_update = true;
    }

    pub fn texture_generation(&self) -> u64 {
        self.texture_generation
    }

    /// Invalidates every texture request issued so far and returns the new generation
    pub fn next_texture_generation(&mut self) -> u64 {
        self.texture_generation += 1;
        self.texture_generation
    }

    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: [self.color[0], self.color[1], self.color[2], 1.0],
            metalness: self.metalness,
            roughness: self.roughness,
            use_texture: if self.texture.is_some() { 1.0 } else { 0.0 },
            _padding: 0.0,
        }
    }

    /// Syncs parameters to the GPU
    ///
    /// The uniform is written every call (unchanged contents are skipped by the
    /// buffer); texture and bind group are rebuilt only when `needs_update` is set.
    pub fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        if self.gpu.is_none() || self.needs_update {
            let mut ubo = MaterialUBO::new(device, "Material Uniform");
            ubo.update_content(queue, self.uniform());

            let texture = match &self.texture {
                Some(slot) => TextureResource::create_from_image(
                    device,
                    queue,
                    &slot.image,
                    &slot.path.to_string_lossy(),
                ),
                None => TextureResource::white(device, queue),
            };

            let bind_group = BindGroupBuilder::new(layout)
                .resource(ubo.binding_resource())
                .texture(&texture.view)
                .sampler(&texture.sampler)
                .create(device, "Material Bind Group");

            self.gpu = Some(MaterialGpu {
                ubo,
                _texture: texture,
                bind_group,
            });
            self.needs_update = false;
            return;
        }

        let uniform = self.uniform();
        if let Some(gpu) = &mut self.gpu {
            gpu.ubo.update_content(queue, uniform);
        }
    }

    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.gpu.is_some()
    }

    /// Drops the uniform buffer, texture and bind group
    pub fn release_gpu_resources(&mut self) {
        self.gpu = None;
    }
}
