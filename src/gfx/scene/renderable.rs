//! Renderables: one catalog shape with its own transform and material
//!
//! Geometry is shared with the catalog through an `Arc`; everything else,
//! including GPU buffers, is owned by the renderable and released in
//! [`Renderable::dispose`].

use std::fmt;
use std::sync::Arc;

use cgmath::{Matrix, Matrix4, Rad, SquareMatrix, Vector3};
use log::debug;
use wgpu::util::DeviceExt;

use crate::gfx::geometry::{GeometryData, ShapeKind};
use crate::gfx::resources::{Material, SceneLayouts};
use crate::wgpu_utils::{BindGroupBuilder, UniformBuffer};

/// Identity of a renderable; never reused within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderableId(pub u64);

impl fmt::Display for RenderableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position, Euler rotation (radians, XYZ order) and per-axis scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn at(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Model matrix `T * Rx * Ry * Rz * S`
    pub fn matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.position);
        let r = Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z));
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s
    }
}

/// MUST match `ObjectTransform` in `standard.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn from_transform(transform: &Transform) -> Self {
        let model = transform.matrix();
        // Degenerate (zero) scale has no inverse; fall back to the model matrix
        let normal = model.invert().map(|inv| inv.transpose()).unwrap_or(model);
        Self {
            model: model.into(),
            normal: normal.into(),
        }
    }
}

pub struct RenderableGpu {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    edge_buffer: wgpu::Buffer,
    index_count: u32,
    edge_count: u32,
    transform_ubo: UniformBuffer<TransformUniform>,
    transform_bind_group: wgpu::BindGroup,
}

pub struct Renderable {
    id: RenderableId,
    shape: ShapeKind,
    geometry: Arc<GeometryData>,
    pub transform: Transform,
    pub material: Material,
    gpu: Option<RenderableGpu>,
}

impl fmt::Debug for Renderable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderable")
            .field("id", &self.id)
            .field("shape", &self.shape)
            .field("transform", &self.transform)
            .field("material", &self.material)
            .field("gpu", &self.gpu.is_some())
            .finish()
    }
}

impl Renderable {
    pub fn new(
        id: RenderableId,
        shape: ShapeKind,
        geometry: Arc<GeometryData>,
        material: Material,
    ) -> Self {
        Self {
            id,
            shape,
            geometry,
            transform: Transform::default(),
            material,
            gpu: None,
        }
    }

    pub fn id(&self) -> RenderableId {
        self.id
    }

    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub fn geometry(&self) -> &Arc<GeometryData> {
        &self.geometry
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.gpu.is_some() || self.material.has_gpu_resources()
    }

    /// Creates GPU buffers on first use, then syncs transform and material
    pub fn prepare_gpu(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, layouts: &SceneLayouts) {
        if self.gpu.is_none() {
            self.gpu = Some(self.create_gpu(device, layouts));
        }

        if let Some(gpu) = &mut self.gpu {
            gpu.transform_ubo
                .update_content(queue, TransformUniform::from_transform(&self.transform));
        }

        self.material
            .update_gpu_resources(device, queue, &layouts.material);
    }

    fn create_gpu(&self, device: &wgpu::Device, layouts: &SceneLayouts) -> RenderableGpu {
        let label = self.shape.name();
        let vertices = self.geometry.to_vertices();
        let edges = self.geometry.edge_indices();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&self.geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let edge_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Edge Buffer")),
            contents: bytemuck::cast_slice(&edges),
            usage: wgpu::BufferUsages::INDEX,
        });

        let transform_ubo =
            UniformBuffer::<TransformUniform>::new(device, &format!("{label} Transform Uniform"));
        let transform_bind_group = BindGroupBuilder::new(&layouts.transform)
            .resource(transform_ubo.binding_resource())
            .create(device, &format!("{label} Transform Bind Group"));

        debug!(
            "uploaded {} {}: {} vertices, {} triangles",
            label,
            self.id,
            vertices.len(),
            self.geometry.triangle_count()
        );

        RenderableGpu {
            vertex_buffer,
            index_buffer,
            edge_buffer,
            index_count: self.geometry.indices.len() as u32,
            edge_count: edges.len() as u32,
            transform_ubo,
            transform_bind_group,
        }
    }

    /// Releases every GPU resource owned by this renderable
    ///
    /// The shared catalog geometry is untouched.
    pub fn dispose(&mut self) {
        if !self.has_gpu_resources() {
            return;
        }
        if let Some(gpu) = self.gpu.take() {
            gpu.vertex_buffer.destroy();
            gpu.index_buffer.destroy();
            gpu.edge_buffer.destroy();
        }
        self.material.release_gpu_resources();
        debug!("released GPU resources of {} {}", self.shape, self.id);
    }
}

/// Records the draw of one prepared renderable
///
/// The caller binds the pipeline and group 0; solid and wireframe pipelines
/// differ only in topology, so the index source is picked from the material.
pub trait DrawRenderable {
    fn draw_renderable(&mut self, renderable: &Renderable);
}

impl DrawRenderable for wgpu::RenderPass<'_> {
    fn draw_renderable(&mut self, renderable: &Renderable) {
        let Some(gpu) = renderable.gpu.as_ref() else {
            return; // Skip drawing if not uploaded
        };
        let Some(material_bind_group) = renderable.material.bind_group() else {
            return;
        };

        self.set_bind_group(1, &gpu.transform_bind_group, &[]);
        self.set_bind_group(2, material_bind_group, &[]);
        self.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));

        if renderable.material.wireframe {
            self.set_index_buffer(gpu.edge_buffer.slice(..), wgpu::IndexFormat::Uint32);
            self.draw_indexed(0..gpu.edge_count, 0, 0..1);
        } else {
            self.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            self.draw_indexed(0..gpu.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector4};
    use std::f32::consts::FRAC_PI_2;

    fn renderable() -> Renderable {
        let geometry = Arc::new(ShapeKind::Box.build());
        Renderable::new(RenderableId(7), ShapeKind::Box, geometry, Material::default())
    }

    #[test]
    fn matrix_applies_scale_rotation_then_translation() {
        let transform = Transform {
            position: Vector3::new(0.0, 1.0, 0.0),
            rotation: Vector3::new(0.0, FRAC_PI_2, 0.0),
            scale: Vector3::new(2.0, 1.0, 1.0),
        };
        let p = transform.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        // +X scaled to 2, turned to -Z, lifted by 1
        assert!((p.truncate() - Vector3::new(0.0, 1.0, -2.0)).magnitude() < 1e-5);
    }

    #[test]
    fn zero_scale_still_produces_a_uniform() {
        let transform = Transform {
            scale: Vector3::new(0.0, 0.0, 0.0),
            ..Default::default()
        };
        let uniform = TransformUniform::from_transform(&transform);
        assert_eq!(uniform.model, uniform.normal);
    }

    #[test]
    fn new_renderable_has_no_gpu_state() {
        let mut r = renderable();
        assert_eq!(r.id().to_string(), "#7");
        assert!(!r.has_gpu_resources());
        r.dispose();
        assert!(!r.has_gpu_resources());
        assert_eq!(r.transform, Transform::default());
    }
}
