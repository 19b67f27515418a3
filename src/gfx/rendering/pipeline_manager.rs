//! Render pipelines for the two mesh draw modes
//!
//! Solid and wireframe drawing share one shader, one pipeline layout and every
//! fixed-function setting except the primitive topology, so both are built from
//! a [`PipelineConfig`] that differs only in that field.

use std::collections::HashMap;

use wgpu::*;

use crate::gfx::resources::Material;
use crate::gfx::scene::vertex::Vertex3D;

/// How a renderable's indices are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawMode {
    /// Triangle list over the mesh indices
    Solid,
    /// Line list over the deduplicated edge indices
    Wireframe,
}

impl DrawMode {
    pub const ALL: [DrawMode; 2] = [DrawMode::Solid, DrawMode::Wireframe];

    pub fn for_material(material: &Material) -> Self {
        if material.wireframe {
            DrawMode::Wireframe
        } else {
            DrawMode::Solid
        }
    }

    pub fn topology(self) -> PrimitiveTopology {
        match self {
            DrawMode::Solid => PrimitiveTopology::TriangleList,
            DrawMode::Wireframe => PrimitiveTopology::LineList,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DrawMode::Solid => "Solid Pipeline",
            DrawMode::Wireframe => "Wireframe Pipeline",
        }
    }
}

/// Fixed-function state of a mesh pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub label: &'static str,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
    pub topology: PrimitiveTopology,
    pub cull_mode: Option<Face>,
    pub depth_format: Option<TextureFormat>,
    pub color_format: TextureFormat,
}

impl PipelineConfig {
    /// Defaults for `mode`: no culling, since open shapes are seen from both sides
    pub fn for_mode(mode: DrawMode, color_format: TextureFormat) -> Self {
        Self {
            label: mode.label(),
            vertex_entry: "vs_main",
            fragment_entry: "fs_main",
            topology: mode.topology(),
            cull_mode: None,
            depth_format: None,
            color_format,
        }
    }

    pub fn with_cull_mode(mut self, face: Option<Face>) -> Self {
        self.cull_mode = face;
        self
    }

    /// Enables depth testing against a buffer of `format`
    pub fn with_depth_format(mut self, format: TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    pub fn with_fragment_entry(mut self, entry: &'static str) -> Self {
        self.fragment_entry = entry;
        self
    }
}

/// Owns the mesh shader, its layout and one pipeline per [`DrawMode`]
pub struct PipelineManager {
    shader: ShaderModule,
    layout: PipelineLayout,
    pipelines: HashMap<DrawMode, RenderPipeline>,
}

impl PipelineManager {
    pub fn new(device: &Device, shader_source: &str, bind_group_layouts: &[&BindGroupLayout]) -> Self {
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: ShaderSource::Wgsl(shader_source.into()),
        });
        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        Self {
            shader,
            layout,
            pipelines: HashMap::new(),
        }
    }

    /// Creates (or replaces) the pipeline for `mode`
    pub fn build(&mut self, device: &Device, mode: DrawMode, config: &PipelineConfig) {
        let depth_stencil = config.depth_format.map(|format| DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: CompareFunction::Less,
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some(config.label),
            layout: Some(&self.layout),
            vertex: VertexState {
                module: &self.shader,
                entry_point: Some(config.vertex_entry),
                buffers: &[Vertex3D::desc()],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: &self.shader,
                entry_point: Some(config.fragment_entry),
                targets: &[Some(ColorTargetState {
                    format: config.color_format,
                    blend: Some(BlendState::REPLACE),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: config.topology,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: config.cull_mode,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        self.pipelines.insert(mode, pipeline);
    }

    pub fn pipeline(&self, mode: DrawMode) -> Option<&RenderPipeline> {
        self.pipelines.get(&mode)
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_mode_follows_wireframe_flag() {
        let mut material = Material::default();
        assert_eq!(DrawMode::for_material(&material), DrawMode::Solid);
        material.wireframe = true;
        assert_eq!(DrawMode::for_material(&material), DrawMode::Wireframe);
    }

    #[test]
    fn configs_differ_only_in_topology() {
        let solid = PipelineConfig::for_mode(DrawMode::Solid, TextureFormat::Bgra8Unorm)
            .with_depth_format(TextureFormat::Depth32Float);
        let wire = PipelineConfig::for_mode(DrawMode::Wireframe, TextureFormat::Bgra8Unorm)
            .with_depth_format(TextureFormat::Depth32Float);

        assert_eq!(solid.topology, PrimitiveTopology::TriangleList);
        assert_eq!(wire.topology, PrimitiveTopology::LineList);
        assert_eq!(solid.cull_mode, None);
        assert_eq!(
            PipelineConfig {
                label: solid.label,
                topology: solid.topology,
                ..wire.clone()
            },
            solid
        );
    }
}
