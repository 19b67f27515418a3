//! WGPU-based rendering engine
//!
//! Owns the surface, device and pipelines. Each frame clears to the scene
//! background, draws every renderable with the solid or wireframe pipeline,
//! then hands the encoder to an optional UI overlay callback.

use std::sync::Arc;

use log::{info, warn};
use wgpu::{Device, TextureFormat};

use crate::error::{Result, ViewerError};
use crate::gfx::{
    resources::{
        global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
        layouts::SceneLayouts,
        texture_resource::DepthBuffer,
    },
    scene::{renderable::DrawRenderable, scene::Scene},
};

use super::pipeline_manager::{DrawMode, PipelineConfig, PipelineManager};

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_buffer: DepthBuffer,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    layouts: SceneLayouts,
}

impl RenderEngine {
    /// Creates a render engine drawing into `window`
    ///
    /// Picks an adapter compatible with the surface, configures the surface
    /// with a linear color format and builds both mesh pipelines.
    ///
    /// # Arguments
    /// * `window` - Surface target, usually an `Arc<Window>`
    /// * `width` - Initial surface width in physical pixels
    /// * `height` - Initial surface height in physical pixels
    /// * `vsync` - Whether presentation waits for vertical blank
    ///
    /// # Errors
    /// Fails if no surface, adapter or device can be obtained.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let adapter_info = adapter.get_info();
        info!(
            "using adapter '{}' ({:?})",
            adapter_info.name, adapter_info.backend
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = linear_format(&surface_capabilities.formats);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_buffer = DepthBuffer::new(&device, &config);

        let global_ubo = GlobalUBO::new(&device, "Global Uniform");
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let layouts = SceneLayouts::new(&device);

        let mut pipeline_manager = PipelineManager::new(
            &device,
            include_str!("standard.wgsl"),
            &[
                global_bindings.bind_group_layout(),
                &layouts.transform.layout,
                &layouts.material.layout,
            ],
        );
        for mode in DrawMode::ALL {
            let config = PipelineConfig::for_mode(mode, format)
                .with_depth_format(DepthBuffer::FORMAT);
            pipeline_manager.build(&device, mode, &config);
        }

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_buffer,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            layouts,
        })
    }

    /// Creates or refreshes GPU resources of every renderable
    pub fn prepare_scene(&self, scene: &mut Scene) {
        for renderable in scene.objects_mut() {
            renderable.prepare_gpu(&self.device, &self.queue, &self.layouts);
        }
    }

    /// Uploads camera and light uniforms for this frame
    pub fn update(&mut self, scene: &Scene) {
        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            scene.camera_manager.camera.uniform,
            &scene.ambient_light,
            &scene.directional_light,
        );
    }

    /// Renders one frame
    ///
    /// # Arguments
    /// * `scene` - Renderables, background and lights to draw
    /// * `ui_callback` - Overlay pass recorded into the same encoder after the scene
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    ///
    /// # Errors
    /// Only [`wgpu::SurfaceError::OutOfMemory`] is reported.
    pub fn render_frame<F>(&mut self, scene: &Scene, ui_callback: Option<F>) -> Result<()>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::OutOfMemory) => {
                return Err(ViewerError::Surface(wgpu::SurfaceError::OutOfMemory))
            }
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                warn!("surface {e}; reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => {
                warn!("skipping frame: {e}");
                return Ok(());
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.draw_scene(&mut encoder, &surface_texture_view, scene);

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn draw_scene(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView, scene: &Scene) {
        let [r, g, b] = scene.background;
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Main Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: r as f64,
                        g: g as f64,
                        b: b as f64,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_buffer.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

        for renderable in scene.objects() {
            let mode = DrawMode::for_material(&renderable.material);
            let Some(pipeline) = self.pipeline_manager.pipeline(mode) else {
                continue;
            };
            render_pass.set_pipeline(pipeline);
            render_pass.draw_renderable(renderable);
        }
    }

    /// Reconfigures the surface and depth buffer
    ///
    /// # Arguments
    /// * `width` - New width in physical pixels
    /// * `height` - New height in physical pixels
    ///
    /// Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.depth_buffer = DepthBuffer::new(&self.device, &self.config);
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

/// First non-sRGB format; the shader does its own gamma
fn linear_format(formats: &[TextureFormat]) -> TextureFormat {
    formats
        .iter()
        .copied()
        .find(|format| !format.is_srgb())
        .or_else(|| formats.first().copied())
        .unwrap_or(TextureFormat::Bgra8Unorm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_a_linear_surface_format() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(linear_format(&formats), TextureFormat::Bgra8Unorm);
        assert_eq!(
            linear_format(&[TextureFormat::Rgba8UnormSrgb]),
            TextureFormat::Rgba8UnormSrgb
        );
        assert_eq!(linear_format(&[]), TextureFormat::Bgra8Unorm);
    }
}
