//! # Graphics Module
//!
//! Everything between the viewer state and the GPU.
//!
//! - **Camera** ([`camera`]) - orbit camera with optional damping
//! - **Geometry** ([`geometry`]) - procedural shape generation and the shape catalog
//! - **Rendering** ([`rendering`]) - surface, pipelines and frame recording
//! - **Resources** ([`resources`]) - materials, textures and bind groups
//! - **Scene** ([`scene`]) - renderables, lights and the world container
//!
//! The render engine needs a window; everything else can be driven headless,
//! which is how the tests exercise it.

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::orbit_camera::OrbitCamera;
pub use rendering::render_engine::RenderEngine;
