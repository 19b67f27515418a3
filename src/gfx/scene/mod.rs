//! # Scene Management Module
//!
//! The world the studio renders: a [`Scene`] holding [`Renderable`]s, the
//! lights, the background color and the orbit camera.
//!
//! - [`Scene`] - container for renderables, lights and camera
//! - [`Renderable`] - a catalog shape with its own transform, material and GPU buffers
//! - [`Vertex3D`] - GPU vertex format with position, normal and texture coordinates

pub mod lights;
pub mod renderable;
pub mod scene;
pub mod vertex;

pub use lights::{AmbientLight, DirectionalLight};
pub use renderable::{DrawRenderable, Renderable, RenderableId, Transform};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;
