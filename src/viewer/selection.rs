//! Ownership of the single active renderable

use std::sync::Arc;

use cgmath::Vector3;
use log::debug;

use crate::gfx::geometry::{GeometryCatalog, ShapeKind};
use crate::gfx::resources::Material;
use crate::gfx::scene::{Renderable, RenderableId, Scene, Transform};

/// Swaps the active renderable, releasing the previous one first
#[derive(Debug)]
pub struct SelectionManager {
    active: Option<RenderableId>,
    next_id: u64,
    spawn_point: Vector3<f32>,
}

impl SelectionManager {
    pub fn new(spawn_point: [f32; 3]) -> Self {
        Self {
            active: None,
            next_id: 1,
            spawn_point: spawn_point.into(),
        }
    }

    pub fn active(&self) -> Option<RenderableId> {
        self.active
    }

    pub fn spawn_point(&self) -> Vector3<f32> {
        self.spawn_point
    }

    /// Replaces the active renderable with a fresh `kind` at the spawn point
    ///
    /// The previous renderable is disposed and removed from `scene` before the
    /// replacement is created. The new one gets its own copy of
    /// `default_material`.
    pub fn select_shape(
        &mut self,
        kind: ShapeKind,
        scene: &mut Scene,
        catalog: &GeometryCatalog,
        default_material: &Material,
    ) -> RenderableId {
        if let Some(previous) = self.active.take() {
            if let Some(mut retired) = scene.remove(previous) {
                retired.dispose();
                debug!("retired {} {}", retired.shape(), previous);
            }
        }

        let id = RenderableId(self.next_id);
        self.next_id += 1;

        let mut renderable = Renderable::new(id, kind, Arc::clone(catalog.get(kind)), default_material.clone());
        renderable.transform = Transform::at(self.spawn_point);
        scene.add(renderable);

        self.active = Some(id);
        id
    }
}
