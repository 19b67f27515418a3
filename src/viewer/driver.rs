//! Per-frame effects applied before drawing

use crate::gfx::scene::{RenderableId, Scene};

/// Auto-rotation about the Y axis
///
/// The angle grows by a fixed increment per frame, so the rotation speed
/// follows the frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderDriver {
    spinning: bool,
    increment: f32,
}

impl RenderDriver {
    pub fn new(increment: f32) -> Self {
        Self {
            spinning: false,
            increment,
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    pub fn increment(&self) -> f32 {
        self.increment
    }

    pub fn toggle_spin(&mut self) -> bool {
        self.spinning = !self.spinning;
        self.spinning
    }

    /// Advances the spin of the active renderable; returns true if it moved
    pub fn step(&self, scene: &mut Scene, active: Option<RenderableId>) -> bool {
        if !self.spinning {
            return false;
        }
        match active.and_then(|id| scene.get_mut(id)) {
            Some(renderable) => {
                renderable.transform.rotation.y += self.increment;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cgmath::Vector3;

    use super::*;
    use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
    use crate::gfx::geometry::{GeometryCatalog, ShapeKind};
    use crate::gfx::resources::Material;
    use crate::gfx::scene::Renderable;

    fn scene_with_box() -> Scene {
        let camera = OrbitCamera::looking_at(Vector3::new(5.0, 5.0, 5.0), Vector3::new(0.0, 0.0, 0.0), 1.0);
        let mut scene = Scene::new(CameraManager::new(camera, CameraController::new(0.005, 0.1)));
        scene.add(Renderable::new(
            RenderableId(1),
            ShapeKind::Box,
            Arc::clone(GeometryCatalog::new().get(ShapeKind::Box)),
            Material::default(),
        ));
        scene
    }

    #[test]
    fn double_toggle_restores_state() {
        let mut driver = RenderDriver::new(0.01);
        assert!(driver.toggle_spin());
        assert!(!driver.toggle_spin());
        assert!(!driver.is_spinning());
    }

    #[test]
    fn no_active_renderable_is_a_no_op() {
        let mut scene = scene_with_box();
        let mut driver = RenderDriver::new(0.01);
        driver.toggle_spin();
        assert!(!driver.step(&mut scene, None));
        assert!(!driver.step(&mut scene, Some(RenderableId(9))));
        assert_eq!(scene.get(RenderableId(1)).unwrap().transform.rotation.y, 0.0);
    }
}
