use crate::gfx::camera::camera_utils::CameraManager;

use super::lights::{AmbientLight, DirectionalLight};
use super::renderable::{Renderable, RenderableId};

/// World container: renderables, background, lights and camera
pub struct Scene {
    pub camera_manager: CameraManager,
    /// Linear RGB clear color
    pub background: [f32; 3],
    pub ambient_light: AmbientLight,
    pub directional_light: DirectionalLight,
    objects: Vec<Renderable>,
}

impl Scene {
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            background: [0.2, 0.2, 0.2], // #333333
            ambient_light: AmbientLight::default(),
            directional_light: DirectionalLight::default(),
            objects: Vec::new(),
        }
    }

    /// Applies camera input and refreshes camera matrices
    pub fn update(&mut self) {
        self.camera_manager.update();
    }

    pub fn add(&mut self, renderable: Renderable) {
        self.objects.push(renderable);
    }

    /// Detaches a renderable; the caller decides whether to dispose it
    pub fn remove(&mut self, id: RenderableId) -> Option<Renderable> {
        let index = self.objects.iter().position(|r| r.id() == id)?;
        Some(self.objects.remove(index))
    }

    pub fn get(&self, id: RenderableId) -> Option<&Renderable> {
        self.objects.iter().find(|r| r.id() == id)
    }

    pub fn get_mut(&mut self, id: RenderableId) -> Option<&mut Renderable> {
        self.objects.iter_mut().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: RenderableId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> impl Iterator<Item = &Renderable> {
        self.objects.iter()
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut Renderable> {
        self.objects.iter_mut()
    }

    pub fn get_statistics(&self) -> SceneStatistics {
        SceneStatistics {
            object_count: self.objects.len(),
            total_triangles: self
                .objects
                .iter()
                .map(|r| r.geometry().triangle_count())
                .sum(),
            total_vertices: self
                .objects
                .iter()
                .map(|r| r.geometry().vertex_count())
                .sum(),
        }
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{CameraController, OrbitCamera};
    use crate::gfx::geometry::ShapeKind;
    use crate::gfx::resources::Material;
    use cgmath::{Vector3, Zero};
    use std::sync::Arc;

    fn scene() -> Scene {
        let camera = OrbitCamera::looking_at(Vector3::new(5.0, 5.0, 5.0), Vector3::zero(), 1.5);
        Scene::new(CameraManager::new(camera, CameraController::new(0.005, 0.1)))
    }

    #[test]
    fn add_find_remove() {
        let mut scene = scene();
        let geometry = Arc::new(ShapeKind::Tetrahedron.build());
        scene.add(Renderable::new(
            RenderableId(1),
            ShapeKind::Tetrahedron,
            geometry,
            Material::default(),
        ));

        assert!(scene.contains(RenderableId(1)));
        assert_eq!(scene.get_statistics().total_triangles, 4);

        let removed = scene.remove(RenderableId(1)).unwrap();
        assert_eq!(removed.id(), RenderableId(1));
        assert!(scene.is_empty());
        assert!(scene.remove(RenderableId(1)).is_none());
    }
}
