//! # Viewer state
//!
//! [`Viewer`] is the single owner of everything the studio mutates: the scene,
//! the geometry catalog, the selection, the debug panel binding, pending
//! texture loads and the spin flag. It is GPU-free; the application feeds it
//! panel actions and calls [`Viewer::advance_frame`] once per frame.

pub mod driver;
pub mod selection;
pub mod textures;

pub use driver::RenderDriver;
pub use selection::SelectionManager;
pub use textures::{FileTextureSource, TextureLibrary, TextureSource, TextureSwitcher};

use std::sync::Arc;

use cgmath::Vector3;
use log::info;

use crate::config::ViewerConfig;
use crate::error::Result;
use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
use crate::gfx::geometry::{GeometryCatalog, ShapeKind};
use crate::gfx::resources::Material;
use crate::gfx::scene::{Renderable, RenderableId, Scene};
use crate::ui::{PanelAction, PanelBinder};

const CAMERA_EYE: [f32; 3] = [5.0, 5.0, 5.0];
const CAMERA_ROTATE_SPEED: f32 = 0.005;
const CAMERA_ZOOM_SPEED: f32 = 0.1;

pub struct Viewer {
    scene: Scene,
    catalog: GeometryCatalog,
    default_material: Material,
    selection: SelectionManager,
    panel: PanelBinder,
    textures: TextureSwitcher,
    library: TextureLibrary,
    driver: RenderDriver,
    fullscreen_requested: bool,
}

impl Viewer {
    pub fn new(config: &ViewerConfig) -> Self {
        Self::with_texture_source(config, Arc::new(FileTextureSource))
    }

    pub fn with_texture_source(config: &ViewerConfig, source: Arc<dyn TextureSource>) -> Self {
        let aspect = config.width as f32 / config.height.max(1) as f32;
        let camera = OrbitCamera::looking_at(CAMERA_EYE.into(), Vector3::new(0.0, 0.0, 0.0), aspect);
        let controller =
            CameraController::new(CAMERA_ROTATE_SPEED, CAMERA_ZOOM_SPEED).with_damping(config.camera_damping);

        let library = TextureLibrary::new(&config.asset_dir);
        let mut viewer = Self {
            scene: Scene::new(CameraManager::new(camera, controller)),
            catalog: GeometryCatalog::new(),
            default_material: Material::default(),
            selection: SelectionManager::new(config.spawn_point),
            panel: PanelBinder::new(library.names()),
            textures: TextureSwitcher::new(source),
            library,
            driver: RenderDriver::new(config.spin_increment),
            fullscreen_requested: false,
        };

        if let Some(kind) = config.startup_shape {
            viewer.select_shape(kind);
        }
        viewer
    }

    /// Makes a fresh `kind` the active renderable and rebinds the panel to it
    pub fn select_shape(&mut self, kind: ShapeKind) -> RenderableId {
        let id = self
            .selection
            .select_shape(kind, &mut self.scene, &self.catalog, &self.default_material);
        self.panel.rebind(id);
        info!("selected {kind} ({id})");
        id
    }

    /// Applies the named library texture to the active renderable
    ///
    /// Does nothing when no renderable is active.
    pub fn apply_texture(&mut self, name: &str) -> Result<()> {
        let path = self.library.resolve(name)?;
        let Some(id) = self.selection.active() else {
            return Ok(());
        };
        let Some(renderable) = self.scene.get_mut(id) else {
            return Ok(());
        };
        self.textures.apply_texture(renderable, path.as_deref())
    }

    pub fn toggle_spin(&mut self) -> bool {
        self.driver.toggle_spin()
    }

    pub fn is_spinning(&self) -> bool {
        self.driver.is_spinning()
    }

    pub fn request_fullscreen_toggle(&mut self) {
        self.fullscreen_requested = !self.fullscreen_requested;
    }

    /// Returns and clears a pending fullscreen toggle
    pub fn take_fullscreen_toggle(&mut self) -> bool {
        std::mem::take(&mut self.fullscreen_requested)
    }

    pub fn handle_action(&mut self, action: PanelAction) -> Result<()> {
        match action {
            PanelAction::SelectShape(kind) => {
                self.select_shape(kind);
            }
            PanelAction::ApplyTexture(name) => self.apply_texture(&name)?,
            PanelAction::ToggleSpin => {
                self.toggle_spin();
            }
            PanelAction::ToggleFullscreen => self.request_fullscreen_toggle(),
        }
        Ok(())
    }

    /// Installs finished texture loads
    pub fn poll_textures(&mut self) -> usize {
        self.textures.poll(&mut self.scene, self.selection.active())
    }

    /// Per-frame state update: texture completions, spin, camera
    pub fn advance_frame(&mut self) {
        self.poll_textures();
        self.driver.step(&mut self.scene, self.selection.active());
        self.scene.update();
    }

    /// Builds the debug panel and returns what it requested
    pub fn draw_panel(&mut self, ui: &imgui::Ui) -> Vec<PanelAction> {
        let active = self.selection.active();
        self.panel.draw(ui, &mut self.scene, active)
    }

    pub fn active(&self) -> Option<&Renderable> {
        self.selection.active().and_then(|id| self.scene.get(id))
    }

    pub fn active_mut(&mut self) -> Option<&mut Renderable> {
        let id = self.selection.active()?;
        self.scene.get_mut(id)
    }

    pub fn active_id(&self) -> Option<RenderableId> {
        self.selection.active()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn panel(&self) -> &PanelBinder {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut PanelBinder {
        &mut self.panel
    }

    pub fn catalog(&self) -> &GeometryCatalog {
        &self.catalog
    }

    #[cfg(test)]
    fn wait_for_textures(&mut self) -> usize {
        self.textures.wait_all(&mut self.scene, self.selection.active())
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;
    use std::path::Path;

    use super::*;
    use crate::gfx::resources::TextureImage;
    use crate::ui::GroupKind;

    struct CheckerSource;

    impl TextureSource for CheckerSource {
        fn load(&self, _path: &Path) -> Result<TextureImage> {
            Ok(TextureImage::new(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]).unwrap())
        }
    }

    fn viewer() -> Viewer {
        Viewer::with_texture_source(&ViewerConfig::default(), Arc::new(CheckerSource))
    }

    #[test]
    fn starts_empty_with_persistent_groups() {
        let viewer = viewer();
        assert!(viewer.active().is_none());
        assert!(viewer.scene().is_empty());
        assert_eq!(viewer.panel().group_count(GroupKind::AddGeometry), 1);
        assert_eq!(viewer.panel().group_count(GroupKind::Fullscreen), 1);
        assert_eq!(viewer.panel().group_count(GroupKind::Transform), 0);
    }

    #[test]
    fn startup_shape_goes_through_selection() {
        let config = ViewerConfig::default().with_startup_shape(ShapeKind::Torus);
        let viewer = Viewer::with_texture_source(&config, Arc::new(CheckerSource));
        assert_eq!(viewer.active().unwrap().shape(), ShapeKind::Torus);
        assert_eq!(viewer.panel().bound_target(), viewer.active_id());
    }

    #[test]
    fn box_then_sphere_leaves_only_the_sphere() {
        let mut viewer = viewer();
        let first = viewer.select_shape(ShapeKind::Box);
        let active = viewer.active().unwrap();
        assert_eq!(active.shape(), ShapeKind::Box);
        assert_eq!(active.transform.position, Vector3::new(0.0, 1.0, 0.0));

        let second = viewer.select_shape(ShapeKind::Sphere);
        assert_eq!(viewer.scene().len(), 1);
        assert!(!viewer.scene().contains(first));
        assert_eq!(viewer.active().unwrap().shape(), ShapeKind::Sphere);
        assert_eq!(viewer.panel().bound_target(), Some(second));
        for kind in [GroupKind::Transform, GroupKind::Material, GroupKind::Spin] {
            assert_eq!(viewer.panel().group_count(kind), 1);
        }
    }

    #[test]
    fn rotation_holds_without_spin() {
        let mut viewer = viewer();
        viewer.select_shape(ShapeKind::Box);
        viewer.active_mut().unwrap().transform.rotation.y = PI;

        viewer.advance_frame();

        assert_eq!(viewer.active().unwrap().transform.rotation.y, PI);
    }

    #[test]
    fn ten_spinning_frames_add_a_tenth_of_a_radian() {
        let mut viewer = viewer();
        viewer.select_shape(ShapeKind::Box);
        viewer.handle_action(PanelAction::ToggleSpin).unwrap();

        for _ in 0..10 {
            viewer.advance_frame();
        }

        let y = viewer.active().unwrap().transform.rotation.y;
        assert!((y - 0.1).abs() < 1e-5, "rotation.y = {y}");
    }

    #[test]
    fn spin_survives_reselection() {
        let mut viewer = viewer();
        viewer.select_shape(ShapeKind::Box);
        viewer.toggle_spin();
        viewer.select_shape(ShapeKind::Ring);
        viewer.advance_frame();
        assert!(viewer.is_spinning());
        assert!((viewer.active().unwrap().transform.rotation.y - 0.01).abs() < 1e-6);
    }

    #[test]
    fn texture_actions_follow_the_active_renderable() {
        let mut viewer = viewer();
        viewer.select_shape(ShapeKind::Plane);
        viewer.active_mut().unwrap().material.color = [0.2, 0.4, 0.6];

        viewer
            .handle_action(PanelAction::ApplyTexture("Swirl".to_string()))
            .unwrap();
        assert_eq!(viewer.wait_for_textures(), 1);
        let material = &viewer.active().unwrap().material;
        assert!(material.has_texture());
        assert_eq!(material.color, [1.0, 1.0, 1.0]);

        viewer.handle_action(PanelAction::ApplyTexture("None".to_string())).unwrap();
        assert!(!viewer.active().unwrap().material.has_texture());
    }

    #[test]
    fn texture_for_a_replaced_shape_is_dropped() {
        let mut viewer = viewer();
        viewer.select_shape(ShapeKind::Box);
        viewer.apply_texture("Wood").unwrap();
        viewer.select_shape(ShapeKind::Sphere);

        assert_eq!(viewer.wait_for_textures(), 0);
        assert!(!viewer.active().unwrap().material.has_texture());
    }

    #[test]
    fn unknown_texture_is_an_error_and_no_active_is_a_no_op() {
        let mut viewer = viewer();
        assert!(viewer.apply_texture("Wood").is_ok());
        viewer.select_shape(ShapeKind::Box);
        assert!(viewer.apply_texture("Marble").is_err());
    }

    #[test]
    fn fullscreen_requests_are_taken_once() {
        let mut viewer = viewer();
        viewer.handle_action(PanelAction::ToggleFullscreen).unwrap();
        assert!(viewer.take_fullscreen_toggle());
        assert!(!viewer.take_fullscreen_toggle());

        viewer.request_fullscreen_toggle();
        viewer.request_fullscreen_toggle();
        assert!(!viewer.take_fullscreen_toggle());
    }
}
