//! The "Debug" panel
//!
//! [`PanelBinder`] keeps two persistent groups ("Add Geometry", "Fullscreen")
//! and one [`PanelBinding`] over the active renderable. Rebinding tears the old
//! binding down completely before the new groups are built.
//!
//! Drawing never changes the selection: widgets produce [`PanelEdit`]s, which are
//! applied after the window is built, and anything that reaches beyond the
//! bound renderable comes back to the caller as a [`PanelAction`].

use log::debug;

use super::schema::{fields_for, FieldKind, FieldSpec, FieldTarget, FlagTarget, GroupKind, Trigger};
use crate::gfx::geometry::ShapeKind;
use crate::gfx::scene::{RenderableId, Scene};

/// Requests the panel hands back to the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    SelectShape(ShapeKind),
    ApplyTexture(String),
    ToggleSpin,
    ToggleFullscreen,
}

/// A single widget interaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelEdit {
    Scalar(FieldTarget, f32),
    Color([f32; 3]),
    Flag(FlagTarget, bool),
    /// Index into the texture names
    Choice(usize),
    Trigger(Trigger),
}

/// A titled group of fields, shown as one collapsing header
#[derive(Debug, Clone, PartialEq)]
pub struct ControlGroup {
    pub kind: GroupKind,
    pub fields: Vec<FieldSpec>,
}

impl ControlGroup {
    pub fn build(kind: GroupKind) -> Self {
        Self {
            kind,
            fields: fields_for(kind),
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

/// The per-renderable groups and the renderable they edit
#[derive(Debug, Clone, PartialEq)]
pub struct PanelBinding {
    pub target: RenderableId,
    pub groups: Vec<ControlGroup>,
    /// Selector position; not read back from the material
    pub texture_selected: usize,
}

pub struct PanelBinder {
    persistent: Vec<ControlGroup>,
    binding: Option<PanelBinding>,
    texture_names: Vec<String>,
    /// Screen rect of every field widget drawn in the last frame, by key
    #[cfg(test)]
    widget_rects: Vec<(&'static str, [f32; 2], [f32; 2])>,
}

impl PanelBinder {
    pub fn new(texture_names: Vec<String>) -> Self {
        Self {
            persistent: vec![
                ControlGroup::build(GroupKind::AddGeometry),
                ControlGroup::build(GroupKind::Fullscreen),
            ],
            binding: None,
            texture_names,
            #[cfg(test)]
            widget_rects: Vec::new(),
        }
    }

    /// Replaces the current binding with fresh groups for `target`
    pub fn rebind(&mut self, target: RenderableId) {
        self.teardown();
        self.binding = Some(PanelBinding {
            target,
            groups: [GroupKind::Transform, GroupKind::Material, GroupKind::Spin]
                .into_iter()
                .map(ControlGroup::build)
                .collect(),
            texture_selected: 0,
        });
        debug!("panel bound to {target}");
    }

    /// Drops the per-renderable groups; a no-op when nothing is bound
    pub fn teardown(&mut self) {
        if let Some(old) = self.binding.take() {
            debug!("panel unbound from {}", old.target);
        }
    }

    pub fn binding(&self) -> Option<&PanelBinding> {
        self.binding.as_ref()
    }

    pub fn bound_target(&self) -> Option<RenderableId> {
        self.binding.as_ref().map(|b| b.target)
    }

    pub fn texture_names(&self) -> &[String] {
        &self.texture_names
    }

    /// Persistent groups first, then the bound ones
    pub fn groups(&self) -> impl Iterator<Item = &ControlGroup> {
        self.persistent
            .iter()
            .chain(self.binding.iter().flat_map(|b| b.groups.iter()))
    }

    pub fn group_count(&self, kind: GroupKind) -> usize {
        self.groups().filter(|g| g.kind == kind).count()
    }

    /// Applies one edit and returns the action it requests, if any
    ///
    /// Field writes go to the bound renderable only while it is `active`; edits
    /// against a stale binding are dropped.
    pub fn apply_edit(
        &mut self,
        scene: &mut Scene,
        active: Option<RenderableId>,
        edit: PanelEdit,
    ) -> Option<PanelAction> {
        match edit {
            PanelEdit::Trigger(Trigger::AddShape(kind)) => return Some(PanelAction::SelectShape(kind)),
            PanelEdit::Trigger(Trigger::ToggleFullscreen) => return Some(PanelAction::ToggleFullscreen),
            _ => {}
        }

        let binding = self.binding.as_mut()?;
        if active != Some(binding.target) {
            debug!("ignoring panel edit for inactive {}", binding.target);
            return None;
        }

        match edit {
            PanelEdit::Trigger(_) => Some(PanelAction::ToggleSpin),
            PanelEdit::Choice(index) => {
                let name = self.texture_names.get(index)?.clone();
                binding.texture_selected = index;
                Some(PanelAction::ApplyTexture(name))
            }
            PanelEdit::Scalar(target, value) => {
                let spec = find_scalar(&binding.groups, target)?;
                let renderable = scene.get_mut(binding.target)?;
                target.write(renderable, spec.constrain(value));
                None
            }
            PanelEdit::Color(color) => {
                let renderable = scene.get_mut(binding.target)?;
                renderable.material.color = color.map(|c| c.clamp(0.0, 1.0));
                None
            }
            PanelEdit::Flag(target, value) => {
                let renderable = scene.get_mut(binding.target)?;
                target.write(renderable, value);
                None
            }
        }
    }

    /// Draws the panel and returns the actions requested this frame
    pub fn draw(&mut self, ui: &imgui::Ui, scene: &mut Scene, active: Option<RenderableId>) -> Vec<PanelAction> {
        let display_size = ui.io().display_size;
        if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
            return Vec::new();
        }

        let width = (display_size[0] * 0.25).clamp(320.0, 420.0);
        let mut edits = Vec::new();
        #[cfg(test)]
        let mut rects = Vec::new();

        ui.window("Debug")
            .size([width, display_size[1] * 0.8], imgui::Condition::FirstUseEver)
            .position([display_size[0] - width - 10.0, 10.0], imgui::Condition::FirstUseEver)
            .resizable(true)
            .collapsible(true)
            .build(|| {
                for group in self.groups() {
                    if !ui.collapsing_header(group.title(), imgui::TreeNodeFlags::DEFAULT_OPEN) {
                        continue;
                    }
                    // Field labels may repeat a header title ("Spin"); ids must not
                    let _group_id = ui.push_id(group.title());
                    for field in &group.fields {
                        if let Some(edit) = self.draw_field(ui, scene, field) {
                            edits.push(edit);
                        }
                        #[cfg(test)]
                        rects.push((field.key, ui.item_rect_min(), ui.item_rect_max()));
                    }
                    ui.spacing();
                }

                ui.separator();
                let stats = scene.get_statistics();
                ui.text(format!(
                    "Objects: {}  Triangles: {}  Vertices: {}",
                    stats.object_count, stats.total_triangles, stats.total_vertices
                ));
            });

        #[cfg(test)]
        {
            self.widget_rects = rects;
        }

        edits
            .into_iter()
            .filter_map(|edit| self.apply_edit(scene, active, edit))
            .collect()
    }

    fn draw_field(&self, ui: &imgui::Ui, scene: &Scene, field: &FieldSpec) -> Option<PanelEdit> {
        if let FieldKind::Trigger(trigger) = field.kind {
            return ui.button(field.label).then_some(PanelEdit::Trigger(trigger));
        }

        let binding = self.binding.as_ref()?;
        let renderable = scene.get(binding.target)?;

        match field.kind {
            FieldKind::Scalar(target) => {
                let mut value = target.read(renderable);
                ui.slider(field.label, field.min, field.max, &mut value)
                    .then_some(PanelEdit::Scalar(target, value))
            }
            FieldKind::Color => {
                let mut color = renderable.material.color;
                ui.color_edit3(field.label, &mut color)
                    .then_some(PanelEdit::Color(color))
            }
            FieldKind::Choice => {
                let mut selected = binding.texture_selected;
                ui.combo_simple_string(field.label, &mut selected, self.texture_names.as_slice())
                    .then_some(PanelEdit::Choice(selected))
            }
            FieldKind::Toggle(target) => {
                let mut value = target.read(renderable);
                ui.checkbox(field.label, &mut value)
                    .then_some(PanelEdit::Flag(target, value))
            }
            FieldKind::Trigger(_) => None,
        }
    }
}

fn find_scalar(groups: &[ControlGroup], target: FieldTarget) -> Option<FieldSpec> {
    groups
        .iter()
        .flat_map(|g| g.fields.iter())
        .find(|f| f.kind == FieldKind::Scalar(target))
        .copied()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use cgmath::Vector3;

    use super::*;
    use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
    use crate::gfx::geometry::GeometryCatalog;
    use crate::gfx::resources::Material;
    use crate::gfx::scene::Renderable;

    fn scene_with(ids: &[u64]) -> Scene {
        let camera = OrbitCamera::looking_at(Vector3::new(5.0, 5.0, 5.0), Vector3::new(0.0, 0.0, 0.0), 1.5);
        let mut scene = Scene::new(CameraManager::new(camera, CameraController::new(0.005, 0.1)));
        let catalog = GeometryCatalog::new();
        for &id in ids {
            scene.add(Renderable::new(
                RenderableId(id),
                ShapeKind::Box,
                Arc::clone(catalog.get(ShapeKind::Box)),
                Material::default(),
            ));
        }
        scene
    }

    fn binder() -> PanelBinder {
        PanelBinder::new(vec!["None".to_string(), "Wood".to_string()])
    }

    /// ImGui allows one active context per process
    static UI_LOCK: Mutex<()> = Mutex::new(());

    struct HeadlessUi {
        context: imgui::Context,
    }

    impl HeadlessUi {
        fn new() -> Self {
            let mut context = imgui::Context::create();
            context.set_ini_filename(None);
            context.io_mut().display_size = [1600.0, 2000.0];
            context.fonts().build_rgba32_texture();
            Self { context }
        }

        fn frame(&mut self, panel: &mut PanelBinder, scene: &mut Scene, active: Option<RenderableId>) -> Vec<PanelAction> {
            let ui = self.context.new_frame();
            let actions = panel.draw(ui, scene, active);
            self.context.render();
            actions
        }

        /// Hover, press and release at `pos`, one frame each
        fn click(
            &mut self,
            panel: &mut PanelBinder,
            scene: &mut Scene,
            active: Option<RenderableId>,
            pos: [f32; 2],
        ) -> Vec<PanelAction> {
            let mut actions = Vec::new();
            self.context.io_mut().add_mouse_pos_event(pos);
            actions.extend(self.frame(panel, scene, active));
            self.context.io_mut().add_mouse_button_event(imgui::MouseButton::Left, true);
            actions.extend(self.frame(panel, scene, active));
            self.context.io_mut().add_mouse_button_event(imgui::MouseButton::Left, false);
            actions.extend(self.frame(panel, scene, active));
            actions
        }
    }

    /// Point inside the widget drawn for `key`, `fraction` of the way across
    fn widget_point(panel: &PanelBinder, key: &str, fraction: f32) -> [f32; 2] {
        let (_, min, max) = panel
            .widget_rects
            .iter()
            .find(|(k, _, _)| *k == key)
            .copied()
            .unwrap_or_else(|| panic!("no widget drawn for {key}"));
        [min[0] + (max[0] - min[0]) * fraction, (min[1] + max[1]) * 0.5]
    }

    #[test]
    fn rebind_keeps_exactly_one_of_each_group() {
        let mut panel = binder();
        assert_eq!(panel.group_count(GroupKind::Transform), 0);
        assert_eq!(panel.group_count(GroupKind::AddGeometry), 1);

        for id in 1..=5 {
            panel.rebind(RenderableId(id));
        }
        for kind in [GroupKind::Transform, GroupKind::Material, GroupKind::Spin] {
            assert_eq!(panel.group_count(kind), 1, "{kind:?}");
        }
        assert_eq!(panel.group_count(GroupKind::AddGeometry), 1);
        assert_eq!(panel.group_count(GroupKind::Fullscreen), 1);
        assert_eq!(panel.bound_target(), Some(RenderableId(5)));

        panel.teardown();
        panel.teardown();
        assert_eq!(panel.group_count(GroupKind::Material), 0);
    }

    #[test]
    fn scalar_edits_are_constrained() {
        let mut scene = scene_with(&[1]);
        let mut panel = binder();
        panel.rebind(RenderableId(1));
        let active = Some(RenderableId(1));

        panel.apply_edit(&mut scene, active, PanelEdit::Scalar(FieldTarget::PositionX, 99.0));
        panel.apply_edit(&mut scene, active, PanelEdit::Scalar(FieldTarget::ScaleZ, 2.04));
        panel.apply_edit(&mut scene, active, PanelEdit::Scalar(FieldTarget::Roughness, 0.333));

        let r = scene.get(RenderableId(1)).unwrap();
        assert_eq!(r.transform.position.x, 10.0);
        assert!((r.transform.scale.z - 2.0).abs() < 1e-5);
        assert!((r.material.roughness - 0.33).abs() < 1e-5);
    }

    #[test]
    fn edits_against_a_stale_binding_are_ignored() {
        let mut scene = scene_with(&[1, 2]);
        let mut panel = binder();
        panel.rebind(RenderableId(1));

        let action = panel.apply_edit(&mut scene, Some(RenderableId(2)), PanelEdit::Flag(FlagTarget::Wireframe, true));
        assert!(action.is_none());
        assert!(!scene.get(RenderableId(1)).unwrap().material.wireframe);

        let spin = panel.apply_edit(&mut scene, Some(RenderableId(2)), PanelEdit::Trigger(Trigger::ToggleSpin));
        assert!(spin.is_none());
    }

    #[test]
    fn triggers_and_choices_become_actions() {
        let mut scene = scene_with(&[1]);
        let mut panel = binder();

        assert_eq!(
            panel.apply_edit(&mut scene, None, PanelEdit::Trigger(Trigger::AddShape(ShapeKind::Ring))),
            Some(PanelAction::SelectShape(ShapeKind::Ring))
        );
        assert_eq!(
            panel.apply_edit(&mut scene, None, PanelEdit::Trigger(Trigger::ToggleFullscreen)),
            Some(PanelAction::ToggleFullscreen)
        );

        panel.rebind(RenderableId(1));
        let active = Some(RenderableId(1));
        assert_eq!(
            panel.apply_edit(&mut scene, active, PanelEdit::Choice(1)),
            Some(PanelAction::ApplyTexture("Wood".to_string()))
        );
        assert_eq!(panel.binding().unwrap().texture_selected, 1);
        assert_eq!(panel.apply_edit(&mut scene, active, PanelEdit::Choice(7)), None);
        assert_eq!(
            panel.apply_edit(&mut scene, active, PanelEdit::Trigger(Trigger::ToggleSpin)),
            Some(PanelAction::ToggleSpin)
        );

        panel.rebind(RenderableId(1));
        assert_eq!(panel.binding().unwrap().texture_selected, 0);
    }

    #[test]
    fn clicking_triggers_yields_their_actions() {
        let _guard = UI_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut ui = HeadlessUi::new();
        let mut scene = scene_with(&[1]);
        let mut panel = binder();
        panel.rebind(RenderableId(1));
        let active = Some(RenderableId(1));

        for _ in 0..2 {
            assert!(ui.frame(&mut panel, &mut scene, active).is_empty());
        }

        let cases = [
            ("spin", PanelAction::ToggleSpin),
            ("fullscreen", PanelAction::ToggleFullscreen),
            ("Box", PanelAction::SelectShape(ShapeKind::Box)),
            ("TorusKnot", PanelAction::SelectShape(ShapeKind::TorusKnot)),
        ];
        for (key, expected) in cases {
            let pos = widget_point(&panel, key, 0.5);
            let actions = ui.click(&mut panel, &mut scene, active, pos);
            assert_eq!(actions, vec![expected], "clicking {key}");
        }
    }

    #[test]
    fn slider_drag_writes_the_bound_renderable() {
        let _guard = UI_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut ui = HeadlessUi::new();
        let mut scene = scene_with(&[1]);
        let mut panel = binder();
        panel.rebind(RenderableId(1));
        let active = Some(RenderableId(1));

        for _ in 0..2 {
            ui.frame(&mut panel, &mut scene, active);
        }
        assert_eq!(scene.get(RenderableId(1)).unwrap().transform.position.x, 0.0);

        let pos = widget_point(&panel, "position.x", 0.2);
        let actions = ui.click(&mut panel, &mut scene, active, pos);
        assert!(actions.is_empty());

        let x = scene.get(RenderableId(1)).unwrap().transform.position.x;
        assert!(x < 0.0 && x >= -10.0, "position.x = {x}");
        assert!(((x * 10.0).round() - x * 10.0).abs() < 1e-3, "{x} is off the 0.1 grid");
    }
}
