//! Declarative description of the editable fields
//!
//! Every control the debug panel shows is described by a [`FieldSpec`]. The
//! binder materializes control groups from the static tables below instead of
//! inspecting renderables at runtime.

use std::f32::consts::TAU;

use crate::gfx::geometry::ShapeKind;
use crate::gfx::scene::Renderable;

/// A numeric renderable field a slider writes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTarget {
    PositionX,
    PositionY,
    PositionZ,
    RotationX,
    RotationY,
    RotationZ,
    ScaleX,
    ScaleY,
    ScaleZ,
    Metalness,
    Roughness,
}

impl FieldTarget {
    pub fn read(self, renderable: &Renderable) -> f32 {
        let t = &renderable.transform;
        match self {
            FieldTarget::PositionX => t.position.x,
            FieldTarget::PositionY => t.position.y,
            FieldTarget::PositionZ => t.position.z,
            FieldTarget::RotationX => t.rotation.x,
            FieldTarget::RotationY => t.rotation.y,
            FieldTarget::RotationZ => t.rotation.z,
            FieldTarget::ScaleX => t.scale.x,
            FieldTarget::ScaleY => t.scale.y,
            FieldTarget::ScaleZ => t.scale.z,
            FieldTarget::Metalness => renderable.material.metalness,
            FieldTarget::Roughness => renderable.material.roughness,
        }
    }

    pub fn write(self, renderable: &mut Renderable, value: f32) {
        let t = &mut renderable.transform;
        match self {
            FieldTarget::PositionX => t.position.x = value,
            FieldTarget::PositionY => t.position.y = value,
            FieldTarget::PositionZ => t.position.z = value,
            FieldTarget::RotationX => t.rotation.x = value,
            FieldTarget::RotationY => t.rotation.y = value,
            FieldTarget::RotationZ => t.rotation.z = value,
            FieldTarget::ScaleX => t.scale.x = value,
            FieldTarget::ScaleY => t.scale.y = value,
            FieldTarget::ScaleZ => t.scale.z = value,
            FieldTarget::Metalness => renderable.material.metalness = value,
            FieldTarget::Roughness => renderable.material.roughness = value,
        }
    }
}

/// A boolean renderable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagTarget {
    Wireframe,
}

impl FlagTarget {
    pub fn read(self, renderable: &Renderable) -> bool {
        match self {
            FlagTarget::Wireframe => renderable.material.wireframe,
        }
    }

    pub fn write(self, renderable: &mut Renderable, value: bool) {
        match self {
            FlagTarget::Wireframe => renderable.material.wireframe = value,
        }
    }
}

/// What a button does when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    AddShape(ShapeKind),
    ToggleSpin,
    ToggleFullscreen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Slider over `[min, max]` snapped to `step`
    Scalar(FieldTarget),
    /// RGB picker bound to the material color
    Color,
    /// Texture selector; options come from the texture library
    Choice,
    Toggle(FlagTarget),
    Trigger(Trigger),
}

/// One editable field: identity, widget kind, range and step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl FieldSpec {
    pub const fn scalar(
        key: &'static str,
        label: &'static str,
        target: FieldTarget,
        min: f32,
        max: f32,
        step: f32,
    ) -> Self {
        Self {
            key,
            label,
            kind: FieldKind::Scalar(target),
            min,
            max,
            step,
        }
    }

    pub const fn plain(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            min: 0.0,
            max: 0.0,
            step: 0.0,
        }
    }

    pub const fn trigger(key: &'static str, label: &'static str, trigger: Trigger) -> Self {
        Self::plain(key, label, FieldKind::Trigger(trigger))
    }

    /// Clamps into range, snaps to the step grid, then clamps again
    ///
    /// Snapping is `round(v / step) * step`, so the top of a range that is not a
    /// multiple of the step snaps down onto the grid.
    pub fn constrain(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        let clamped = value.clamp(self.min, self.max);
        if self.step <= 0.0 {
            return clamped;
        }
        let snapped = (clamped / self.step).round() * self.step;
        snapped.clamp(self.min, self.max)
    }
}

/// The control groups a panel can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    AddGeometry,
    Fullscreen,
    Transform,
    Material,
    Spin,
}

impl GroupKind {
    pub fn title(self) -> &'static str {
        match self {
            GroupKind::AddGeometry => "Add Geometry",
            GroupKind::Fullscreen => "Fullscreen",
            GroupKind::Transform => "Transform",
            GroupKind::Material => "Material",
            GroupKind::Spin => "Spin",
        }
    }

    /// Whether the group is rebuilt for every new renderable
    pub fn is_per_renderable(self) -> bool {
        matches!(self, GroupKind::Transform | GroupKind::Material | GroupKind::Spin)
    }
}

#[rustfmt::skip]
pub static TRANSFORM_FIELDS: [FieldSpec; 9] = [
    FieldSpec::scalar("position.x", "Position X", FieldTarget::PositionX, -10.0, 10.0, 0.1),
    FieldSpec::scalar("position.y", "Position Y", FieldTarget::PositionY, -10.0, 10.0, 0.1),
    FieldSpec::scalar("position.z", "Position Z", FieldTarget::PositionZ, -10.0, 10.0, 0.1),
    FieldSpec::scalar("rotation.x", "Rotation X", FieldTarget::RotationX, 0.0, TAU, 0.01),
    FieldSpec::scalar("rotation.y", "Rotation Y", FieldTarget::RotationY, 0.0, TAU, 0.01),
    FieldSpec::scalar("rotation.z", "Rotation Z", FieldTarget::RotationZ, 0.0, TAU, 0.01),
    FieldSpec::scalar("scale.x", "Scale X", FieldTarget::ScaleX, 0.1, 5.0, 0.1),
    FieldSpec::scalar("scale.y", "Scale Y", FieldTarget::ScaleY, 0.1, 5.0, 0.1),
    FieldSpec::scalar("scale.z", "Scale Z", FieldTarget::ScaleZ, 0.1, 5.0, 0.1),
];

#[rustfmt::skip]
pub static MATERIAL_FIELDS: [FieldSpec; 5] = [
    FieldSpec::plain("color", "Color", FieldKind::Color),
    FieldSpec::plain("texture", "Texture", FieldKind::Choice),
    FieldSpec::scalar("metalness", "Metalness", FieldTarget::Metalness, 0.0, 1.0, 0.01),
    FieldSpec::scalar("roughness", "Roughness", FieldTarget::Roughness, 0.0, 1.0, 0.01),
    FieldSpec::plain("wireframe", "Wireframe", FieldKind::Toggle(FlagTarget::Wireframe)),
];

pub static SPIN_FIELDS: [FieldSpec; 1] = [FieldSpec::trigger("spin", "Spin", Trigger::ToggleSpin)];

pub static FULLSCREEN_FIELDS: [FieldSpec; 1] =
    [FieldSpec::trigger("fullscreen", "Toggle", Trigger::ToggleFullscreen)];

/// Fields of a group; "Add Geometry" has one trigger per catalog shape
pub fn fields_for(kind: GroupKind) -> Vec<FieldSpec> {
    match kind {
        GroupKind::AddGeometry => ShapeKind::ALL
            .iter()
            .map(|&shape| FieldSpec::trigger(shape.name(), shape.name(), Trigger::AddShape(shape)))
            .collect(),
        GroupKind::Fullscreen => FULLSCREEN_FIELDS.to_vec(),
        GroupKind::Transform => TRANSFORM_FIELDS.to_vec(),
        GroupKind::Material => MATERIAL_FIELDS.to_vec(),
        GroupKind::Spin => SPIN_FIELDS.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(target: FieldTarget) -> FieldSpec {
        *TRANSFORM_FIELDS
            .iter()
            .find(|f| f.kind == FieldKind::Scalar(target))
            .unwrap()
    }

    #[test]
    fn constrain_clamps_then_snaps() {
        let position = field(FieldTarget::PositionX);
        assert_eq!(position.constrain(42.0), 10.0);
        assert_eq!(position.constrain(-42.0), -10.0);
        assert!((position.constrain(1.234) - 1.2).abs() < 1e-5);
        assert!((position.constrain(1.26) - 1.3).abs() < 1e-5);

        let scale = field(FieldTarget::ScaleY);
        assert!((scale.constrain(0.0) - 0.1).abs() < 1e-6);
        assert_eq!(position.constrain(f32::NAN), -10.0);
    }

    #[test]
    fn rotation_top_snaps_onto_grid() {
        let rotation = field(FieldTarget::RotationY);
        let top = rotation.constrain(TAU);
        assert!(top <= TAU);
        assert!((top - 6.28).abs() < 1e-4);
        assert!((rotation.constrain(std::f32::consts::PI) - 3.14).abs() < 1e-4);
    }

    #[test]
    fn tables_match_panel_layout() {
        assert_eq!(fields_for(GroupKind::Transform).len(), 9);
        assert_eq!(fields_for(GroupKind::Material).len(), 5);
        assert_eq!(fields_for(GroupKind::Spin).len(), 1);
        let shapes = fields_for(GroupKind::AddGeometry);
        assert_eq!(shapes.len(), ShapeKind::ALL.len());
        assert_eq!(shapes[0].label, "Box");
        assert_eq!(shapes[14].kind, FieldKind::Trigger(Trigger::AddShape(ShapeKind::CustomHeart)));
    }

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<_> = [GroupKind::AddGeometry, GroupKind::Fullscreen, GroupKind::Transform, GroupKind::Material, GroupKind::Spin]
            .into_iter()
            .flat_map(fields_for)
            .map(|f| f.key)
            .collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }
}
