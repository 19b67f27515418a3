use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

use super::orbit_camera::OrbitCamera;

/// Orbit input gathered since the last camera update
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct OrbitDelta {
    pub yaw: f32,
    pub pitch: f32,
    pub zoom: f32,
    pub pan: (f32, f32),
}

impl OrbitDelta {
    fn scaled(&self, factor: f32) -> Self {
        Self {
            yaw: self.yaw * factor,
            pitch: self.pitch * factor,
            zoom: self.zoom * factor,
            pan: (self.pan.0 * factor, self.pan.1 * factor),
        }
    }

    fn is_negligible(&self) -> bool {
        const EPS: f32 = 1e-5;
        self.yaw.abs() < EPS
            && self.pitch.abs() < EPS
            && self.zoom.abs() < EPS
            && self.pan.0.abs() < EPS
            && self.pan.1.abs() < EPS
    }

    fn apply(&self, camera: &mut OrbitCamera) {
        if self.zoom != 0.0 {
            camera.add_distance(self.zoom);
        }
        if self.yaw != 0.0 {
            camera.add_yaw(self.yaw);
        }
        if self.pitch != 0.0 {
            camera.add_pitch(self.pitch);
        }
        if self.pan != (0.0, 0.0) {
            camera.pan(self.pan);
        }
    }
}

/// Drag to orbit, Shift+drag to pan, wheel to zoom
///
/// Input is accumulated and only reaches the camera in [`CameraController::update`].
/// With damping enabled, each update applies that fraction of the pending motion
/// and keeps the rest, so the camera eases to a stop.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    damping: Option<f32>,
    is_shift_held: bool,
    is_mouse_pressed: bool,
    pending: OrbitDelta,
}

impl CameraController {
    /// Creates a controller with no damping
    ///
    /// # Arguments
    /// * `rotate_speed` - Radians of orbit per pixel of drag
    /// * `zoom_speed` - Distance change per wheel line
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            damping: None,
            is_shift_held: false,
            is_mouse_pressed: false,
            pending: OrbitDelta::default(),
        }
    }

    /// Sets the fraction of pending motion applied per update
    ///
    /// # Arguments
    /// * `factor` - Clamped into (0, 1]; `None` applies input immediately
    pub fn with_damping(mut self, factor: Option<f32>) -> Self {
        self.damping = factor.map(|f| f.clamp(f32::EPSILON, 1.0));
        self
    }

    pub fn damping(&self) -> Option<f32> {
        self.damping
    }

    /// Button, wheel and modifier changes. Mouse events the UI captured must
    /// not be passed in, except button releases.
    pub fn process_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => self.set_mouse_pressed(*state == ElementState::Pressed),
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32 * 0.05
                    }
                };
                self.scroll(scroll_amount);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.set_shift_held(modifiers.state().shift_key());
            }
            WindowEvent::Focused(false) => {
                self.set_mouse_pressed(false);
                self.set_shift_held(false);
            }
            _ => (),
        }
    }

    /// Raw mouse motion drives the drag
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.drag(delta.0 as f32, delta.1 as f32);
        }
    }

    pub fn set_mouse_pressed(&mut self, pressed: bool) {
        self.is_mouse_pressed = pressed;
    }

    pub fn set_shift_held(&mut self, held: bool) {
        self.is_shift_held = held;
    }

    pub fn scroll(&mut self, amount: f32) {
        self.pending.zoom += amount * self.zoom_speed;
    }

    /// Mouse motion in pixels; ignored unless the left button is down
    pub fn drag(&mut self, dx: f32, dy: f32) {
        if !self.is_mouse_pressed {
            return;
        }
        if self.is_shift_held {
            self.pending.pan.0 -= dx * self.pan_speed;
            self.pending.pan.1 += dy * self.pan_speed;
        } else {
            self.pending.yaw -= dx * self.rotate_speed;
            self.pending.pitch += dy * self.rotate_speed;
        }
    }

    pub fn is_panning(&self) -> bool {
        self.is_mouse_pressed && self.is_shift_held
    }

    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed && !self.is_shift_held
    }

    pub fn pending(&self) -> OrbitDelta {
        self.pending
    }

    /// Applies pending input to `camera`
    ///
    /// With damping, only the damped share is applied and the remainder stays
    /// pending for the next frame.
    ///
    /// # Returns
    /// True if the camera moved
    pub fn update(&mut self, camera: &mut OrbitCamera) -> bool {
        if self.pending.is_negligible() {
            self.pending = OrbitDelta::default();
            return false;
        }

        match self.damping {
            None => {
                self.pending.apply(camera);
                self.pending = OrbitDelta::default();
            }
            Some(factor) => {
                self.pending.scaled(factor).apply(camera);
                self.pending = self.pending.scaled(1.0 - factor);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3, Zero};

    fn camera() -> OrbitCamera {
        OrbitCamera::new(8.0, 0.5, 0.5, Vector3::zero(), 1.0)
    }

    #[test]
    fn motion_without_button_is_ignored() {
        let mut controller = CameraController::new(0.005, 0.1);
        controller.drag(40.0, 10.0);
        assert_eq!(controller.pending(), OrbitDelta::default());
    }

    #[test]
    fn undamped_drag_applies_in_one_update() {
        let mut controller = CameraController::new(0.005, 0.1);
        let mut cam = camera();
        controller.set_mouse_pressed(true);
        controller.drag(20.0, 0.0);

        assert!(controller.update(&mut cam));
        assert!((cam.yaw - (0.5 - 0.1)).abs() < 1e-6);
        assert!(!controller.update(&mut cam));
    }

    #[test]
    fn damped_drag_eases_towards_the_target() {
        let mut controller = CameraController::new(0.005, 0.1).with_damping(Some(0.25));
        let mut cam = camera();
        controller.set_mouse_pressed(true);
        controller.drag(20.0, 0.0);

        controller.update(&mut cam);
        let first_step = 0.5 - cam.yaw;
        assert!((first_step - 0.025).abs() < 1e-6);

        for _ in 0..100 {
            controller.update(&mut cam);
        }
        assert!((cam.yaw - 0.4).abs() < 1e-4);
    }

    #[test]
    fn shift_drag_pans() {
        let mut controller = CameraController::new(0.005, 0.1);
        let mut cam = camera();
        controller.set_mouse_pressed(true);
        controller.set_shift_held(true);
        assert!(controller.is_panning());

        controller.drag(30.0, 0.0);
        controller.update(&mut cam);
        assert!(cam.target.magnitude() > 0.0);
        assert_eq!(cam.yaw, 0.5);
    }
}
