use std::f32::consts::FRAC_PI_2;

use cgmath::{perspective, Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector3};

use super::camera_utils::CameraUniform;

/// Maps cgmath's `-1..1` clip depth onto wgpu's `0..1`
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

const FIELD_OF_VIEW: Deg<f32> = Deg(75.0);
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 1000.0;

/// Range the orbit parameters are kept in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitLimits {
    pub distance: (f32, f32),
    /// Symmetric bound on pitch; stays short of the poles so `up` never aligns with the view
    pub max_pitch: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            distance: (0.5, 100.0),
            max_pitch: FRAC_PI_2 - 0.01,
        }
    }
}

/// Perspective camera on a sphere around `target`, Y up
///
/// `eye` is derived from `distance`, `pitch` and `yaw`; every mutator keeps it
/// in sync.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub target: Vector3<f32>,
    pub eye: Vector3<f32>,
    pub limits: OrbitLimits,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub uniform: CameraUniform,
}

impl OrbitCamera {
    /// Creates a camera from spherical coordinates around `target`
    ///
    /// # Arguments
    /// * `distance` - Radius of the orbit
    /// * `pitch` - Elevation in radians, positive looks down from above
    /// * `yaw` - Azimuth in radians, measured from +Z towards +X
    /// * `target` - Point the camera orbits and looks at
    /// * `aspect` - Viewport width over height
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            target,
            eye: target,
            limits: OrbitLimits::default(),
            aspect,
            fovy: FIELD_OF_VIEW.into(),
            uniform: CameraUniform::default(),
        };
        camera.place_eye();
        camera.update_view_proj();
        camera
    }

    /// Camera at `eye` orbiting `target`
    ///
    /// Converts the offset to spherical coordinates, so `eye` is reproduced up
    /// to the pitch limit.
    pub fn looking_at(eye: Vector3<f32>, target: Vector3<f32>, aspect: f32) -> Self {
        let offset = eye - target;
        let distance = offset.magnitude().max(f32::EPSILON);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = offset.x.atan2(offset.z);
        Self::new(distance, pitch, yaw, target, aspect)
    }

    /// Projection times view, in wgpu clip space
    pub fn view_projection(&self) -> Matrix4<f32> {
        let view = Matrix4::look_at_rh(
            Point3::from_vec(self.eye),
            Point3::from_vec(self.target),
            Vector3::unit_y(),
        );
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, NEAR_PLANE, FAR_PLANE) * view
    }

    /// Dollies in or out; steps shrink as the camera gets closer
    pub fn add_distance(&mut self, delta: f32) {
        let step = self.distance.max(1.1).log10() * delta;
        let (min, max) = self.limits.distance;
        self.distance = (self.distance + step).clamp(min, max);
        self.place_eye();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        let bound = self.limits.max_pitch;
        self.pitch = (self.pitch + delta).clamp(-bound, bound);
        self.place_eye();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.yaw = (self.yaw + delta).rem_euclid(std::f32::consts::TAU);
        self.place_eye();
    }

    /// Slides the target across the view plane
    ///
    /// # Arguments
    /// * `delta` - (right, up) amounts, scaled by the orbit distance
    pub fn pan(&mut self, (right_amount, up_amount): (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(Vector3::unit_y()).normalize();
        let up = right.cross(forward);

        let scale = self.distance * 0.1;
        self.target += (right * right_amount + up * up_amount) * scale;
        self.place_eye();
    }

    /// Updates the aspect ratio for a new viewport size
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    ///
    /// Zero-sized resizes are ignored.
    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    pub fn update_view_proj(&mut self) {
        self.uniform = CameraUniform::new(self.eye, self.view_projection());
    }

    fn place_eye(&mut self) {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        self.eye = self.target
            + Vector3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch) * self.distance;
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Zero;

    use super::*;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-4
    }

    #[test]
    fn looking_at_reproduces_eye() {
        let camera = OrbitCamera::looking_at(Vector3::new(5.0, 5.0, 5.0), Vector3::zero(), 1.5);
        assert!(close(camera.eye, Vector3::new(5.0, 5.0, 5.0)));
        assert_eq!(camera.uniform.eye, [camera.eye.x, camera.eye.y, camera.eye.z, 1.0]);
    }

    #[test]
    fn pitch_is_clamped_short_of_the_poles() {
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        camera.add_pitch(10.0);
        assert!(camera.pitch < FRAC_PI_2);
        assert!(camera.eye.y > 0.0);
    }

    #[test]
    fn pan_moves_target_and_eye_together() {
        let mut camera = OrbitCamera::new(5.0, 0.3, 0.2, Vector3::zero(), 1.0);
        let offset = camera.eye - camera.target;
        camera.pan((1.0, 0.0));
        assert!(camera.target.magnitude() > 0.0);
        assert!(close(camera.eye - camera.target, offset));
    }

    #[test]
    fn distance_stays_within_limits() {
        let mut camera = OrbitCamera::new(5.0, 0.3, 0.2, Vector3::zero(), 1.0);
        for _ in 0..500 {
            camera.add_distance(-1.0);
        }
        assert_eq!(camera.distance, camera.limits.distance.0);
        assert!(((camera.eye - camera.target).magnitude() - camera.distance).abs() < 1e-4);
    }

    #[test]
    fn zero_sized_resize_keeps_aspect() {
        let mut camera = OrbitCamera::new(5.0, 0.3, 0.2, Vector3::zero(), 1.5);
        camera.resize_projection(0, 600);
        assert_eq!(camera.aspect, 1.5);
        camera.resize_projection(800, 400);
        assert_eq!(camera.aspect, 2.0);
    }
}
