//! Scene lighting: one ambient term and one directional light

/// Uniform light reaching every surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 0.5,
        }
    }
}

impl AmbientLight {
    pub fn radiance(&self) -> [f32; 3] {
        self.color.map(|c| c * self.intensity)
    }
}

/// Parallel light shining from `position` towards the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: [f32; 3],
    pub intensity: f32,
    pub position: [f32; 3],
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            intensity: 0.8,
            position: [5.0, 10.0, 7.5],
        }
    }
}

impl DirectionalLight {
    pub fn radiance(&self) -> [f32; 3] {
        self.color.map(|c| c * self.intensity)
    }

    /// Unit vector from the origin towards the light
    pub fn direction(&self) -> [f32; 3] {
        let [x, y, z] = self.position;
        let len = (x * x + y * y + z * z).sqrt();
        if len <= f32::EPSILON {
            return [0.0, 1.0, 0.0];
        }
        [x / len, y / len, z / len]
    }
}
