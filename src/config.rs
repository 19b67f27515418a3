//! Viewer configuration
//!
//! There is no configuration file. Settings are constructed in code with
//! sensible defaults and a handful of environment overrides:
//!
//! - `SHAPE_STUDIO_ASSET_DIR` - directory holding the `texture/` folder
//! - `SHAPE_STUDIO_SHAPE` - shape to select on startup (e.g. `TorusKnot`)
//! - `SHAPE_STUDIO_DAMPING` - camera damping factor in `(0, 1]`

use std::path::PathBuf;

use log::warn;

use crate::gfx::geometry::ShapeKind;

pub const ENV_ASSET_DIR: &str = "SHAPE_STUDIO_ASSET_DIR";
pub const ENV_SHAPE: &str = "SHAPE_STUDIO_SHAPE";
pub const ENV_DAMPING: &str = "SHAPE_STUDIO_DAMPING";

/// Settings consumed when the application starts
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Root of the static assets; textures resolve to `<asset_dir>/texture/*.jpg`
    pub asset_dir: PathBuf,
    /// Rotation added to the Y axis per frame while spinning (radians)
    pub spin_increment: f32,
    /// Where a freshly selected shape is placed
    pub spawn_point: [f32; 3],
    pub startup_shape: Option<ShapeKind>,
    /// `None` applies camera input immediately
    pub camera_damping: Option<f32>,
    pub vsync: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Shape Studio".to_string(),
            width: 1200,
            height: 800,
            asset_dir: PathBuf::from("assets"),
            spin_increment: 0.01,
            spawn_point: [0.0, 1.0, 0.0],
            startup_shape: None,
            camera_damping: None,
            vsync: true,
        }
    }
}

impl ViewerConfig {
    /// Defaults overlaid with the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_ASSET_DIR).filter(|d| !d.trim().is_empty()) {
            config.asset_dir = PathBuf::from(dir);
        }

        if let Some(name) = lookup(ENV_SHAPE) {
            match name.trim().parse::<ShapeKind>() {
                Ok(kind) => config.startup_shape = Some(kind),
                Err(err) => warn!("ignoring {ENV_SHAPE}: {err}"),
            }
        }

        if let Some(raw) = lookup(ENV_DAMPING) {
            match raw.trim().parse::<f32>() {
                Ok(factor) if factor > 0.0 && factor <= 1.0 => {
                    config.camera_damping = Some(factor)
                }
                _ => warn!("ignoring {ENV_DAMPING}={raw}: expected a number in (0, 1]"),
            }
        }

        config
    }

    pub fn with_startup_shape(mut self, shape: ShapeKind) -> Self {
        self.startup_shape = Some(shape);
        self
    }

    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_describe_the_stock_viewer() {
        let config = ViewerConfig::default();
        assert_eq!(config.spawn_point, [0.0, 1.0, 0.0]);
        assert_eq!(config.spin_increment, 0.01);
        assert!(config.camera_damping.is_none());
        assert!(config.startup_shape.is_none());
    }

    #[test]
    fn environment_overrides_apply() {
        let config = ViewerConfig::from_lookup(lookup_from(&[
            (ENV_ASSET_DIR, "/srv/static"),
            (ENV_SHAPE, "TorusKnot"),
            (ENV_DAMPING, "0.05"),
        ]));
        assert_eq!(config.asset_dir, PathBuf::from("/srv/static"));
        assert_eq!(config.startup_shape, Some(ShapeKind::TorusKnot));
        assert_eq!(config.camera_damping, Some(0.05));
    }

    #[test]
    fn invalid_environment_values_are_ignored() {
        let config = ViewerConfig::from_lookup(lookup_from(&[
            (ENV_SHAPE, "Teapot"),
            (ENV_DAMPING, "3"),
            (ENV_ASSET_DIR, "  "),
        ]));
        assert_eq!(config, ViewerConfig::default());
    }
}
