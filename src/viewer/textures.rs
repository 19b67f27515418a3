//! Texture selection and background loading
//!
//! Decoding happens on a short-lived worker thread per request; the result
//! comes back over a oneshot channel and is applied from the main thread in
//! [`TextureSwitcher::poll`]. Each request carries the renderable id and the
//! material's texture generation at the time it was issued, so a load that
//! finishes after the renderable was replaced or re-textured is dropped.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use futures::channel::oneshot;
use log::{debug, warn};

use crate::error::{Result, ViewerError};
use crate::gfx::resources::{TextureImage, TextureSlot};
use crate::gfx::scene::{Renderable, RenderableId, Scene};

/// Produces decoded pixels for a texture path
pub trait TextureSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<TextureImage>;
}

/// Reads and decodes image files from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTextureSource;

impl TextureSource for FileTextureSource {
    fn load(&self, path: &Path) -> Result<TextureImage> {
        let decoded = image::open(path)
            .map_err(|source| ViewerError::TextureLoad {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();

        let (width, height) = decoded.dimensions();
        Ok(TextureImage {
            width,
            height,
            rgba: decoded.into_raw(),
        })
    }
}

const TEXTURE_FILES: [(&str, Option<&str>); 9] = [
    ("None", None),
    ("M1", Some("m1.jpg")),
    ("M2", Some("m2.jpg")),
    ("M3", Some("m3.jpg")),
    ("M4", Some("m4.jpg")),
    ("M5", Some("m5.jpg")),
    ("M6", Some("m6.jpg")),
    ("Swirl", Some("swirl.jpg")),
    ("Wood", Some("wood.jpg")),
];

/// Fixed name to path table, rooted at `<asset_dir>/texture`
#[derive(Debug, Clone)]
pub struct TextureLibrary {
    texture_dir: PathBuf,
}

impl TextureLibrary {
    pub fn new(asset_dir: impl AsRef<Path>) -> Self {
        Self {
            texture_dir: asset_dir.as_ref().join("texture"),
        }
    }

    /// Names in selector order; the first is always "None"
    pub fn names(&self) -> Vec<String> {
        TEXTURE_FILES.iter().map(|(name, _)| name.to_string()).collect()
    }

    /// Path for `name`, or `None` for the "None" entry
    pub fn resolve(&self, name: &str) -> Result<Option<PathBuf>> {
        TEXTURE_FILES
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, file)| file.map(|f| self.texture_dir.join(f)))
            .ok_or_else(|| ViewerError::UnknownTexture(name.to_string()))
    }
}

struct PendingLoad {
    renderable: RenderableId,
    generation: u64,
    path: PathBuf,
    receiver: oneshot::Receiver<Result<TextureImage>>,
}

pub struct TextureSwitcher {
    source: Arc<dyn TextureSource>,
    pending: Vec<PendingLoad>,
}

impl TextureSwitcher {
    pub fn new(source: Arc<dyn TextureSource>) -> Self {
        Self {
            source,
            pending: Vec::new(),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Clears the texture now, or starts loading `path` in the background
    ///
    /// Either way the material's texture generation is bumped, which makes any
    /// earlier in-flight load for this renderable stale.
    pub fn apply_texture(&mut self, renderable: &mut Renderable, path: Option<&Path>) -> Result<()> {
        let generation = renderable.material.next_texture_generation();

        let Some(path) = path else {
            renderable.material.clear_texture();
            return Ok(());
        };

        let (sender, receiver) = oneshot::channel();
        let source = Arc::clone(&self.source);
        let worker_path = path.to_path_buf();
        thread::Builder::new()
            .name(format!("texture-{}", renderable.id().0))
            .spawn(move || {
                // The receiver may be gone if the switcher was dropped
                let _ = sender.send(source.load(&worker_path));
            })
            .map_err(ViewerError::TextureWorker)?;

        debug!("loading {} for {}", path.display(), renderable.id());
        self.pending.push(PendingLoad {
            renderable: renderable.id(),
            generation,
            path: path.to_path_buf(),
            receiver,
        });
        Ok(())
    }

    /// Applies every finished load; returns how many textures were installed
    pub fn poll(&mut self, scene: &mut Scene, active: Option<RenderableId>) -> usize {
        let mut applied = 0;
        self.pending.retain_mut(|load| match load.receiver.try_recv() {
            Ok(None) => true,
            Ok(Some(result)) => {
                if complete(load, result, scene, active) {
                    applied += 1;
                }
                false
            }
            Err(oneshot::Canceled) => {
                warn!("texture worker for {} exited without a result", load.path.display());
                false
            }
        });
        applied
    }

    /// Blocks until every pending load has finished, then applies them
    #[cfg(test)]
    pub(crate) fn wait_all(&mut self, scene: &mut Scene, active: Option<RenderableId>) -> usize {
        let mut applied = 0;
        for mut load in std::mem::take(&mut self.pending) {
            if let Ok(result) = futures::executor::block_on(&mut load.receiver) {
                if complete(&load, result, scene, active) {
                    applied += 1;
                }
            }
        }
        applied
    }
}

fn complete(
    load: &PendingLoad,
    result: Result<TextureImage>,
    scene: &mut Scene,
    active: Option<RenderableId>,
) -> bool {
    let image = match result {
        Ok(image) => image,
        Err(err) => {
            warn!("{err}");
            return false;
        }
    };

    if active != Some(load.renderable) {
        debug!("dropping {}: {} is no longer active", load.path.display(), load.renderable);
        return false;
    }
    let Some(renderable) = scene.get_mut(load.renderable) else {
        debug!("dropping {}: {} left the scene", load.path.display(), load.renderable);
        return false;
    };
    if renderable.material.texture_generation() != load.generation {
        debug!("dropping {}: superseded by a newer request", load.path.display());
        return false;
    }

    renderable.material.set_texture(TextureSlot {
        path: load.path.clone(),
        image: Arc::new(image),
    });
    debug!("applied {} to {}", load.path.display(), load.renderable);
    true
}

#[cfg(test)]
mod tests {
    use cgmath::Vector3;

    use super::*;
    use crate::gfx::camera::{CameraController, CameraManager, OrbitCamera};
    use crate::gfx::geometry::{GeometryCatalog, ShapeKind};
    use crate::gfx::resources::Material;

    struct SolidSource([u8; 4]);

    impl TextureSource for SolidSource {
        fn load(&self, _path: &Path) -> Result<TextureImage> {
            Ok(TextureImage::solid(self.0))
        }
    }

    struct MissingSource;

    impl TextureSource for MissingSource {
        fn load(&self, path: &Path) -> Result<TextureImage> {
            Err(ViewerError::TextureLoad {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(std::io::Error::from(std::io::ErrorKind::NotFound)),
            })
        }
    }

    fn scene_with(ids: &[u64]) -> Scene {
        let camera = OrbitCamera::looking_at(Vector3::new(5.0, 5.0, 5.0), Vector3::new(0.0, 0.0, 0.0), 1.0);
        let mut scene = Scene::new(CameraManager::new(camera, CameraController::new(0.005, 0.1)));
        let catalog = GeometryCatalog::new();
        for &id in ids {
            scene.add(Renderable::new(
                RenderableId(id),
                ShapeKind::Sphere,
                Arc::clone(catalog.get(ShapeKind::Sphere)),
                Material::new([1.0, 0.0, 0.0], 0.5, 0.5),
            ));
        }
        scene
    }

    fn wood() -> PathBuf {
        PathBuf::from("assets/texture/wood.jpg")
    }

    #[test]
    fn library_resolves_names() {
        let library = TextureLibrary::new("assets");
        assert_eq!(library.names().len(), 9);
        assert_eq!(library.names()[0], "None");
        assert_eq!(library.resolve("None").unwrap(), None);
        assert_eq!(library.resolve("Wood").unwrap(), Some(wood()));
        assert_eq!(library.resolve("M3").unwrap(), Some(PathBuf::from("assets/texture/m3.jpg")));
        assert!(matches!(library.resolve("Brick"), Err(ViewerError::UnknownTexture(_))));
    }

    #[test]
    fn clearing_is_synchronous() {
        let mut scene = scene_with(&[1]);
        let mut switcher = TextureSwitcher::new(Arc::new(SolidSource([0, 0, 0, 255])));
        let renderable = scene.get_mut(RenderableId(1)).unwrap();

        switcher.apply_texture(renderable, None).unwrap();

        assert!(!renderable.material.has_texture());
        assert_eq!(renderable.material.color, [1.0, 1.0, 1.0]);
        assert!(renderable.material.needs_update());
        assert_eq!(switcher.pending_count(), 0);
    }

    #[test]
    fn completed_load_sets_texture_and_white() {
        let mut scene = scene_with(&[1]);
        let mut switcher = TextureSwitcher::new(Arc::new(SolidSource([10, 20, 30, 255])));
        let active = Some(RenderableId(1));

        switcher
            .apply_texture(scene.get_mut(RenderableId(1)).unwrap(), Some(&wood()))
            .unwrap();
        assert_eq!(switcher.wait_all(&mut scene, active), 1);

        let material = &scene.get(RenderableId(1)).unwrap().material;
        assert_eq!(material.texture_path(), Some(wood().as_path()));
        assert_eq!(material.texture().unwrap().image.rgba, vec![10, 20, 30, 255]);
        assert_eq!(material.color, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn load_for_replaced_renderable_is_dropped() {
        let mut scene = scene_with(&[1, 2]);
        let mut switcher = TextureSwitcher::new(Arc::new(SolidSource([0, 0, 0, 255])));

        switcher
            .apply_texture(scene.get_mut(RenderableId(1)).unwrap(), Some(&wood()))
            .unwrap();

        assert_eq!(switcher.wait_all(&mut scene, Some(RenderableId(2))), 0);
        assert!(!scene.get(RenderableId(1)).unwrap().material.has_texture());
        assert!(!scene.get(RenderableId(2)).unwrap().material.has_texture());
    }

    #[test]
    fn newer_request_supersedes_older_load() {
        let mut scene = scene_with(&[1]);
        let mut switcher = TextureSwitcher::new(Arc::new(SolidSource([0, 0, 0, 255])));
        let active = Some(RenderableId(1));

        switcher
            .apply_texture(scene.get_mut(RenderableId(1)).unwrap(), Some(&wood()))
            .unwrap();
        switcher.apply_texture(scene.get_mut(RenderableId(1)).unwrap(), None).unwrap();

        assert_eq!(switcher.wait_all(&mut scene, active), 0);
        assert!(!scene.get(RenderableId(1)).unwrap().material.has_texture());
    }

    #[test]
    fn failed_load_leaves_texture_unset() {
        let mut scene = scene_with(&[1]);
        let mut switcher = TextureSwitcher::new(Arc::new(MissingSource));

        switcher
            .apply_texture(scene.get_mut(RenderableId(1)).unwrap(), Some(&wood()))
            .unwrap();

        assert_eq!(switcher.wait_all(&mut scene, Some(RenderableId(1))), 0);
        assert!(!scene.get(RenderableId(1)).unwrap().material.has_texture());
    }

    #[test]
    fn poll_eventually_applies() {
        let mut scene = scene_with(&[1]);
        let mut switcher = TextureSwitcher::new(Arc::new(SolidSource([1, 2, 3, 4])));
        let active = Some(RenderableId(1));

        switcher
            .apply_texture(scene.get_mut(RenderableId(1)).unwrap(), Some(&wood()))
            .unwrap();

        let mut applied = 0;
        for _ in 0..500 {
            applied += switcher.poll(&mut scene, active);
            if switcher.pending_count() == 0 {
                break;
            }
            thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(applied, 1);
        assert!(scene.get(RenderableId(1)).unwrap().material.has_texture());
    }

    #[test]
    fn file_source_decodes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tile.png");
        image::RgbaImage::from_pixel(2, 3, image::Rgba([200, 100, 50, 255]))
            .save(&path)
            .unwrap();

        let decoded = FileTextureSource.load(&path).unwrap();
        assert_eq!((decoded.width, decoded.height), (2, 3));
        assert_eq!(&decoded.rgba[..4], &[200, 100, 50, 255]);

        let missing = FileTextureSource.load(&dir.path().join("nope.png"));
        assert!(matches!(missing, Err(ViewerError::TextureLoad { .. })));
    }
}
