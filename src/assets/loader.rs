//! Background font loading and scene population
//!
//! [`FontLoader::load`] reads and parses the typeface on a worker thread and
//! hands the result back through a one-shot channel. The render loop polls
//! the returned [`PendingFont`] once per frame, so the scene is only ever
//! mutated from the thread that draws it.

use std::{
    fs,
    ops::RangeInclusive,
    path::{Path, PathBuf},
    thread,
};

use cgmath::Vector3;
use futures::channel::oneshot;
use rand::Rng;

use super::font::Font;
use crate::{
    config::SceneConfig,
    error::{Result, SceneError},
    gfx::{
        geometry::{generate_torus, TextGeometry},
        resources::material::DEFAULT_MATERIAL,
        scene::{Mesh, Object, ObjectKind, Scene, Transform},
    },
};

/// Name of the extruded text object
pub const TEXT_OBJECT: &str = "text";
/// Name of the object holding every torus instance
pub const DONUT_OBJECT: &str = "donuts";

pub struct FontLoader;

impl FontLoader {
    /// Starts loading `path` on a background thread
    pub fn load(path: impl Into<PathBuf>) -> PendingFont {
        let path = path.into();
        let (sender, receiver) = oneshot::channel();

        let worker_path = path.clone();
        let spawned = thread::Builder::new()
            .name("font-loader".to_string())
            .spawn(move || {
                // The receiver may be gone if the app closed first
                let _ = sender.send(Self::load_blocking(&worker_path));
            });

        let receiver = match spawned {
            Ok(_) => receiver,
            Err(source) => {
                let (sender, receiver) = oneshot::channel();
                let _ = sender.send(Err(SceneError::FontIo {
                    path: path.clone(),
                    source,
                }));
                receiver
            }
        };

        log::info!("Loading font {}", path.display());
        PendingFont { path, receiver }
    }

    /// Reads and parses a typeface file on the calling thread
    pub fn load_blocking(path: &Path) -> Result<Font> {
        let json = fs::read_to_string(path).map_err(|source| SceneError::FontIo {
            path: path.to_path_buf(),
            source,
        })?;
        Font::parse(&json, path)
    }
}

/// A font load that may still be running
#[derive(Debug)]
pub struct PendingFont {
    path: PathBuf,
    receiver: oneshot::Receiver<Result<Font>>,
}

impl PendingFont {
    /// Load completed by whoever holds the returned sender
    pub fn channel(path: impl Into<PathBuf>) -> (oneshot::Sender<Result<Font>>, Self) {
        let (sender, receiver) = oneshot::channel();
        let pending = Self {
            path: path.into(),
            receiver,
        };
        (sender, pending)
    }

    /// Wraps an already finished load
    pub fn ready(path: impl Into<PathBuf>, result: Result<Font>) -> Self {
        let (sender, pending) = Self::channel(path);
        let _ = sender.send(result);
        pending
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Takes the result if the load has finished
    ///
    /// Returns `None` while the worker is still running. A worker that died
    /// without answering reports [`SceneError::FontLoadCancelled`].
    pub fn try_take(&mut self) -> Option<Result<Font>> {
        match self.receiver.try_recv() {
            Ok(Some(result)) => Some(result),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(SceneError::FontLoadCancelled)),
        }
    }

    /// Blocks until the load finishes
    pub fn wait(self) -> Result<Font> {
        futures::executor::block_on(self.receiver).unwrap_or(Err(SceneError::FontLoadCancelled))
    }
}

/// Uniform sample from `range`, upper bound excluded
fn sample(rng: &mut impl Rng, range: &RangeInclusive<f32>) -> f32 {
    let (start, end) = (*range.start(), *range.end());
    start + rng.random::<f32>() * (end - start)
}

/// Random placement inside the spawn volume
pub fn random_instance(config: &SceneConfig, rng: &mut impl Rng) -> Transform {
    let spawn = &config.spawn;
    let position = Vector3::new(
        sample(rng, &spawn.x),
        sample(rng, &spawn.y),
        sample(rng, &spawn.z),
    );
    let rotation = Vector3::new(
        rng.random::<f32>() * spawn.max_rotation,
        rng.random::<f32>() * spawn.max_rotation,
        0.0,
    );

    Transform::identity()
        .with_position(position)
        .with_rotation(rotation)
        .with_uniform_scale(rng.random::<f32>() * spawn.max_scale)
}

/// Adds the text and the torus instances once the font is available
///
/// Both objects use the scene's default material.
pub fn populate_scene(scene: &mut Scene, font: &Font, config: &SceneConfig, rng: &mut impl Rng) {
    let text_geometry = TextGeometry::build(font, &config.text);
    let mut text = Object::single(
        TEXT_OBJECT,
        ObjectKind::Text,
        Mesh::from_geometry(&text_geometry),
    );
    text.set_material(DEFAULT_MATERIAL);
    scene.add_object(text);

    let torus = &config.torus;
    let torus_geometry = generate_torus(
        torus.radius,
        torus.tube,
        torus.radial_segments,
        torus.tubular_segments,
    );
    let instances = (0..config.instance_count)
        .map(|_| random_instance(config, rng))
        .collect();
    let mut donuts = Object::new(
        DONUT_OBJECT,
        ObjectKind::Decorative,
        Mesh::from_geometry(&torus_geometry),
        instances,
    );
    donuts.set_material(DEFAULT_MATERIAL);
    scene.add_object(donuts);

    let stats = scene.get_statistics();
    log::info!(
        "Scene populated: {} objects, {} instances, {} triangles",
        stats.object_count,
        stats.instance_count,
        stats.total_triangles
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assets::font::tests::BOX_FONT, gfx::camera::CameraManager};
    use rand::{rngs::StdRng, SeedableRng};
    use std::io::Write;

    fn font_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BOX_FONT.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_blocking_reads_file() {
        let file = font_file();
        let font = FontLoader::load_blocking(file.path()).unwrap();
        assert_eq!(font.family_name, "Box");
    }

    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.typeface.json");

        match FontLoader::load_blocking(&missing) {
            Err(SceneError::FontIo { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected FontIo, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let result = FontLoader::load(file.path()).wait();
        assert!(matches!(result, Err(SceneError::FontParse { .. })));
    }

    #[test]
    fn test_background_load_resolves() {
        let file = font_file();
        let mut pending = FontLoader::load(file.path());
        assert_eq!(pending.path(), file.path());

        let font = loop {
            if let Some(result) = pending.try_take() {
                break result.unwrap();
            }
            thread::yield_now();
        };
        assert_eq!(font.glyph_count(), 3);
    }

    #[test]
    fn test_ready_and_cancelled() {
        let mut pending = PendingFont::ready("inline", Font::from_json(BOX_FONT));
        assert!(pending.try_take().unwrap().is_ok());

        let (sender, mut dropped) = PendingFont::channel("dropped");
        assert!(dropped.try_take().is_none());
        drop(sender);
        assert!(matches!(
            dropped.try_take(),
            Some(Err(SceneError::FontLoadCancelled))
        ));
    }

    #[test]
    fn test_populate_scene_adds_text_and_instances() {
        let config = SceneConfig::default();
        let font = Font::from_json(BOX_FONT).unwrap();
        let mut scene = Scene::new(CameraManager::scene_default(1.5));
        let mut rng = StdRng::seed_from_u64(7);

        populate_scene(&mut scene, &font, &config.clone().with_text("?o?"), &mut rng);

        assert_eq!(scene.instance_count(ObjectKind::Text), 1);
        assert_eq!(scene.instance_count(ObjectKind::Decorative), 100);
        let text = scene.get_object(TEXT_OBJECT).unwrap();
        assert!(text.mesh.triangle_count() > 0);
        assert_eq!(text.get_material_id().map(String::as_str), Some(DEFAULT_MATERIAL));

        let donuts = scene.get_object(DONUT_OBJECT).unwrap();
        assert_eq!(donuts.mesh.triangle_count(), 20 * 48 * 2);
        assert_eq!(donuts.get_material_id().map(String::as_str), Some(DEFAULT_MATERIAL));
    }

    #[test]
    fn test_instances_start_inside_spawn_volume() {
        let config = SceneConfig::default();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let t = random_instance(&config, &mut rng);
            assert!((-5.0..=5.0).contains(&t.position.x));
            assert!((0.0..=10.0).contains(&t.position.y));
            assert!((-5.0..=5.0).contains(&t.position.z));
            assert!((0.0..=std::f32::consts::PI).contains(&t.rotation.x));
            assert!((0.0..=std::f32::consts::PI).contains(&t.rotation.y));
            assert_eq!(t.rotation.z, 0.0);
            assert!((0.0..=1.0).contains(&t.scale.x));
            assert_eq!(t.scale.x, t.scale.y);
            assert_eq!(t.scale.y, t.scale.z);
        }
    }

    #[test]
    fn test_instances_are_independent() {
        let config = SceneConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let a = random_instance(&config, &mut rng);
        let b = random_instance(&config, &mut rng);
        assert_ne!(a.position, b.position);
    }
}
