//! The render loop contract
//!
//! [`FrameScheduler::tick_at`] is called once per redraw. It applies a
//! finished font load, advances the animation, updates the orbit controls
//! and hands the scene to a [`FrameTarget`] for drawing. The window backed
//! target lives in `app`; tests drive the scheduler with a recording target.

use std::time::Instant;

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    animation::FallingAnimator,
    assets::{populate_scene, FontLoader, PendingFont},
    config::SceneConfig,
    error::Result,
    gfx::{
        camera::CameraManager,
        scene::{Scene, Viewport},
        ui::DebugPanel,
    },
};

/// Seconds since the scene started
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Whatever the scene is drawn into
pub trait FrameTarget {
    /// Resizes the backing surface, in physical pixels
    fn resize(&mut self, width: u32, height: u32);

    /// Draws one frame; the panel may edit the scene's lights first
    fn draw(&mut self, scene: &mut Scene, panel: &DebugPanel) -> Result<()>;
}

/// State shared by the event handlers and the render loop
pub struct AppContext {
    pub config: SceneConfig,
    pub scene: Scene,
    pub viewport: Viewport,
    pub panel: DebugPanel,
    pending_font: Option<PendingFont>,
    populated: bool,
    rng: StdRng,
}

impl AppContext {
    /// Scene with lights and camera but no assets yet
    pub fn new(config: SceneConfig, viewport: Viewport) -> Self {
        let scene = Scene::new(CameraManager::scene_default(viewport.aspect()));
        let panel = DebugPanel::light_controls(&config);
        Self {
            config,
            scene,
            viewport,
            panel,
            pending_font: None,
            populated: false,
            rng: StdRng::from_os_rng(),
        }
    }

    /// [`Self::new`] plus the background font load
    pub fn bootstrap(config: SceneConfig, viewport: Viewport) -> Self {
        let mut context = Self::new(config, viewport);
        context.start_font_load();
        context
    }

    /// Makes instance placement reproducible
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn start_font_load(&mut self) {
        let path = self.config.resolved_font_path();
        self.pending_font = Some(FontLoader::load(path));
    }

    /// Replaces any running load with `pending`
    pub fn set_pending_font(&mut self, pending: PendingFont) {
        self.pending_font = Some(pending);
    }

    pub fn is_loading(&self) -> bool {
        self.pending_font.is_some()
    }

    /// Whether the text and instances have been added
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Applies a finished font load to the scene
    ///
    /// # Returns
    /// `true` on the frame the scene was populated
    pub fn poll_assets(&mut self) -> bool {
        let Some(pending) = self.pending_font.as_mut() else {
            return false;
        };
        let Some(result) = pending.try_take() else {
            return false;
        };
        let path = pending.path().to_path_buf();
        self.pending_font = None;

        match result {
            Ok(font) if !self.populated => {
                log::info!("Font '{}' loaded from {}", font.family_name, path.display());
                populate_scene(&mut self.scene, &font, &self.config, &mut self.rng);
                self.populated = true;
                true
            }
            Ok(_) => {
                log::warn!("Ignoring font {}, scene already populated", path.display());
                false
            }
            Err(e) => {
                log::error!("{}", e);
                false
            }
        }
    }

    /// Stores the new viewport and updates the camera aspect
    ///
    /// # Returns
    /// Surface size in physical pixels, `None` while the viewport is empty
    pub fn resize(&mut self, viewport: Viewport) -> Option<(u32, u32)> {
        self.viewport = viewport;
        if viewport.is_empty() {
            return None;
        }
        self.scene.camera_manager.set_aspect(viewport.aspect());
        Some(viewport.surface_size())
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub elapsed: f32,
    pub assets_applied: bool,
    pub instances_moved: usize,
}

/// Runs the per-frame update and draw
pub struct FrameScheduler {
    pub context: AppContext,
    clock: Clock,
    animator: FallingAnimator,
    frames: u64,
}

impl FrameScheduler {
    pub fn new(context: AppContext) -> Self {
        let animator = FallingAnimator::from_config(&context.config);
        Self {
            context,
            clock: Clock::new(),
            animator,
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One frame at the current clock time
    pub fn tick(&mut self, target: &mut impl FrameTarget) -> Result<FrameReport> {
        let elapsed = self.clock.elapsed();
        self.tick_at(elapsed, target)
    }

    /// One frame at `elapsed` seconds
    pub fn tick_at(&mut self, elapsed: f32, target: &mut impl FrameTarget) -> Result<FrameReport> {
        let assets_applied = self.context.poll_assets();
        let scene = &mut self.context.scene;

        let instances_moved = self.animator.advance(scene, elapsed);
        scene.camera_manager.update();
        scene.update();

        target.draw(scene, &self.context.panel)?;
        self.frames += 1;

        Ok(FrameReport {
            elapsed,
            assets_applied,
            instances_moved,
        })
    }

    pub fn resize(&mut self, viewport: Viewport, target: &mut impl FrameTarget) {
        if let Some((width, height)) = self.context.resize(viewport) {
            target.resize(width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        animation::InstanceLifecycle,
        assets::{font::tests::BOX_FONT, Font},
        error::SceneError,
        gfx::scene::ObjectKind,
        gfx::ui::panel::{AMBIENT_LABEL, POINT_LABEL},
    };

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct DrawnFrame {
        ambient: f32,
        point: f32,
        light_x: f32,
        decorative: usize,
        aspect: f32,
    }

    #[derive(Default)]
    struct RecordingTarget {
        draws: Vec<DrawnFrame>,
        resizes: Vec<(u32, u32)>,
        edits: Vec<(&'static str, f32)>,
    }

    impl FrameTarget for RecordingTarget {
        fn resize(&mut self, width: u32, height: u32) {
            self.resizes.push((width, height));
        }

        fn draw(&mut self, scene: &mut Scene, panel: &DebugPanel) -> Result<()> {
            for (label, value) in self.edits.drain(..) {
                panel.set(scene, label, value);
            }
            self.draws.push(DrawnFrame {
                ambient: scene.ambient_light.intensity,
                point: scene.point_light.intensity,
                light_x: scene.point_light.position.x,
                decorative: scene.instance_count(ObjectKind::Decorative),
                aspect: scene.camera_manager.camera.aspect,
            });
            Ok(())
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(1200.0, 800.0, 1.0, 2.0)
    }

    fn scheduler_with(pending: PendingFont) -> FrameScheduler {
        let mut context = AppContext::new(SceneConfig::default(), viewport()).with_rng_seed(3);
        context.set_pending_font(pending);
        FrameScheduler::new(context)
    }

    #[test]
    fn test_frames_run_before_assets_load() {
        let (sender, pending) = PendingFont::channel("box.json");
        let mut scheduler = scheduler_with(pending);
        let mut target = RecordingTarget::default();

        for frame in 0..3 {
            let report = scheduler.tick_at(frame as f32, &mut target).unwrap();
            assert!(!report.assets_applied);
            assert_eq!(report.instances_moved, 0);
        }
        assert!(scheduler.context.is_loading());
        assert_eq!(target.draws.len(), 3);
        assert_eq!(target.draws[2].light_x, 2.0f32.cos());

        sender.send(Font::from_json(BOX_FONT)).unwrap();
        let report = scheduler.tick_at(3.0, &mut target).unwrap();
        assert!(report.assets_applied);
        assert_eq!(report.instances_moved, 100);
        assert!(!scheduler.context.is_loading());
        assert_eq!(scheduler.frames(), 4);
    }

    #[test]
    fn test_load_populates_once() {
        let mut scheduler = scheduler_with(PendingFont::ready("box.json", Font::from_json(BOX_FONT)));
        let mut target = RecordingTarget::default();

        scheduler.tick_at(0.0, &mut target).unwrap();
        assert!(scheduler.context.is_populated());
        assert_eq!(scheduler.context.scene.instance_count(ObjectKind::Text), 1);
        assert_eq!(scheduler.context.scene.instance_count(ObjectKind::Decorative), 100);

        scheduler
            .context
            .set_pending_font(PendingFont::ready("again.json", Font::from_json(BOX_FONT)));
        let report = scheduler.tick_at(0.1, &mut target).unwrap();
        assert!(!report.assets_applied);
        assert_eq!(scheduler.context.scene.instance_count(ObjectKind::Decorative), 100);
    }

    #[test]
    fn test_failed_load_keeps_rendering() {
        let failed = PendingFont::ready("missing.json", Err(SceneError::FontLoadCancelled));
        let mut scheduler = scheduler_with(failed);
        let mut target = RecordingTarget::default();

        for frame in 0..5 {
            scheduler.tick_at(frame as f32 * 0.016, &mut target).unwrap();
        }
        assert!(!scheduler.context.is_loading());
        assert!(!scheduler.context.is_populated());
        assert!(target.draws.iter().all(|d| d.decorative == 0));
        assert_eq!(target.draws.len(), 5);
    }

    #[test]
    fn test_instances_fall_by_frame_count() {
        let mut scheduler = scheduler_with(PendingFont::ready("box.json", Font::from_json(BOX_FONT)));
        let mut target = RecordingTarget::default();

        // The load is applied before the first advance, so every frame moves instances
        scheduler.tick_at(0.0, &mut target).unwrap();
        let start: Vec<f32> = scheduler
            .context
            .scene
            .decorative_instances()
            .map(|t| t.position.y)
            .collect();

        let frames = 250;
        for frame in 1..=frames {
            scheduler.tick_at(frame as f32 / 60.0, &mut target).unwrap();
        }

        for (t, y0) in scheduler.context.scene.decorative_instances().zip(start) {
            assert!((t.position.y - (y0 - 0.003 * frames as f32)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_configured_recycle_wraps_instances() {
        let config = SceneConfig::default()
            .with_instance_count(8)
            .with_lifecycle(InstanceLifecycle::Recycle {
                floor: 11.0,
                ceiling: 12.0,
            });
        let mut context = AppContext::new(config, viewport()).with_rng_seed(5);
        context.set_pending_font(PendingFont::ready("box.json", Font::from_json(BOX_FONT)));
        let mut scheduler = FrameScheduler::new(context);
        let mut target = RecordingTarget::default();

        // Every spawn height is below the floor, so the first advance wraps all of them
        scheduler.tick_at(0.0, &mut target).unwrap();
        let heights: Vec<f32> = scheduler
            .context
            .scene
            .decorative_instances()
            .map(|t| t.position.y)
            .collect();
        assert_eq!(heights, vec![12.0; 8]);

        scheduler.tick_at(1.0 / 60.0, &mut target).unwrap();
        for t in scheduler.context.scene.decorative_instances() {
            assert!((t.position.y - 11.997).abs() < 1e-5);
        }
    }

    #[test]
    fn test_panel_edits_show_up_in_the_same_draw() {
        let (_sender, pending) = PendingFont::channel("box.json");
        let mut scheduler = scheduler_with(pending);
        let mut target = RecordingTarget::default();

        target.edits.push((AMBIENT_LABEL, 3.7));
        target.edits.push((POINT_LABEL, 2.449));
        scheduler.tick_at(0.0, &mut target).unwrap();
        scheduler.tick_at(0.1, &mut target).unwrap();

        let first = target.draws[0];
        assert_eq!(first.ambient, 2.0);
        assert!((first.point - 2.4).abs() < 1e-5);
        assert_eq!(target.draws[1].ambient, 2.0);
    }

    #[test]
    fn test_resize_before_load() {
        let (_sender, pending) = PendingFont::channel("box.json");
        let mut scheduler = scheduler_with(pending);
        let mut target = RecordingTarget::default();

        scheduler.resize(Viewport::new(800.0, 600.0, 1.0, 2.0), &mut target);
        scheduler.tick_at(0.0, &mut target).unwrap();

        assert_eq!(target.resizes, vec![(800, 600)]);
        assert!((target.draws[0].aspect - 4.0 / 3.0).abs() < 1e-6);
        assert_eq!(target.draws[0].decorative, 0);
        assert!(scheduler.context.is_loading());
    }

    #[test]
    fn test_resize_caps_pixel_ratio_and_skips_empty() {
        let (_sender, pending) = PendingFont::channel("box.json");
        let mut scheduler = scheduler_with(pending);
        let mut target = RecordingTarget::default();

        scheduler.resize(Viewport::new(800.0, 600.0, 3.0, 2.0), &mut target);
        scheduler.resize(Viewport::new(0.0, 600.0, 1.0, 2.0), &mut target);

        assert_eq!(target.resizes, vec![(1600, 1200)]);
        assert_eq!(scheduler.context.viewport.width, 0.0);
        assert!((scheduler.context.scene.camera_manager.camera.aspect - 4.0 / 3.0).abs() < 1e-6);
    }
}
