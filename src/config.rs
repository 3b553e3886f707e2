//! Scene configuration
//!
//! Every tunable number of the scene lives here as a named constant, and
//! [`SceneConfig`] bundles them so tests and the app can tweak a copy instead
//! of touching literals scattered through the code.

use std::{f32::consts::PI, ops::RangeInclusive, path::PathBuf};

use crate::animation::InstanceLifecycle;

/// Units per frame each decorative instance falls.
pub const FALL_SPEED: f32 = 0.003;
/// Radians per frame subtracted from rotation.x and rotation.y.
pub const ROTATION_SPEED: f32 = 0.005;
/// Number of decorative instances spawned once the font resolves.
pub const INSTANCE_COUNT: usize = 100;
/// Slider range of the ambient light intensity.
pub const AMBIENT_RANGE: RangeInclusive<f32> = 0.0..=2.0;
/// Slider range of the point light intensity.
pub const POINT_RANGE: RangeInclusive<f32> = 0.0..=5.0;
/// Slider step shared by both light intensity fields.
pub const INTENSITY_STEP: f32 = 0.1;
/// Upper bound applied to the device pixel ratio.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Font path relative to the asset root.
pub const FONT_PATH: &str = "fonts/helvetiker_regular.typeface.json";
/// Environment variable overriding the asset root.
pub const ASSETS_ENV: &str = "TORUS_RAIN_ASSETS";

/// Parameters of the extruded text mesh
#[derive(Debug, Clone, PartialEq)]
pub struct TextConfig {
    pub content: String,
    pub size: f32,
    pub depth: f32,
    pub curve_segments: u32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_offset: f32,
    pub bevel_segments: u32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            content: "Work in Progress".to_string(),
            size: 0.5,
            depth: 0.2,
            curve_segments: 5,
            bevel_enabled: true,
            bevel_thickness: 0.03,
            bevel_size: 0.02,
            bevel_offset: 0.0,
            bevel_segments: 4,
        }
    }
}

/// Parameters of the shared torus mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorusConfig {
    pub radius: f32,
    pub tube: f32,
    pub radial_segments: u32,
    pub tubular_segments: u32,
}

impl Default for TorusConfig {
    fn default() -> Self {
        Self {
            radius: 0.3,
            tube: 0.2,
            radial_segments: 20,
            tubular_segments: 48,
        }
    }
}

/// Volume decorative instances are spawned in
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnVolume {
    pub x: RangeInclusive<f32>,
    pub y: RangeInclusive<f32>,
    pub z: RangeInclusive<f32>,
    /// Upper bound for rotation.x and rotation.y.
    pub max_rotation: f32,
    /// Upper bound for the uniform scale.
    pub max_scale: f32,
}

impl Default for SpawnVolume {
    fn default() -> Self {
        Self {
            x: -5.0..=5.0,
            y: 0.0..=10.0,
            z: -5.0..=5.0,
            max_rotation: PI,
            max_scale: 1.0,
        }
    }
}

/// Everything the scene needs to boot
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub window_title: String,
    pub window_size: (u32, u32),
    pub asset_root: PathBuf,
    pub font_path: PathBuf,

    pub fall_speed: f32,
    pub rotation_speed: f32,
    pub instance_count: usize,
    pub lifecycle: InstanceLifecycle,
    pub spawn: SpawnVolume,

    pub ambient_range: RangeInclusive<f32>,
    pub point_range: RangeInclusive<f32>,
    pub intensity_step: f32,
    pub max_pixel_ratio: f64,

    pub text: TextConfig,
    pub torus: TorusConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window_title: "torus-rain".to_string(),
            window_size: (1200, 800),
            asset_root: PathBuf::from("assets"),
            font_path: PathBuf::from(FONT_PATH),
            fall_speed: FALL_SPEED,
            rotation_speed: ROTATION_SPEED,
            instance_count: INSTANCE_COUNT,
            lifecycle: InstanceLifecycle::Unbounded,
            spawn: SpawnVolume::default(),
            ambient_range: AMBIENT_RANGE,
            point_range: POINT_RANGE,
            intensity_step: INTENSITY_STEP,
            max_pixel_ratio: MAX_PIXEL_RATIO,
            text: TextConfig::default(),
            torus: TorusConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Default configuration with the asset root taken from `TORUS_RAIN_ASSETS` when set
    pub fn from_env() -> Self {
        let config = Self::default();
        match std::env::var_os(ASSETS_ENV) {
            Some(root) => config.with_asset_root(root),
            None => config,
        }
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = path.into();
        self
    }

    pub fn with_instance_count(mut self, count: usize) -> Self {
        self.instance_count = count;
        self
    }

    pub fn with_lifecycle(mut self, lifecycle: InstanceLifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn with_text(mut self, content: &str) -> Self {
        self.text.content = content.to_string();
        self
    }

    /// Full path of the font resource
    ///
    /// Absolute font paths are used as-is.
    pub fn resolved_font_path(&self) -> PathBuf {
        if self.font_path.is_absolute() {
            self.font_path.clone()
        } else {
            self.asset_root.join(&self.font_path)
        }
    }
}
