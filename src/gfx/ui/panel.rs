//! Live light controls
//!
//! Each [`NumericBinding`] ties a labelled slider to one light attribute.
//! Values written through a binding are clamped to its range and snapped to
//! its step before they reach the light.

use std::ops::RangeInclusive;

use imgui::{Condition, Ui};

use crate::{config::SceneConfig, gfx::scene::Scene};

pub const PANEL_TITLE: &str = "Debug";
pub const AMBIENT_LABEL: &str = "Ambient Light";
pub const POINT_LABEL: &str = "Point Light Intensity";

const PANEL_MARGIN: f32 = 10.0;

/// Light attribute a slider writes into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightParameter {
    AmbientIntensity,
    PointIntensity,
}

impl LightParameter {
    fn read(self, scene: &Scene) -> f32 {
        match self {
            Self::AmbientIntensity => scene.ambient_light.intensity,
            Self::PointIntensity => scene.point_light.intensity,
        }
    }

    fn write(self, scene: &mut Scene, value: f32) {
        match self {
            Self::AmbientIntensity => scene.ambient_light.intensity = value,
            Self::PointIntensity => scene.point_light.intensity = value,
        }
    }
}

/// A labelled numeric field with a declared range and step
#[derive(Debug, Clone, PartialEq)]
pub struct NumericBinding {
    pub label: String,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub target: LightParameter,
}

impl NumericBinding {
    pub fn new(label: &str, range: RangeInclusive<f32>, step: f32, target: LightParameter) -> Self {
        Self {
            label: label.to_string(),
            min: *range.start(),
            max: *range.end(),
            step,
            target,
        }
    }

    /// Snaps `value` to the step grid, then clamps it into `[min, max]`
    pub fn constrain(&self, value: f32) -> f32 {
        let snapped = if self.step > 0.0 {
            (value / self.step).round() * self.step
        } else {
            value
        };
        snapped.clamp(self.min, self.max)
    }

    pub fn read(&self, scene: &Scene) -> f32 {
        self.target.read(scene)
    }

    /// Writes the constrained value into the light and returns it
    pub fn apply(&self, scene: &mut Scene, value: f32) -> f32 {
        let value = self.constrain(value);
        self.target.write(scene, value);
        value
    }
}

/// Overlay window holding the light sliders
#[derive(Debug, Clone)]
pub struct DebugPanel {
    title: String,
    bindings: Vec<NumericBinding>,
}

impl DebugPanel {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            bindings: Vec::new(),
        }
    }

    pub fn add(mut self, binding: NumericBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Panel with the ambient and point light intensity sliders
    pub fn light_controls(config: &SceneConfig) -> Self {
        Self::new(PANEL_TITLE)
            .add(NumericBinding::new(
                AMBIENT_LABEL,
                config.ambient_range.clone(),
                config.intensity_step,
                LightParameter::AmbientIntensity,
            ))
            .add(NumericBinding::new(
                POINT_LABEL,
                config.point_range.clone(),
                config.intensity_step,
                LightParameter::PointIntensity,
            ))
    }

    pub fn bindings(&self) -> &[NumericBinding] {
        &self.bindings
    }

    pub fn binding(&self, label: &str) -> Option<&NumericBinding> {
        self.bindings.iter().find(|b| b.label == label)
    }

    /// Sets a field by label as if the user had edited it
    ///
    /// # Returns
    /// The value stored in the light, or `None` for an unknown label
    pub fn set(&self, scene: &mut Scene, label: &str, value: f32) -> Option<f32> {
        self.binding(label).map(|b| b.apply(scene, value))
    }

    /// Draws the panel pinned to the top-right corner
    ///
    /// # Returns
    /// `true` if any light was edited this frame
    pub fn draw(&self, ui: &Ui, scene: &mut Scene) -> bool {
        let [display_width, _] = ui.io().display_size;
        let mut changed = false;

        ui.window(&self.title)
            .position([display_width - PANEL_MARGIN, PANEL_MARGIN], Condition::Always)
            .position_pivot([1.0, 0.0])
            .always_auto_resize(true)
            .collapsible(true)
            .build(|| {
                for binding in &self.bindings {
                    let mut value = binding.read(scene);
                    if ui
                        .slider_config(&binding.label, binding.min, binding.max)
                        .display_format("%.1f")
                        .build(&mut value)
                    {
                        binding.apply(scene, value);
                        changed = true;
                    }
                }
            });

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::CameraManager;

    fn scene() -> Scene {
        Scene::new(CameraManager::scene_default(1.5))
    }

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{} != {}", a, b);
    }

    #[test]
    fn test_light_controls_declare_ranges() {
        let panel = DebugPanel::light_controls(&SceneConfig::default());
        assert_eq!(panel.bindings().len(), 2);

        let ambient = panel.binding(AMBIENT_LABEL).unwrap();
        assert_eq!((ambient.min, ambient.max, ambient.step), (0.0, 2.0, 0.1));
        assert_eq!(ambient.target, LightParameter::AmbientIntensity);

        let point = panel.binding(POINT_LABEL).unwrap();
        assert_eq!((point.min, point.max, point.step), (0.0, 5.0, 0.1));
        assert!(panel.binding("Missing").is_none());
    }

    #[test]
    fn test_constrain_clamps_and_quantizes() {
        let binding = NumericBinding::new("x", 0.0..=2.0, 0.1, LightParameter::AmbientIntensity);
        assert_close(binding.constrain(0.74), 0.7);
        assert_close(binding.constrain(0.76), 0.8);
        assert_eq!(binding.constrain(-3.0), 0.0);
        assert_eq!(binding.constrain(7.5), 2.0);
    }

    #[test]
    fn test_edits_reach_the_lights() {
        let panel = DebugPanel::light_controls(&SceneConfig::default());
        let mut scene = scene();
        assert_eq!(panel.binding(AMBIENT_LABEL).unwrap().read(&scene), 0.0);
        assert_eq!(panel.binding(POINT_LABEL).unwrap().read(&scene), 1.5);

        let stored = panel.set(&mut scene, AMBIENT_LABEL, 1.234).unwrap();
        assert_close(stored, 1.2);
        assert_close(scene.ambient_light.intensity, 1.2);

        panel.set(&mut scene, POINT_LABEL, 9.0);
        assert_eq!(scene.point_light.intensity, 5.0);

        assert_eq!(panel.set(&mut scene, "Missing", 1.0), None);
    }

    #[test]
    fn test_draw_headless_frame_keeps_values() {
        let panel = DebugPanel::light_controls(&SceneConfig::default());
        let mut scene = scene();

        let mut context = imgui::Context::create();
        context.set_ini_filename(None);
        context.io_mut().display_size = [800.0, 600.0];
        context.fonts().build_rgba32_texture();

        let ui = context.new_frame();
        let changed = panel.draw(ui, &mut scene);
        context.render();

        assert!(!changed);
        assert_eq!(scene.ambient_light.intensity, 0.0);
        assert_eq!(scene.point_light.intensity, 1.5);
    }
}
