//! Scene lights
//!
//! Colors are linear RGB in `0.0..=1.0`. Intensities are unbounded here;
//! the debug panel is what limits them to its slider ranges.

use cgmath::Vector3;

/// Converts a `0xRRGGBB` color into RGB components
pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Uniform light added to every surface regardless of orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for AmbientLight {
    /// White, switched off until raised from the debug panel
    fn default() -> Self {
        Self {
            color: rgb_from_hex(0xffffff),
            intensity: 0.0,
        }
    }
}

impl AmbientLight {
    /// Color premultiplied by intensity
    pub fn radiance(&self) -> [f32; 3] {
        self.color.map(|c| c * self.intensity)
    }
}

/// Omnidirectional light with a finite range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: [f32; 3],
    pub intensity: f32,
    /// Range after which the light contributes nothing, 0 for unlimited
    pub distance: f32,
    /// Exponent of the inverse distance falloff
    pub decay: f32,
    pub position: Vector3<f32>,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            color: rgb_from_hex(0xff0000),
            intensity: 1.5,
            distance: 10.0,
            decay: 3.0,
            position: Vector3::new(1.0, -0.5, 1.0),
        }
    }
}

impl PointLight {
    pub fn radiance(&self) -> [f32; 3] {
        self.color.map(|c| c * self.intensity)
    }

    /// Light reaching a point `d` units away, relative to full intensity
    ///
    /// Mirrors the falloff evaluated in the fragment shader.
    pub fn attenuation(&self, d: f32) -> f32 {
        let falloff = 1.0 / d.powf(self.decay).max(0.01);
        if self.distance > 0.0 {
            let ratio = (d / self.distance).powi(4);
            let window = (1.0 - ratio).clamp(0.0, 1.0);
            falloff * window * window
        } else {
            falloff
        }
    }
}
