//! Drawable area of the window
//!
//! Sizes are kept in logical units; the backing surface is sized by the
//! device pixel ratio, capped so high-density displays do not quadruple the
//! fragment work.

use winit::dpi::PhysicalSize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Logical width
    pub width: f64,
    /// Logical height
    pub height: f64,
    /// Device pixel ratio after capping
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64, max_pixel_ratio: f64) -> Self {
        let pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(max_pixel_ratio)
        } else {
            1.0
        };
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            pixel_ratio,
        }
    }

    /// Viewport from a window's physical size and scale factor
    pub fn from_physical(size: PhysicalSize<u32>, scale_factor: f64, max_pixel_ratio: f64) -> Self {
        let scale = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        Self::new(
            size.width as f64 / scale,
            size.height as f64 / scale,
            scale,
            max_pixel_ratio,
        )
    }

    /// Width over height; 1.0 for a collapsed viewport
    pub fn aspect(&self) -> f32 {
        if self.width <= 0.0 || self.height <= 0.0 {
            1.0
        } else {
            (self.width / self.height) as f32
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width < 1.0 || self.height < 1.0
    }

    /// Backing surface size in pixels, never below 1x1
    pub fn surface_size(&self) -> (u32, u32) {
        let scale = |v: f64| ((v * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_to_800_by_600() {
        let viewport = Viewport::new(800.0, 600.0, 1.0, 2.0);
        assert!((viewport.aspect() - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(viewport.surface_size(), (800, 600));
    }

    #[test]
    fn test_pixel_ratio_is_capped() {
        let viewport = Viewport::new(800.0, 600.0, 3.0, 2.0);
        assert_eq!(viewport.pixel_ratio, 2.0);
        assert_eq!(viewport.surface_size(), (1600, 1200));

        let viewport = Viewport::new(800.0, 600.0, 1.5, 2.0);
        assert_eq!(viewport.surface_size(), (1200, 900));
    }

    #[test]
    fn test_from_physical_size() {
        let viewport = Viewport::from_physical(PhysicalSize::new(2400, 1800), 3.0, 2.0);
        assert_eq!(viewport.width, 800.0);
        assert_eq!(viewport.height, 600.0);
        assert_eq!(viewport.surface_size(), (1600, 1200));
    }

    #[test]
    fn test_collapsed_viewport() {
        let viewport = Viewport::new(0.0, 0.0, 1.0, 2.0);
        assert!(viewport.is_empty());
        assert_eq!(viewport.aspect(), 1.0);
        assert_eq!(viewport.surface_size(), (1, 1));
    }
}
