//! Drawable size tracking

/// Device pixel ratios above this are clamped
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Current drawable size in physical pixels plus the device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: clamp_pixel_ratio(pixel_ratio),
        }
    }

    /// Width over height; 1.0 for a degenerate (minimized) surface
    pub fn aspect(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `vec4(width, height, pixel_ratio, aspect)` for the shading program
    pub fn resolution(&self) -> [f32; 4] {
        [
            self.width as f32,
            self.height as f32,
            self.pixel_ratio as f32,
            self.aspect(),
        ]
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720, 1.0)
    }
}

fn clamp_pixel_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_clamped() {
        assert_eq!(Viewport::new(100, 100, 3.0).pixel_ratio, 2.0);
        assert_eq!(Viewport::new(100, 100, 1.5).pixel_ratio, 1.5);
        assert_eq!(Viewport::new(100, 100, f64::NAN).pixel_ratio, 1.0);
    }

    #[test]
    fn degenerate_aspect() {
        let vp = Viewport::new(0, 600, 1.0);
        assert!(vp.is_degenerate());
        assert_eq!(vp.aspect(), 1.0);
    }

    #[test]
    fn resolution_layout() {
        let vp = Viewport::new(1600, 800, 2.0);
        assert_eq!(vp.resolution(), [1600.0, 800.0, 2.0, 2.0]);
    }
}
