//! Viewport sizing: CSS box plus pixel density to backing-store resolution.

use crate::surface::{BackingSize, DrawingSurface};

/// Size of the drawing area in CSS pixels and the display density it is
/// shown at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    pub width_css: f64,
    pub height_css: f64,
    pub device_pixel_ratio: f64,
}

impl ViewportGeometry {
    /// Negative or non-finite sizes collapse to zero; an unusable density
    /// falls back to 1.
    pub fn new(width_css: f64, height_css: f64, device_pixel_ratio: f64) -> Self {
        let sanitize = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        let device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            width_css: sanitize(width_css),
            height_css: sanitize(height_css),
            device_pixel_ratio,
        }
    }

    /// `css × dpr` per axis, truncated the way canvas dimensions are.
    pub fn backing_size(&self) -> BackingSize {
        let scale = |v: f64| (v * self.device_pixel_ratio).floor().min(u32::MAX as f64) as u32;
        BackingSize {
            width: scale(self.width_css),
            height: scale(self.height_css),
        }
    }

    /// Nothing can be drawn into a zero-area viewport.
    pub fn is_degenerate(&self) -> bool {
        self.width_css <= 0.0 || self.height_css <= 0.0
    }
}

impl Default for ViewportGeometry {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// Sizes `surface` for `geometry` so later drawing happens in CSS pixels.
///
/// The backing store is only reallocated when its size actually changes,
/// which keeps repeated calls with the same geometry from blanking the frame.
pub fn apply<S: DrawingSurface + ?Sized>(surface: &mut S, geometry: &ViewportGeometry) {
    let target = geometry.backing_size();
    if surface.backing_size() != target {
        surface.set_backing_size(target);
    }
    surface.set_css_size(geometry.width_css, geometry.height_css);
    surface.set_scale(geometry.device_pixel_ratio);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    #[test]
    fn backing_scales_with_density() {
        let g = ViewportGeometry::new(400.0, 100.0, 2.0);
        assert_eq!(g.backing_size(), BackingSize { width: 800, height: 200 });
    }

    #[test]
    fn fractional_sizes_truncate() {
        let g = ViewportGeometry::new(333.5, 120.25, 1.5);
        assert_eq!(g.backing_size(), BackingSize { width: 500, height: 180 });
    }

    #[test]
    fn bad_density_falls_back_to_one() {
        for dpr in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let g = ViewportGeometry::new(10.0, 20.0, dpr);
            assert_eq!(g.device_pixel_ratio, 1.0);
            assert_eq!(g.backing_size(), BackingSize { width: 10, height: 20 });
        }
    }

    #[test]
    fn zero_area_is_degenerate() {
        assert!(ViewportGeometry::new(0.0, 100.0, 1.0).is_degenerate());
        assert!(ViewportGeometry::new(f64::NAN, 100.0, 1.0).is_degenerate());
        assert!(!ViewportGeometry::new(1.0, 1.0, 1.0).is_degenerate());
    }

    #[test]
    fn apply_sets_backing_css_and_scale() {
        let mut surface = RecordingSurface::new();
        apply(&mut surface, &ViewportGeometry::new(800.0, 200.0, 1.0));
        assert_eq!(
            surface.take_commands(),
            vec![
                DrawCommand::SetBackingSize(BackingSize { width: 800, height: 200 }),
                DrawCommand::SetCssSize { width: 800.0, height: 200.0 },
                DrawCommand::SetScale(1.0),
            ]
        );
    }

    #[test]
    fn apply_is_idempotent() {
        let mut surface = RecordingSurface::new();
        let g = ViewportGeometry::new(640.0, 360.0, 1.25);
        apply(&mut surface, &g);
        surface.take_commands();
        apply(&mut surface, &g);
        let again = surface.take_commands();
        assert!(!again
            .iter()
            .any(|c| matches!(c, DrawCommand::SetBackingSize(_))));
        assert_eq!(surface.backing_size(), g.backing_size());
    }
}
