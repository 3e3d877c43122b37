//! Start-up configuration for the scope.

use crate::dataset::Channel;

/// Viewports narrower than this (CSS px) get the thin, fast profile.
pub const NARROW_BREAKPOINT: f64 = 768.0;

/// Stroke colour and width of one trace, in CSS units.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStyle {
    pub color: &'static str,
    pub line_width: f64,
}

/// Vertical extent of a trace as fractions of the canvas height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub top: f64,
    pub bottom: f64,
}

impl Band {
    /// Resolves the band against a surface height, returning `(y_top, y_bottom)`.
    pub fn resolve(&self, height: f64) -> (f64, f64) {
        (height * self.top, height * self.bottom)
    }
}

/// Per-channel drawing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceConfig {
    pub style: TraceStyle,
    pub band: Band,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScopeConfig {
    pub container_id: &'static str,
    pub canvas_id: &'static str,
    pub asset_url: &'static str,
    /// Seconds of recording visible at once.
    pub window_seconds: f64,
    /// Recording seconds advanced per wall-clock second.
    pub playback_speed: f64,
    /// Intersection ratio at which the scope starts and stops.
    pub visibility_threshold: f64,
    pub channel_a: TraceConfig,
    pub channel_b: TraceConfig,
}

impl ScopeConfig {
    /// Picks the narrow or wide profile from the viewport width at start-up.
    pub fn for_viewport_width(width: f64) -> Self {
        let narrow = width < NARROW_BREAKPOINT;
        let (line_width, playback_speed) = if narrow { (1.0, 0.6) } else { (1.5, 0.4) };

        // Channel A sits low enough to overlap channel B in the middle band.
        Self {
            container_id: "ephys",
            canvas_id: "ephys-canvas",
            asset_url: "assets/ephys_loop.json",
            window_seconds: 20.0,
            playback_speed,
            visibility_threshold: 0.05,
            channel_a: TraceConfig {
                style: TraceStyle { color: "#CC6677", line_width },
                band: Band { top: 0.15, bottom: 0.70 },
            },
            channel_b: TraceConfig {
                style: TraceStyle { color: "#44AA99", line_width },
                band: Band { top: 0.30, bottom: 0.85 },
            },
        }
    }

    pub fn trace(&self, channel: Channel) -> &TraceConfig {
        match channel {
            Channel::A => &self.channel_a,
            Channel::B => &self.channel_b,
        }
    }
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self::for_viewport_width(NARROW_BREAKPOINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_viewport_is_thin_and_fast() {
        let cfg = ScopeConfig::for_viewport_width(375.0);
        assert_eq!(cfg.playback_speed, 0.6);
        assert_eq!(cfg.channel_a.style.line_width, 1.0);
        assert_eq!(cfg.channel_b.style.line_width, 1.0);
    }

    #[test]
    fn breakpoint_itself_is_wide() {
        let cfg = ScopeConfig::for_viewport_width(NARROW_BREAKPOINT);
        assert_eq!(cfg.playback_speed, 0.4);
        assert_eq!(cfg.channel_a.style.line_width, 1.5);
        assert_eq!(cfg, ScopeConfig::default());
    }

    #[test]
    fn bands_overlap_mid_canvas() {
        let cfg = ScopeConfig::default();
        let (a_top, a_bottom) = cfg.trace(Channel::A).band.resolve(200.0);
        let (b_top, b_bottom) = cfg.trace(Channel::B).band.resolve(200.0);
        for (got, want) in [(a_top, 30.0), (a_bottom, 140.0), (b_top, 60.0), (b_bottom, 170.0)] {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
        assert!(b_top < a_bottom);
    }
}
