//! The drawing seam between the scope and whatever it paints on.

use crate::config::TraceStyle;

/// Physical pixel dimensions of a surface's backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackingSize {
    pub width: u32,
    pub height: u32,
}

/// Minimal 2D path API the render loop needs.
///
/// Coordinates passed to the path operations are CSS pixels; the surface
/// maps them to its backing store through the scale set by [`set_scale`].
///
/// [`set_scale`]: DrawingSurface::set_scale
pub trait DrawingSurface {
    fn backing_size(&self) -> BackingSize;
    /// Reallocates the backing store. Implementations may lose their
    /// contents and transform when this is called.
    fn set_backing_size(&mut self, size: BackingSize);
    fn set_css_size(&mut self, width: f64, height: f64);
    /// Sets an absolute uniform scale from CSS to backing pixels.
    fn set_scale(&mut self, scale: f64);

    /// Transparent clear of the given CSS-pixel rectangle at the origin.
    fn clear(&mut self, width: f64, height: f64);
    fn set_stroke(&mut self, style: &TraceStyle);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self);
}

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    SetBackingSize(BackingSize),
    SetCssSize { width: f64, height: f64 },
    SetScale(f64),
    Clear { width: f64, height: f64 },
    SetStroke(TraceStyle),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Stroke,
}

/// Headless surface that records every call, for running the scope
/// without a browser.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    backing: BackingSize,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands back everything recorded so far and starts a fresh log.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of `stroke` calls, i.e. traces drawn.
    pub fn strokes(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Stroke))
            .count()
    }
}

impl DrawingSurface for RecordingSurface {
    fn backing_size(&self) -> BackingSize {
        self.backing
    }

    fn set_backing_size(&mut self, size: BackingSize) {
        self.backing = size;
        self.commands.push(DrawCommand::SetBackingSize(size));
    }

    fn set_css_size(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::SetCssSize { width, height });
    }

    fn set_scale(&mut self, scale: f64) {
        self.commands.push(DrawCommand::SetScale(scale));
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn set_stroke(&mut self, style: &TraceStyle) {
        self.commands.push(DrawCommand::SetStroke(style.clone()));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(x, y));
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }
}
