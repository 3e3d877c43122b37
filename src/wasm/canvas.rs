use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::TraceStyle;
use crate::error::{Error, Result};
use crate::surface::{BackingSize, DrawingSurface};

use super::loader::js_error;

/// `<canvas>` with its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(js_error)?
            .ok_or_else(|| Error::Js("2d context not supported".into()))?
            .dyn_into()
            .map_err(js_error)?;
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl DrawingSurface for CanvasSurface {
    fn backing_size(&self) -> BackingSize {
        BackingSize {
            width: self.canvas.width(),
            height: self.canvas.height(),
        }
    }

    fn set_backing_size(&mut self, size: BackingSize) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }

    fn set_css_size(&mut self, width: f64, height: f64) {
        let style = self.canvas.style();
        for (name, px) in [("width", width), ("height", height)] {
            if let Err(err) = style.set_property(name, &format!("{px}px")) {
                log::debug!("canvas style {name} not set: {err:?}");
            }
        }
    }

    fn set_scale(&mut self, scale: f64) {
        if let Err(err) = self.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0) {
            log::debug!("canvas transform not set: {err:?}");
        }
    }

    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn set_stroke(&mut self, style: &TraceStyle) {
        self.ctx.set_stroke_style_str(style.color);
        self.ctx.set_line_width(style.line_width);
        self.ctx.set_line_join("round");
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }
}
