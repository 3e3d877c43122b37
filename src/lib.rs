//! Scrolling two-channel oscilloscope for a web page.
//!
//! The pure core (dataset, geometry, windowing, visibility and the render
//! loop) builds on every target; the browser glue in [`wasm`] is only
//! compiled for `wasm32`.

pub mod config;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod scope;
pub mod surface;
pub mod visibility;
pub mod windowing;

pub use config::ScopeConfig;
pub use dataset::{Channel, WaveformDataset};
pub use error::{Error, Result};
pub use geometry::ViewportGeometry;
pub use scope::{FrameHandle, FrameOutcome, FrameScheduler, Oscilloscope, PlaybackState};
pub use surface::DrawingSurface;

// Only compile browser-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::config::ScopeConfig;

    pub mod canvas;
    pub mod loader;
    pub mod render;
    pub mod visibility;

    /// Page entry point. Never throws: any failure leaves the canvas blank
    /// and is reported on the console only.
    #[wasm_bindgen(start)]
    pub fn main() {
        console_error_panic_hook::set_once();
        let level = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
        let _ = console_log::init_with_level(level);

        let Some(window) = web_sys::window() else {
            return;
        };
        let width = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(crate::config::NARROW_BREAKPOINT);

        if let Err(err) = render::mount(ScopeConfig::for_viewport_width(width)) {
            log::warn!("oscilloscope disabled: {err}");
        }
    }
}
