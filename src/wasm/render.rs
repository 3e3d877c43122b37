use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, HtmlCanvasElement, HtmlElement};

use crate::config::ScopeConfig;
use crate::error::{Error, Result};
use crate::geometry::ViewportGeometry;
use crate::scope::{FrameHandle, FrameScheduler, Oscilloscope};

use super::canvas::CanvasSurface;
use super::{loader, visibility};

type FrameClosure = Closure<dyn FnMut(f64)>;

/// `requestAnimationFrame` scheduler.
///
/// The closure cell is filled once the scope exists, since the closure
/// itself has to call back into the scope.
pub struct RafScheduler {
    callback: Rc<RefCell<Option<FrameClosure>>>,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let callback = self.callback.borrow();
        let callback = callback.as_ref()?;
        window()?
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()
            .map(FrameHandle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(w) = window() {
            let _ = w.cancel_animation_frame(handle.0);
        }
    }
}

type Scope = Oscilloscope<CanvasSurface, RafScheduler>;

/// Wires the scope to the page: resize listener now, then the asset fetch,
/// then the visibility observer once the data is in.
pub fn mount(config: ScopeConfig) -> Result<()> {
    let window = window().ok_or_else(|| Error::Js("no window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| Error::Js("no document".into()))?;

    let container: HtmlElement = document
        .get_element_by_id(config.container_id)
        .ok_or_else(|| Error::MissingElement(config.container_id.into()))?
        .dyn_into()
        .map_err(|_| Error::MissingElement(config.container_id.into()))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(config.canvas_id)
        .ok_or_else(|| Error::MissingElement(config.canvas_id.into()))?
        .dyn_into()
        .map_err(|_| Error::MissingElement(config.canvas_id.into()))?;

    let surface = CanvasSurface::new(canvas)?;
    let callback: Rc<RefCell<Option<FrameClosure>>> = Rc::new(RefCell::new(None));
    let scheduler = RafScheduler {
        callback: callback.clone(),
    };
    let asset_url = config.asset_url;
    let scope: Rc<RefCell<Scope>> =
        Rc::new(RefCell::new(Oscilloscope::new(config, surface, scheduler)));

    // Animation frame callback
    *callback.borrow_mut() = Some(Closure::wrap(Box::new({
        let scope = scope.clone();
        move |timestamp: f64| {
            scope.borrow_mut().frame(timestamp);
        }
    }) as Box<dyn FnMut(f64)>));

    // Resize canvas to follow its container
    let resize_closure = {
        let scope = scope.clone();
        let container = container.clone();
        Closure::wrap(Box::new(move || {
            scope.borrow_mut().resize(measure(&container));
        }) as Box<dyn FnMut()>)
    };
    window
        .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())
        .map_err(loader::js_error)?;
    resize_closure.forget();

    wasm_bindgen_futures::spawn_local(async move {
        let dataset = match loader::fetch_dataset(asset_url).await {
            Ok(dataset) => dataset,
            Err(err) => {
                log::warn!("waveform unavailable, scope stays blank: {err}");
                return;
            }
        };

        let threshold = {
            let mut s = scope.borrow_mut();
            s.set_dataset(dataset);
            s.resize(measure(&container));
            s.config().visibility_threshold
        };

        let observed = visibility::observe(&container, threshold, {
            let scope = scope.clone();
            move |ratio, intersecting| {
                scope.borrow_mut().observe_visibility(ratio, intersecting);
            }
        });
        if let Err(err) = observed {
            log::warn!("visibility observer unavailable: {err}");
        }
    });

    Ok(())
}

/// Current CSS box of `container` and the display density.
fn measure(container: &HtmlElement) -> ViewportGeometry {
    let rect = container.get_bounding_client_rect();
    let dpr = window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    ViewportGeometry::new(rect.width(), rect.height(), dpr)
}
