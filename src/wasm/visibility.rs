use js_sys::Array;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::Result;

use super::loader::js_error;

/// Calls `on_change(ratio, is_intersecting)` whenever `target` crosses
/// `threshold`. The observer lives for the rest of the page.
pub fn observe(
    target: &Element,
    threshold: f64,
    mut on_change: impl FnMut(f64, bool) + 'static,
) -> Result<IntersectionObserver> {
    let callback = Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
        for entry in entries.iter() {
            if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                on_change(entry.intersection_ratio(), entry.is_intersecting());
            }
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
            .map_err(js_error)?;
    callback.forget();

    observer.observe(target);
    Ok(observer)
}
