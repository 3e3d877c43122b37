use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::dataset::WaveformDataset;
use crate::error::{Error, Result};

pub(crate) fn js_error(value: JsValue) -> Error {
    Error::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

/// Fetches and validates the waveform asset at `url`.
pub async fn fetch_dataset(url: &str) -> Result<WaveformDataset> {
    let window = web_sys::window().ok_or_else(|| Error::Js("no window".into()))?;

    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;
    if !response.ok() {
        return Err(Error::Status(response.status()));
    }

    let text = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .as_string()
        .ok_or_else(|| Error::Js("response body is not text".into()))?;

    WaveformDataset::from_json(&text)
}
