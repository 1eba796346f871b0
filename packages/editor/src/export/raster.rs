//! Adapter over the page-provided `htmlToImage` rasterizer.
//!
//! The library is not linked in; the page loads it as a plain script and the
//! adapter looks it up on `window` at call time. Everything here is Reflect
//! based so a missing or misshaped library degrades into an editor error
//! instead of a panic.

use js_sys::{Function, Object, Promise, Reflect};
use newsplate::error::prelude::*;
use newsplate::CardTemplate;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlElement;

const MISSING_RASTERIZER: &str =
    "html-to-image not found. Make sure ./vendor/html-to-image.js is loaded.";

/// The `htmlToImage` global installed by the page, if any.
pub(crate) fn library() -> Option<Object> {
    let window = web_sys::window()?;
    let library = Reflect::get(&window, &JsValue::from_str("htmlToImage")).ok()?;
    if library.is_undefined() || library.is_null() {
        return None;
    }
    library.dyn_into().ok()
}

pub(crate) fn require_rasterizer() -> ZResult<Object> {
    library().ok_or_else(|| error_once!("Export.MissingRasterizer", hint: MISSING_RASTERIZER))
}

/// Waits for `document.fonts.ready` where the engine exposes it. Without
/// this the headline may rasterize with fallback glyphs. A missing font
/// API or a failed settle must not block the export.
pub(crate) async fn wait_for_fonts() {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    let Ok(fonts) = Reflect::get(&document, &JsValue::from_str("fonts")) else {
        return;
    };
    if fonts.is_undefined() || fonts.is_null() {
        return;
    }
    let Ok(ready) = Reflect::get(&fonts, &JsValue::from_str("ready")) else {
        return;
    };
    let Ok(ready) = ready.dyn_into::<Promise>() else {
        return;
    };
    let _ = JsFuture::from(ready).await;
}

/// Rasterizes the node into a PNG data URI at the template's pixel ratio.
pub(crate) async fn rasterize(node: &HtmlElement, render: &CardTemplate) -> ZResult<String> {
    let library = require_rasterizer()?;
    let to_png: Function = Reflect::get(&library, &JsValue::from_str("toPng"))
        .map_err(map_err("Export.RasterizerLookup"))?
        .dyn_into()
        .map_err(map_into_err::<JsValue, _>("Export.RasterizerNotCallable"))?;

    let options = Object::new();
    // cacheBust defeats stale CORS-tainted cache entries inside the library
    Reflect::set(&options, &JsValue::from_str("cacheBust"), &JsValue::TRUE)
        .map_err(map_err("Export.RasterOptions"))?;
    Reflect::set(
        &options,
        &JsValue::from_str("pixelRatio"),
        &JsValue::from_f64(render.pixel_ratio as f64),
    )
    .map_err(map_err("Export.RasterOptions"))?;
    Reflect::set(
        &options,
        &JsValue::from_str("backgroundColor"),
        &JsValue::from_str(&render.background_color),
    )
    .map_err(map_err("Export.RasterOptions"))?;

    let pending: Promise = to_png
        .call2(&library, node, &options)
        .map_err(map_err("Export.Rasterize"))?
        .dyn_into()
        .map_err(map_into_err::<JsValue, _>("Export.RasterizerNoPromise"))?;
    let data_url = JsFuture::from(pending)
        .await
        .map_err(map_err("Export.Rasterize"))?;
    data_url
        .as_string()
        .ok_or_else(|| error_once!("Export.RasterizerNoDataUrl"))
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod tests {
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn missing_library_reads_as_none() {
        let window = web_sys::window().unwrap();
        js_sys::Reflect::delete_property(window.as_ref(), &"htmlToImage".into()).unwrap();
        assert!(super::library().is_none());

        let err = super::require_rasterizer().unwrap_err();
        assert!(err.to_string().contains("html-to-image not found"));
        assert!(err.to_string().contains("./vendor/html-to-image.js"));
    }

    #[wasm_bindgen_test]
    async fn font_wait_is_tolerant() {
        // settles whether or not the engine exposes document.fonts
        super::wait_for_fonts().await;
    }
}
