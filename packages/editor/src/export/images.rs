//! Waits for every image under the clone to settle before rasterization.
//!
//! The wait itself tolerates load errors, otherwise one broken source would
//! wedge the export forever. Brokenness is detected afterwards by re-checking
//! the natural size of every image, including the ones that looked complete
//! up front.

use js_sys::Promise;
use newsplate::error::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlElement, HtmlImageElement};

pub(crate) async fn wait_for_images(scope: &HtmlElement) -> ZResult<()> {
    let nodes = scope
        .query_selector_all("img")
        .map_err(map_err("Export.QueryImages"))?;

    let mut images = Vec::with_capacity(nodes.length() as usize);
    let mut pending = Vec::new();
    for idx in 0..nodes.length() {
        let Some(node) = nodes.get(idx) else {
            continue;
        };
        let image: HtmlImageElement = node
            .dyn_into()
            .map_err(map_into_err::<JsValue, _>("Export.NotAnImage"))?;
        if !(image.complete() && image.natural_width() > 0) {
            pending.push(settled(&image));
        }
        images.push(image);
    }

    if !pending.is_empty() {
        JsFuture::from(Promise::all(&js_sys::Array::from_iter(pending).into()))
            .await
            .map_err(map_err("Export.AwaitImages"))?;
    }

    let broken: Vec<String> = images
        .iter()
        .filter(|image| image.natural_width() == 0)
        .map(|image| image.get_attribute("src").unwrap_or_default())
        .collect();
    if !broken.is_empty() {
        return Err(format!("Some images failed to load:\n{}", broken.join("\n")))
            .context("Export.ImageDecode");
    }
    Ok(())
}

/// A promise that resolves once the image stops loading, successfully or not.
fn settled(image: &HtmlImageElement) -> Promise {
    Promise::new(&mut |complete: js_sys::Function, _reject: js_sys::Function| {
        let complete2 = complete.clone();

        let a = Closure::<dyn Fn()>::new(move || {
            complete.call0(&complete).unwrap();
        });
        image.set_onload(Some(a.as_ref().unchecked_ref()));
        a.forget();

        let a = Closure::<dyn Fn(JsValue)>::new(move |_event: JsValue| {
            complete2.call0(&complete2).unwrap();
        });
        image.set_onerror(Some(a.as_ref().unchecked_ref()));
        a.forget();
    })
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod tests {
    use serde::Serialize;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;
    use web_sys::{HtmlElement, HtmlImageElement};
    use web_time::Instant;

    use super::super::tests::GOOD_PNG;

    const BAD_PNG: &str = "data:image/png;base64,not-a-png";

    fn scope_with_images(suffix: &str, srcs: &[&str]) -> HtmlElement {
        let document = web_sys::window().unwrap().document().unwrap();
        let scope: HtmlElement = document
            .create_element("div")
            .unwrap()
            .dyn_into()
            .unwrap();
        scope.set_id(&format!("image-scope{suffix}"));
        for (idx, src) in srcs.iter().enumerate() {
            let image: HtmlImageElement = document
                .create_element("img")
                .unwrap()
                .dyn_into()
                .unwrap();
            image.set_id(&format!("image{suffix}-{idx}"));
            image.set_src(src);
            scope.append_child(&image).unwrap();
        }
        document.body().unwrap().append_child(&scope).unwrap();
        scope
    }

    #[derive(Serialize)]
    struct WaitPoint {
        images: usize,
        time_used: String,
    }

    #[wasm_bindgen_test]
    async fn loadable_images_pass_the_wait() {
        let scope = scope_with_images("-ok", &[GOOD_PNG, GOOD_PNG]);
        let start = Instant::now();
        super::wait_for_images(&scope).await.unwrap();

        let point = WaitPoint {
            images: 2,
            time_used: format!("{:?}", start.elapsed()),
        };
        web_sys::console::log_2(
            &">>> newsplate_test_capture".into(),
            &serde_json::to_string(&point).unwrap().into(),
        );
    }

    #[wasm_bindgen_test]
    async fn empty_scope_passes_the_wait() {
        let scope = scope_with_images("-empty", &[]);
        super::wait_for_images(&scope).await.unwrap();
    }

    #[wasm_bindgen_test]
    async fn broken_images_are_listed_by_source() {
        let scope = scope_with_images("-bad", &[GOOD_PNG, BAD_PNG]);
        let err = super::wait_for_images(&scope).await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("Some images failed to load:"));
        assert!(message.contains("not-a-png"));
        assert!(!message.contains("iVBOR"));
    }
}
