//! Hands a finished data URI to the browser as a file download.

use newsplate::error::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlAnchorElement;

/// Clicks a transient `download` anchor for the data URI. The anchor only
/// exists for the duration of the click.
pub(crate) fn trigger(data_url: &str, file_name: &str) -> ZResult<()> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| error_once!("Download.NoDocument"))?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(map_err("Download.CreateAnchor"))?
        .dyn_into()
        .map_err(map_into_err::<JsValue, _>("Download.AnchorType"))?;
    anchor.set_href(data_url);
    anchor.set_download(file_name);

    let body = document
        .body()
        .ok_or_else(|| error_once!("Download.NoBody"))?;
    body.append_child(&anchor).context("Download.Attach")?;
    anchor.click();
    anchor.remove();
    Ok(())
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod tests {
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn anchor_does_not_outlive_the_click() {
        super::trigger("data:text/plain,newsplate", "note.txt").unwrap();

        let document = web_sys::window().unwrap().document().unwrap();
        assert!(document
            .query_selector(r#"a[download="note.txt"]"#)
            .unwrap()
            .is_none());
    }
}
