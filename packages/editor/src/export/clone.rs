//! Builds the offscreen export surface: a fixed-size host holding a deep
//! clone of the card, detached from the visible layout.

use newsplate::error::prelude::*;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement, HtmlImageElement};

use super::ExportTask;

/// Class name carried by the offscreen host while an export runs.
pub(crate) const HOST_CLASS: &str = "newsplate-export-host";

/// The offscreen host and the card clone inside it. Dropping the host
/// removes it from the document, on success and on failure alike.
pub(crate) struct ExportHost {
    host: HtmlElement,
    clone_root: HtmlElement,
}

impl ExportHost {
    /// Clones the card into a host pinned far off the left edge of the
    /// viewport, at the exact template size. The preview may be scaled by
    /// page styles; the clone must not be, so its transform is cleared and
    /// its size fixed before rasterization.
    pub(crate) fn build(task: &ExportTask) -> ZResult<ExportHost> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| error_once!("Export.NoDocument"))?;

        let host: HtmlElement = document
            .create_element("div")
            .map_err(map_err("Export.CreateHost"))?
            .dyn_into()
            .map_err(map_into_err::<JsValue, _>("Export.HostType"))?;
        host.set_class_name(HOST_CLASS);

        let width = format!("{}px", task.render.width);
        let height = format!("{}px", task.render.height);

        let style = host.style();
        style.set_property("position", "fixed").unwrap();
        style.set_property("left", "-100000px").unwrap();
        style.set_property("top", "0").unwrap();
        style.set_property("width", &width).unwrap();
        style.set_property("height", &height).unwrap();
        style
            .set_property("background", &task.render.background_color)
            .unwrap();
        style.set_property("z-index", "-1").unwrap();

        let clone_root: HtmlElement = task
            .card
            .clone_node_with_deep(true)
            .map_err(map_err("Export.CloneCard"))?
            .dyn_into()
            .map_err(map_into_err::<JsValue, _>("Export.CloneType"))?;

        let clone_style = clone_root.style();
        clone_style.set_property("transform", "none").unwrap();
        clone_style.set_property("width", &width).unwrap();
        clone_style.set_property("height", &height).unwrap();

        host.append_child(&clone_root)
            .context("Export.AttachClone")?;
        let body = document
            .body()
            .ok_or_else(|| error_once!("Export.NoBody"))?;
        body.append_child(&host).context("Export.AttachHost")?;

        let host = ExportHost { host, clone_root };
        host.copy_live_slots(task)?;
        Ok(host)
    }

    pub(crate) fn clone_root(&self) -> &HtmlElement {
        &self.clone_root
    }

    /// Copies the live slot content into the clone. The clone already holds
    /// a snapshot, but edits landing between snapshot and rasterization
    /// must win.
    fn copy_live_slots(&self, task: &ExportTask) -> ZResult<()> {
        if let Some(slot) = self.find_slot(&task.slots.headline)? {
            slot.set_inner_html(&task.headline_preview.inner_html());
        }
        if let Some(slot) = self.find_slot(&task.slots.caption)? {
            slot.set_text_content(task.caption_preview.text_content().as_deref());
        }
        if let Some(slot) = self.find_slot(&task.slots.image)? {
            if let Some(image) = slot.dyn_ref::<HtmlImageElement>() {
                image.set_src(&task.main_image.src());
            }
        }
        Ok(())
    }

    fn find_slot(&self, id: &str) -> ZResult<Option<Element>> {
        self.clone_root
            .query_selector(&format!("#{id}"))
            .map_err(map_err("Export.QuerySlot"))
    }
}

impl Drop for ExportHost {
    fn drop(&mut self) {
        self.host.remove();
    }
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod tests {
    use wasm_bindgen_test::*;

    use super::super::tests::fixture_task;
    use super::{ExportHost, HOST_CLASS};

    fn host_elements() -> web_sys::NodeList {
        let document = web_sys::window().unwrap().document().unwrap();
        document
            .query_selector_all(&format!(".{HOST_CLASS}"))
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn host_pins_the_clone_at_template_size() {
        let task = fixture_task("-clone-geometry");
        let host = ExportHost::build(&task).unwrap();

        assert_eq!(host_elements().length(), 1);
        let style = host.host.style();
        assert_eq!(style.get_property_value("position").unwrap(), "fixed");
        assert_eq!(style.get_property_value("left").unwrap(), "-100000px");
        assert_eq!(style.get_property_value("width").unwrap(), "1080px");
        assert_eq!(style.get_property_value("height").unwrap(), "1350px");

        let clone_style = host.clone_root.style();
        assert_eq!(clone_style.get_property_value("transform").unwrap(), "none");
        assert_eq!(clone_style.get_property_value("width").unwrap(), "1080px");

        drop(host);
        assert_eq!(host_elements().length(), 0);
    }

    #[wasm_bindgen_test]
    fn clone_carries_the_latest_slot_content() {
        let task = fixture_task("-clone-slots");
        task.headline_preview
            .set_inner_html(r#"fresh <span class="hl-red">edit</span>"#);
        task.caption_preview.set_text_content(Some("photo: late"));

        let host = ExportHost::build(&task).unwrap();
        let clone = host.clone_root();

        let headline = clone
            .query_selector("#headline-clone-slots")
            .unwrap()
            .unwrap();
        assert_eq!(
            headline.inner_html(),
            r#"fresh <span class="hl-red">edit</span>"#
        );
        let caption = clone
            .query_selector("#caption-clone-slots")
            .unwrap()
            .unwrap();
        assert_eq!(caption.text_content().unwrap(), "photo: late");
    }
}
