//! The export pipeline: clone the card offscreen, wait for its images,
//! rasterize the clone through the page-provided `htmlToImage` library and
//! trigger the PNG download.
//!
//! Steps run strictly in order. The offscreen host and the export button
//! state are owned by guards, so they are restored on every exit path.

pub(crate) mod clone;
pub(crate) mod download;
pub(crate) mod images;
pub(crate) mod raster;

use newsplate::error::prelude::*;
use newsplate::CardTemplate;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlButtonElement, HtmlElement, HtmlImageElement};
use web_time::Instant;

/// Overrides for one export. Anything unset comes from the card template.
#[wasm_bindgen]
#[derive(Default, Debug)]
pub struct ExportOptions {
    pub(crate) pixel_ratio: Option<f32>,
    pub(crate) background_color: Option<String>,
    pub(crate) file_name: Option<String>,
}

#[wasm_bindgen]
impl ExportOptions {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ExportOptions {
        Self::default()
    }

    #[wasm_bindgen(getter)]
    pub fn pixel_ratio(&self) -> Option<f32> {
        self.pixel_ratio
    }

    #[wasm_bindgen(setter)]
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.pixel_ratio = Some(pixel_ratio);
    }

    #[wasm_bindgen(getter)]
    pub fn background_color(&self) -> Option<String> {
        self.background_color.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_background_color(&mut self, background_color: String) {
        self.background_color = Some(background_color);
    }

    #[wasm_bindgen(getter)]
    pub fn file_name(&self) -> Option<String> {
        self.file_name.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_file_name(&mut self, file_name: String) {
        self.file_name = Some(file_name);
    }
}

impl ExportOptions {
    pub(crate) fn resolve(&self, template: &CardTemplate) -> CardTemplate {
        let mut render = template.clone();
        if let Some(pixel_ratio) = self.pixel_ratio {
            render.pixel_ratio = pixel_ratio;
        }
        if let Some(background_color) = &self.background_color {
            render.background_color = background_color.clone();
        }
        if let Some(file_name) = &self.file_name {
            render.file_name = file_name.clone();
        }
        render
    }
}

/// Ids used to find the slots again inside the clone.
#[derive(Debug, Clone)]
pub(crate) struct SlotSelectors {
    pub headline: String,
    pub caption: String,
    pub image: String,
}

/// Everything one export needs, captured from the session at request time.
#[derive(Clone)]
pub(crate) struct ExportTask {
    pub card: HtmlElement,
    pub headline_preview: HtmlElement,
    pub caption_preview: HtmlElement,
    pub main_image: HtmlImageElement,
    pub button: HtmlButtonElement,
    pub slots: SlotSelectors,
    pub render: CardTemplate,
}

/// The outcome of a finished export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub file_name: String,
    pub pixel_ratio: f32,
    pub data_url_length: usize,
    pub elapsed_ms: f64,
}

/// Disables the export control while an export runs and restores its
/// previous state on drop. Re-entry is prevented by the disabled control
/// alone; there is no separate lock.
pub(crate) struct ExportButtonGuard {
    button: HtmlButtonElement,
    label: Option<String>,
}

impl ExportButtonGuard {
    pub(crate) fn engage(button: &HtmlButtonElement) -> Self {
        let label = button.text_content();
        button.set_disabled(true);
        button.set_text_content(Some("Exporting..."));
        Self {
            button: button.clone(),
            label,
        }
    }
}

impl Drop for ExportButtonGuard {
    fn drop(&mut self) {
        self.button.set_disabled(false);
        self.button.set_text_content(self.label.as_deref());
    }
}

/// Runs one export. On failure the error is logged, surfaced with an alert,
/// and returned; the button and the document are restored either way.
pub(crate) async fn run(task: ExportTask) -> ZResult<ExportReport> {
    let start = Instant::now();
    let _restore = ExportButtonGuard::engage(&task.button);

    match run_inner(&task).await {
        Ok(data_url) => {
            let report = ExportReport {
                file_name: task.render.file_name.clone(),
                pixel_ratio: task.render.pixel_ratio,
                data_url_length: data_url.len(),
                elapsed_ms: start.elapsed().as_secs_f64() * 1e3,
            };
            console_log!(
                "exported {} in {:.1}ms",
                report.file_name,
                report.elapsed_ms
            );
            Ok(report)
        }
        Err(err) => {
            web_sys::console::error_2(&"PNG export failed:".into(), &JsValue::from(&err));
            if let Some(window) = web_sys::window() {
                let _ = window.alert_with_message(&format!("Download failed:\n\n{err}"));
            }
            Err(err)
        }
    }
}

async fn run_inner(task: &ExportTask) -> ZResult<String> {
    raster::require_rasterizer()?;
    raster::wait_for_fonts().await;

    let host = clone::ExportHost::build(task)?;
    images::wait_for_images(host.clone_root()).await?;

    let data_url = raster::rasterize(host.clone_root(), &task.render).await?;
    download::trigger(&data_url, &task.render.file_name)?;
    Ok(data_url)
}
