//! A browser editor for news cards: a headline and a caption with inline
//! highlight markup, laid over an uploaded image, exported as a fixed-size
//! PNG through the page-provided `htmlToImage` rasterizer.

#[macro_use]
pub(crate) mod utils;

use newsplate::error::prelude::*;
use wasm_bindgen::prelude::*;

pub(crate) mod builder;
pub use builder::NewsplateEditorBuilder;

pub(crate) mod export;
pub use export::ExportOptions;

pub(crate) mod session;
pub use session::EditorSession;
pub use session::MountOptions;

pub(crate) mod upload;

pub mod build_info {
    /// The version of the newsplate-editor crate.
    pub static VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Return an object containing build info
#[wasm_bindgen]
pub fn editor_build_info() -> JsValue {
    let obj = js_sys::Object::new();

    js_sys::Reflect::set(
        &obj,
        &JsValue::from_str("version"),
        &JsValue::from_str(build_info::VERSION),
    )
    .unwrap();

    obj.into()
}

#[wasm_bindgen]
pub struct NewsplateEditor {}

impl Default for NewsplateEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl NewsplateEditor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> NewsplateEditor {
        Self {}
    }

    /// Binds the editor to the card elements in the page and starts the live
    /// preview. Mounting the same card twice is an error.
    pub fn mount(&self, options: Option<MountOptions>) -> ZResult<EditorSession> {
        EditorSession::mount(options.unwrap_or_default()).map_err(wrap_err("Editor.Mount"))
    }

    /// Exports the mounted card as a PNG and triggers its download.
    ///
    /// Resolves to an export report object; rejects with the failure. The
    /// offscreen clone used for rasterization is removed on both paths.
    pub fn export_png(
        &self,
        session: &EditorSession,
        options: Option<ExportOptions>,
    ) -> js_sys::Promise {
        let task = session.export_task(options.unwrap_or_default());
        wasm_bindgen_futures::future_to_promise(async move {
            let report = export::run(task).await?;
            Ok(serde_wasm_bindgen::to_value(&report)
                .map_err(map_string_err("Editor.SerializeExportReport"))?)
        })
    }
}
