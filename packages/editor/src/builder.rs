use crate::NewsplateEditor;

use newsplate::error::prelude::*;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct NewsplateEditorBuilder {}

/// A builder for [`NewsplateEditor`].
///
/// Constructing the builder installs the panic hook, so panics inside the
/// editor surface in the browser console.
/// Example usage:
/// ```js
/// const builder = new NewsplateEditorBuilder();
/// const editor = await builder.build();
/// ```
#[wasm_bindgen]
impl NewsplateEditorBuilder {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ZResult<NewsplateEditorBuilder> {
        console_error_panic_hook::set_once();
        Ok(Self {})
    }

    pub async fn build(self) -> ZResult<NewsplateEditor> {
        Ok(NewsplateEditor::new())
    }
}
