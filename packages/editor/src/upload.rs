//! Moves files picked in the image input onto the card as data URIs.

use js_sys::Promise;
use newsplate::error::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileReader, HtmlImageElement, HtmlInputElement};

/// Builds the `change` listener for the file input. The first picked file is
/// read into a data URI and assigned to the main image; clearing the picker
/// is a no-op. Read failures are logged, the previous image stays.
pub(crate) fn bind_image_input(
    input: &HtmlInputElement,
    image: &HtmlImageElement,
) -> Closure<dyn FnMut(web_sys::Event)> {
    let input = input.clone();
    let image = image.clone();
    Closure::wrap(Box::new(move |_event: web_sys::Event| {
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        let image = image.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match read_to_data_url(&file).await {
                Ok(data_url) => image.set_src(&data_url),
                Err(err) => web_sys::console::error_1(&JsValue::from(&err)),
            }
        });
    }) as Box<dyn FnMut(_)>)
}

/// Reads a file into a data URI through `FileReader`. The wait settles on
/// both load and error; a settle without a string result is the error case.
pub(crate) async fn read_to_data_url(file: &File) -> ZResult<String> {
    let reader = FileReader::new().map_err(map_err("Upload.CreateReader"))?;

    let settled = Promise::new(&mut |complete: js_sys::Function, _reject: js_sys::Function| {
        let complete2 = complete.clone();

        let a = Closure::<dyn Fn()>::new(move || {
            complete.call0(&complete).unwrap();
        });
        reader.set_onload(Some(a.as_ref().unchecked_ref()));
        a.forget();

        let a = Closure::<dyn Fn(JsValue)>::new(move |_event: JsValue| {
            complete2.call0(&complete2).unwrap();
        });
        reader.set_onerror(Some(a.as_ref().unchecked_ref()));
        a.forget();
    });

    reader
        .read_as_data_url(file)
        .map_err(map_err("Upload.StartRead"))?;
    JsFuture::from(settled)
        .await
        .map_err(map_err("Upload.AwaitRead"))?;

    let result = reader.result().map_err(map_err("Upload.ReadResult"))?;
    result
        .as_string()
        .ok_or_else(|| error_once!("Upload.UnreadableFile", name: file.name()))
}
