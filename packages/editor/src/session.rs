//! The mounted editor session.
//!
//! A session owns typed handles to every slot of the card, resolved once at
//! mount, and the input listeners that keep the preview live. The listeners
//! stay attached for the whole lifetime of the session.

use newsplate::error::prelude::*;
use newsplate::{render_markup, CardTemplate};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlButtonElement, HtmlElement, HtmlImageElement, HtmlInputElement,
    HtmlTextAreaElement,
};

use crate::export::{self, ExportOptions, ExportTask, SlotSelectors};
use crate::upload;

pub(crate) const TEMPLATE_ID: &str = "template";
pub(crate) const HEADLINE_INPUT_ID: &str = "headlineInput";
pub(crate) const HEADLINE_PREVIEW_ID: &str = "headline";
pub(crate) const CAPTION_INPUT_ID: &str = "sourceTailInput";
pub(crate) const CAPTION_PREVIEW_ID: &str = "sourceTail";
pub(crate) const IMAGE_INPUT_ID: &str = "imageInput";
pub(crate) const MAIN_IMAGE_ID: &str = "mainImage";
pub(crate) const EXPORT_BUTTON_ID: &str = "downloadBtn";

/// Attribute marking a card element that already carries a session.
const MOUNTED_MARK: &str = "data-newsplate-mounted";

/// Overrides for the element ids the session binds to. Every id defaults to
/// the one used by the canonical page.
#[wasm_bindgen]
#[derive(Default, Debug)]
pub struct MountOptions {
    pub(crate) template_id: Option<String>,
    pub(crate) headline_input_id: Option<String>,
    pub(crate) headline_preview_id: Option<String>,
    pub(crate) caption_input_id: Option<String>,
    pub(crate) caption_preview_id: Option<String>,
    pub(crate) image_input_id: Option<String>,
    pub(crate) main_image_id: Option<String>,
    pub(crate) export_button_id: Option<String>,
}

#[wasm_bindgen]
impl MountOptions {
    #[wasm_bindgen(constructor)]
    pub fn new() -> MountOptions {
        Self::default()
    }

    #[wasm_bindgen(getter)]
    pub fn template_id(&self) -> Option<String> {
        self.template_id.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_template_id(&mut self, template_id: String) {
        self.template_id = Some(template_id);
    }

    #[wasm_bindgen(getter)]
    pub fn headline_input_id(&self) -> Option<String> {
        self.headline_input_id.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_headline_input_id(&mut self, headline_input_id: String) {
        self.headline_input_id = Some(headline_input_id);
    }

    #[wasm_bindgen(getter)]
    pub fn headline_preview_id(&self) -> Option<String> {
        self.headline_preview_id.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_headline_preview_id(&mut self, headline_preview_id: String) {
        self.headline_preview_id = Some(headline_preview_id);
    }

    #[wasm_bindgen(getter)]
    pub fn caption_input_id(&self) -> Option<String> {
        self.caption_input_id.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_caption_input_id(&mut self, caption_input_id: String) {
        self.caption_input_id = Some(caption_input_id);
    }

    #[wasm_bindgen(getter)]
    pub fn caption_preview_id(&self) -> Option<String> {
        self.caption_preview_id.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_caption_preview_id(&mut self, caption_preview_id: String) {
        self.caption_preview_id = Some(caption_preview_id);
    }

    #[wasm_bindgen(getter)]
    pub fn image_input_id(&self) -> Option<String> {
        self.image_input_id.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_image_input_id(&mut self, image_input_id: String) {
        self.image_input_id = Some(image_input_id);
    }

    #[wasm_bindgen(getter)]
    pub fn main_image_id(&self) -> Option<String> {
        self.main_image_id.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_main_image_id(&mut self, main_image_id: String) {
        self.main_image_id = Some(main_image_id);
    }

    #[wasm_bindgen(getter)]
    pub fn export_button_id(&self) -> Option<String> {
        self.export_button_id.clone()
    }

    #[wasm_bindgen(setter)]
    pub fn set_export_button_id(&mut self, export_button_id: String) {
        self.export_button_id = Some(export_button_id);
    }
}

#[wasm_bindgen]
pub struct EditorSession {
    pub(crate) template: CardTemplate,
    pub(crate) card: HtmlElement,
    pub(crate) headline_input: HtmlElement,
    pub(crate) headline_preview: HtmlElement,
    pub(crate) caption_input: HtmlElement,
    pub(crate) caption_preview: HtmlElement,
    pub(crate) image_input: HtmlInputElement,
    pub(crate) main_image: HtmlImageElement,
    pub(crate) export_button: HtmlButtonElement,
    pub(crate) slots: SlotSelectors,
    /// The live preview listeners. Held here so they outlive the wiring.
    _handlers: Vec<Closure<dyn FnMut(web_sys::Event)>>,
}

#[wasm_bindgen]
impl EditorSession {
    /// The card template as a plain object.
    pub fn template(&self) -> ZResult<JsValue> {
        serde_wasm_bindgen::to_value(&self.template)
            .map_err(map_string_err("Session.SerializeTemplate"))
    }

    /// The HTML currently shown in the headline preview.
    #[wasm_bindgen(getter)]
    pub fn headline_html(&self) -> String {
        self.headline_preview.inner_html()
    }
}

impl EditorSession {
    pub(crate) fn mount(options: MountOptions) -> ZResult<EditorSession> {
        let document = web_sys::window()
            .ok_or_else(|| error_once!("Session.NoWindow"))?
            .document()
            .ok_or_else(|| error_once!("Session.NoDocument"))?;

        let card: HtmlElement =
            resolve(&document, options.template_id.as_deref().unwrap_or(TEMPLATE_ID))?;
        if card.has_attribute(MOUNTED_MARK) {
            return Err(error_once!(
                "Session.AlreadyMounted",
                card: format!("#{}", card.id())
            ));
        }

        let headline_input: HtmlElement = resolve(
            &document,
            options
                .headline_input_id
                .as_deref()
                .unwrap_or(HEADLINE_INPUT_ID),
        )?;
        let headline_preview: HtmlElement = resolve(
            &document,
            options
                .headline_preview_id
                .as_deref()
                .unwrap_or(HEADLINE_PREVIEW_ID),
        )?;
        let caption_input: HtmlElement = resolve(
            &document,
            options
                .caption_input_id
                .as_deref()
                .unwrap_or(CAPTION_INPUT_ID),
        )?;
        let caption_preview: HtmlElement = resolve(
            &document,
            options
                .caption_preview_id
                .as_deref()
                .unwrap_or(CAPTION_PREVIEW_ID),
        )?;
        let image_input: HtmlInputElement = resolve(
            &document,
            options.image_input_id.as_deref().unwrap_or(IMAGE_INPUT_ID),
        )?;
        let main_image: HtmlImageElement = resolve(
            &document,
            options.main_image_id.as_deref().unwrap_or(MAIN_IMAGE_ID),
        )?;
        let export_button: HtmlButtonElement = resolve(
            &document,
            options
                .export_button_id
                .as_deref()
                .unwrap_or(EXPORT_BUTTON_ID),
        )?;

        let slots = SlotSelectors {
            headline: headline_preview.id(),
            caption: caption_preview.id(),
            image: main_image.id(),
        };
        let template = CardTemplate::default();

        let mut handlers = Vec::new();

        // Live headline preview.
        {
            let input = headline_input.clone();
            let preview = headline_preview.clone();
            let handler = Closure::wrap(Box::new(move |_event: web_sys::Event| {
                preview.set_inner_html(&render_markup(&control_value(&input)));
            }) as Box<dyn FnMut(_)>);
            headline_input
                .add_event_listener_with_callback("input", handler.as_ref().unchecked_ref())
                .context("Session.BindHeadline")?;
            handlers.push(handler);
        }

        // The caption is text only; markup never applies to it.
        {
            let input = caption_input.clone();
            let preview = caption_preview.clone();
            let handler = Closure::wrap(Box::new(move |_event: web_sys::Event| {
                preview.set_text_content(Some(&control_value(&input)));
            }) as Box<dyn FnMut(_)>);
            caption_input
                .add_event_listener_with_callback("input", handler.as_ref().unchecked_ref())
                .context("Session.BindCaption")?;
            handlers.push(handler);
        }

        {
            let handler = upload::bind_image_input(&image_input, &main_image);
            image_input
                .add_event_listener_with_callback("change", handler.as_ref().unchecked_ref())
                .context("Session.BindImageInput")?;
            handlers.push(handler);
        }

        {
            let task = ExportTask {
                card: card.clone(),
                headline_preview: headline_preview.clone(),
                caption_preview: caption_preview.clone(),
                main_image: main_image.clone(),
                button: export_button.clone(),
                slots: slots.clone(),
                render: template.clone(),
            };
            let handler = Closure::wrap(Box::new(move |_event: web_sys::Event| {
                let task = task.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    // failures are logged and alerted inside the pipeline
                    let _ = export::run(task).await;
                });
            }) as Box<dyn FnMut(_)>);
            export_button
                .add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())
                .context("Session.BindExportButton")?;
            handlers.push(handler);
        }

        // Reflect whatever the inputs already hold.
        headline_preview.set_inner_html(&render_markup(&control_value(&headline_input)));
        caption_preview.set_text_content(Some(&control_value(&caption_input)));

        console_log!(
            "htmlToImage exists? {}",
            crate::export::raster::library().is_some()
        );

        card.set_attribute(MOUNTED_MARK, "true")
            .context("Session.MarkMounted")?;

        Ok(EditorSession {
            template,
            card,
            headline_input,
            headline_preview,
            caption_input,
            caption_preview,
            image_input,
            main_image,
            export_button,
            slots,
            _handlers: handlers,
        })
    }

    pub(crate) fn export_task(&self, options: ExportOptions) -> ExportTask {
        ExportTask {
            card: self.card.clone(),
            headline_preview: self.headline_preview.clone(),
            caption_preview: self.caption_preview.clone(),
            main_image: self.main_image.clone(),
            button: self.export_button.clone(),
            slots: self.slots.clone(),
            render: options.resolve(&self.template),
        }
    }
}

fn resolve<T: JsCast>(document: &Document, id: &str) -> ZResult<T> {
    let elem = document
        .get_element_by_id(id)
        .ok_or_else(|| error_once!("Session.MissingSlot", id: id))?;
    elem.dyn_into::<T>()
        .map_err(|elem| error_once!("Session.SlotType", id: id, tag: elem.tag_name()))
}

/// Reads the current value of a form control, whichever control type the
/// page uses for the slot.
fn control_value(elem: &HtmlElement) -> String {
    if let Some(input) = elem.dyn_ref::<HtmlInputElement>() {
        return input.value();
    }
    if let Some(area) = elem.dyn_ref::<HtmlTextAreaElement>() {
        return area.value();
    }
    elem.text_content().unwrap_or_default()
}
