use std::cell::RefCell;
use std::rc::Rc;

use log::error;
use wasm_bindgen::prelude::*;
use webchess::message_ui::{
    AvatarSide, ChatBubble, MessageUi, MessageView, ScrollMetrics, UiNow,
};
use webchess::utc_time::UtcDateTime;

use crate::rust_error;
use crate::web_document::{web_document, web_window};
use crate::web_element_ext::WebElementExt;
use crate::web_error_handling::JsResult;


const TIME_LABEL_CLASS: &str = "chat-time";
const INACTIVE_CLASS: &str = "chat-inactive";

pub struct DomMessageView {
    container: web_sys::Element,
}

fn side_class(side: AvatarSide) -> &'static str {
    match side {
        AvatarSide::Left => "left",
        AvatarSide::Right => "right",
    }
}

fn render_bubble_node(bubble: &ChatBubble) -> JsResult<web_sys::Element> {
    let side = side_class(bubble.side);
    let li = web_document().create_element("li")?.with_classes([side, "clearfix"])?;
    li.append_span(["chat-img", format!("float-{side}").as_str()])?
        .with_attribute(
            "style",
            &format!(
                "width: 50px; height: 50px; background-color: #{}; display: flex; \
                 align-items: center; justify-content: center; color: white",
                bubble.color
            ),
        )?
        .set_text_content(Some(&bubble.initials));
    let body = li.append_new_element("div")?.with_classes(["chat-body", "clearfix"])?;
    let header = body.append_new_element("div")?.with_classes(["header"])?;
    header
        .append_new_element("strong")?
        .with_classes(["primary-font"])?
        .set_text_content(Some(&bubble.username));
    header
        .append_new_element("small")?
        .with_classes(["float-right", "text-muted", TIME_LABEL_CLASS])?
        .with_attribute("title", &bubble.timestamp.to_rfc3339())?
        .set_text_content(Some(&bubble.time_label));
    body.append_new_element("p")?.set_text_content(Some(&bubble.text));
    Ok(li)
}

impl MessageView for DomMessageView {
    type Element = web_sys::Element;

    fn render_bubble(&mut self, bubble: &ChatBubble) -> web_sys::Element {
        render_bubble_node(bubble).unwrap_or_else(|err| {
            error!("Cannot render chat message: {:?}", err);
            // Creating a bare `li` cannot fail.
            web_document().create_element("li").unwrap()
        })
    }

    fn set_time_label(&mut self, element: &web_sys::Element, label: &str) {
        match element.query_selector(&format!(".{TIME_LABEL_CLASS}")) {
            Ok(Some(node)) => node.set_text_content(Some(label)),
            Ok(None) => {}
            Err(err) => error!("Cannot update chat time label: {:?}", err),
        }
    }

    fn append(&mut self, element: &web_sys::Element) {
        if let Err(err) = self.container.append_child(element) {
            error!("Cannot append chat element: {:?}", err);
        }
    }

    fn prepend(&mut self, element: &web_sys::Element) {
        if let Err(err) = self.container.prepend_with_node_1(element) {
            error!("Cannot prepend chat element: {:?}", err);
        }
    }

    fn remove(&mut self, element: &web_sys::Element) { element.remove(); }
    fn remove_all(&mut self) { self.container.remove_all_children(); }

    fn outer_height(&self, element: &web_sys::Element) -> f64 {
        element.outer_height().unwrap_or_else(|err| {
            error!("Cannot measure chat element: {:?}", err);
            0.0
        })
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            scroll_top: self.container.scroll_top().into(),
            scroll_height: self.container.scroll_height().into(),
            client_height: self.container.client_height().into(),
        }
    }

    fn set_scroll_top(&mut self, scroll_top: f64) {
        self.container.set_scroll_top(scroll_top.round() as i32);
    }

    fn set_inactive(&mut self, inactive: bool) {
        if let Err(err) = self.container.class_list().toggle_with_force(INACTIVE_CLASS, inactive) {
            error!("Cannot toggle chat activity: {:?}", err);
        }
    }
}

fn timestamp_from_millis(timestamp_ms: f64) -> JsResult<UtcDateTime> {
    if !timestamp_ms.is_finite() {
        return Err(rust_error!("Invalid timestamp: {}", timestamp_ms));
    }
    UtcDateTime::from_unix_millis(timestamp_ms as i64)
        .ok_or_else(|| rust_error!("Invalid timestamp: {}", timestamp_ms))
}

// Chat message list rendered into a scrollable container (usually a `ul`).
#[wasm_bindgen]
pub struct WebMessageUi {
    ui: Rc<RefCell<MessageUi<DomMessageView>>>,
}

impl WebMessageUi {
    fn with_ui<R>(
        &self, f: impl FnOnce(&mut MessageUi<DomMessageView>) -> R,
    ) -> JsResult<R> {
        let mut ui = self.ui.try_borrow_mut().map_err(|_| rust_error!("Chat is busy"))?;
        Ok(f(&mut ui))
    }
}

#[wasm_bindgen]
impl WebMessageUi {
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str) -> JsResult<WebMessageUi> {
        let container = web_document().get_existing_element_by_id(container_id)?;
        let view = DomMessageView { container: container.clone() };
        let ui = Rc::new(RefCell::new(MessageUi::new(view)));
        let scroll_ui = Rc::downgrade(&ui);
        container.add_event_listener_and_forget("scroll", move |_: web_sys::Event| {
            if let Some(ui) = scroll_ui.upgrade() {
                if let Ok(mut ui) = ui.try_borrow_mut() {
                    ui.on_scroll();
                }
            }
            Ok(())
        })?;
        Ok(WebMessageUi { ui })
    }

    pub fn insert_end(&self, message: &str, username: &str, timestamp_ms: f64) -> JsResult<()> {
        let timestamp = timestamp_from_millis(timestamp_ms)?;
        self.with_ui(|ui| ui.insert_end(message, username, timestamp, UiNow::now()))
    }

    pub fn insert_start(&self, message: &str, username: &str, timestamp_ms: f64) -> JsResult<()> {
        let timestamp = timestamp_from_millis(timestamp_ms)?;
        self.with_ui(|ui| ui.insert_start(message, username, timestamp, UiNow::now()))
    }

    pub fn insert_start_element(
        &self, element: web_sys::Element, permit_scrolling: bool,
    ) -> JsResult<()> {
        self.with_ui(|ui| ui.insert_start_element(element, permit_scrolling))
    }

    pub fn insert_end_element(&self, element: web_sys::Element) -> JsResult<()> {
        self.with_ui(|ui| ui.insert_end_element(element))
    }

    pub fn remove_start(&self, should_scroll_start: bool) -> JsResult<()> {
        self.with_ui(|ui| ui.remove_start(should_scroll_start))
    }

    pub fn remove_end(&self) -> JsResult<()> { self.with_ui(|ui| ui.remove_end()) }

    pub fn get_start(&self) -> JsResult<Option<web_sys::Element>> {
        self.with_ui(|ui| ui.get_start().cloned())
    }

    pub fn clear(&self) -> JsResult<()> { self.with_ui(|ui| ui.clear()) }

    pub fn is_scrolled_end(&self) -> JsResult<bool> { self.with_ui(|ui| ui.is_scrolled_end()) }
    pub fn scroll_end(&self) -> JsResult<()> { self.with_ui(|ui| ui.scroll_end()) }
    pub fn scroll_start(&self) -> JsResult<()> { self.with_ui(|ui| ui.scroll_start()) }
    pub fn is_scrollable(&self) -> JsResult<bool> { self.with_ui(|ui| ui.is_scrollable()) }

    // The callback runs asynchronously, so it may call back into this object.
    pub fn onscrolltop(&self, callback: js_sys::Function) -> JsResult<()> {
        self.with_ui(|ui| {
            ui.onscrolltop(move || {
                if let Err(err) = web_window().set_timeout_with_callback(&callback) {
                    error!("Cannot schedule scroll-top callback: {:?}", err);
                }
            })
        })
    }

    pub fn mark_inactive(&self) -> JsResult<()> { self.with_ui(|ui| ui.mark_inactive()) }
    pub fn mark_active(&self) -> JsResult<()> { self.with_ui(|ui| ui.mark_active()) }

    pub fn refresh(&self) -> JsResult<()> { self.with_ui(|ui| ui.refresh(UiNow::now())) }
}
