use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;

use crate::web_document::{web_document, web_window};
use crate::web_error_handling::JsResult;


pub trait WebElementExt {
    fn with_text_content(self, text: &str) -> web_sys::Element;
    fn with_attribute(self, name: &str, value: &str) -> JsResult<web_sys::Element>;
    fn with_classes<'a>(self, classes: impl IntoIterator<Item = &'a str>) -> JsResult<web_sys::Element>;

    fn add_event_listener_and_forget<E: FromWasmAbi + 'static>(
        &self, event_type: &str, listener: impl FnMut(E) -> JsResult<()> + 'static,
    ) -> JsResult<()>;

    fn remove_all_children(&self);
    fn append_new_element(&self, local_name: &str) -> JsResult<web_sys::Element>;
    fn append_span<'a>(&self, classes: impl IntoIterator<Item = &'a str>) -> JsResult<web_sys::Element>;

    // Rendered height plus vertical margins.
    fn outer_height(&self) -> JsResult<f64>;
}

impl WebElementExt for web_sys::Element {
    fn with_text_content(self, text: &str) -> web_sys::Element {
        self.set_text_content(Some(text));
        self
    }

    fn with_attribute(self, name: &str, value: &str) -> JsResult<web_sys::Element> {
        self.set_attribute(name, value)?;
        Ok(self)
    }

    fn with_classes<'a>(self, classes: impl IntoIterator<Item = &'a str>) -> JsResult<web_sys::Element> {
        for class in classes {
            self.class_list().add_1(class)?;
        }
        Ok(self)
    }

    // TODO: Don't leak, let JS GC handle it. The listeners registered here live as long as the
    // page, but a widget container that is re-created would accumulate them.
    fn add_event_listener_and_forget<E: FromWasmAbi + 'static>(
        &self, event_type: &str, listener: impl FnMut(E) -> JsResult<()> + 'static,
    ) -> JsResult<()> {
        let closure = Closure::new(listener);
        self.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn remove_all_children(&self) { self.replace_children_with_node_0() }

    fn append_new_element(&self, local_name: &str) -> JsResult<web_sys::Element> {
        let node = web_document().create_element(local_name)?;
        self.append_child(&node)?;
        Ok(node)
    }

    fn append_span<'a>(&self, classes: impl IntoIterator<Item = &'a str>) -> JsResult<web_sys::Element> {
        self.append_new_element("span")?.with_classes(classes)
    }

    fn outer_height(&self) -> JsResult<f64> {
        let height = self.get_bounding_client_rect().height();
        let Some(style) = web_window().get_computed_style(self)? else {
            return Ok(height);
        };
        let margin = |property: &str| -> JsResult<f64> {
            let value = style.get_property_value(property)?;
            Ok(value.trim_end_matches("px").parse().unwrap_or(0.0))
        };
        Ok(height + margin("margin-top")? + margin("margin-bottom")?)
    }
}
