use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::rust_error;
use crate::web_error_handling::JsResult;


pub struct WebDocument(web_sys::Document);

impl WebDocument {
    pub fn get_existing_element_by_id(&self, element_id: &str) -> JsResult<web_sys::Element> {
        let element = self
            .0
            .get_element_by_id(element_id)
            .ok_or_else(|| rust_error!("Cannot find element \"{}\"", element_id))?;
        if !element.is_object() {
            return Err(rust_error!("Element \"{}\" is not an object", element_id));
        }
        Ok(element)
    }

    pub fn create_element(&self, local_name: &str) -> JsResult<web_sys::Element> {
        self.0.create_element(local_name)
    }
}

pub fn web_window() -> web_sys::Window { web_sys::window().unwrap() }

pub fn web_document() -> WebDocument { WebDocument(web_window().document().unwrap()) }

// A window event listener that is removed when dropped.
pub struct WindowListener {
    event_type: &'static str,
    callback: Closure<dyn FnMut()>,
}

impl WindowListener {
    pub fn new(event_type: &'static str, callback: impl FnMut() + 'static) -> JsResult<Self> {
        let callback = Closure::<dyn FnMut()>::new(callback);
        web_window()
            .add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())?;
        Ok(WindowListener { event_type, callback })
    }
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        let result = web_window().remove_event_listener_with_callback(
            self.event_type,
            self.callback.as_ref().unchecked_ref(),
        );
        if let Err(err) = result {
            warn!("Cannot remove window {} listener: {:?}", self.event_type, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use wasm_bindgen_test::*;

    use super::*;

    fn fire(event_type: &str) {
        let event = web_sys::Event::new(event_type).unwrap();
        web_window().dispatch_event(&event).unwrap();
    }

    #[wasm_bindgen_test]
    fn listener_is_removed_on_drop() {
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let listener =
            WindowListener::new("resize", move || counter.set(counter.get() + 1)).unwrap();
        fire("resize");
        assert_eq!(fired.get(), 1);

        drop(listener);
        fire("resize");
        assert_eq!(fired.get(), 1);
        assert_eq!(Rc::strong_count(&fired), 1);
    }
}
