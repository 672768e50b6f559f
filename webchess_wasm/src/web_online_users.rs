use log::error;
use wasm_bindgen::prelude::*;
use webchess::online_users::{OnlineUsers, PresenceRow, PresenceView};

use crate::web_document::web_document;
use crate::web_element_ext::WebElementExt;
use crate::web_error_handling::JsResult;


pub struct DomPresenceView {
    table: web_sys::Element,
}

fn render_row(table: &web_sys::Element, row: &PresenceRow) -> JsResult<web_sys::Element> {
    let tr = table.append_new_element("tr")?;
    tr.append_new_element("td")?
        .append_span(["user-avatar"])?
        .with_attribute(
            "style",
            &format!(
                "width: 30px; height: 30px; background-color: #{}; display: flex; \
                 align-items: center; justify-content: center; color: white",
                row.color
            ),
        )?
        .set_text_content(Some(&row.initials));
    tr.append_new_element("td")?
        .append_new_element("strong")?
        .set_text_content(Some(&row.username));
    Ok(tr)
}

impl PresenceView for DomPresenceView {
    type Element = web_sys::Element;

    fn append_row(&mut self, row: &PresenceRow) -> web_sys::Element {
        render_row(&self.table, row).unwrap_or_else(|err| {
            error!("Cannot render online user \"{}\": {:?}", row.username, err);
            // Creating a bare `tr` cannot fail.
            web_document().create_element("tr").unwrap()
        })
    }

    fn remove_row(&mut self, element: web_sys::Element) { element.remove(); }
    fn remove_all(&mut self) { self.table.remove_all_children(); }
}

// Table of connected users, one row per username.
#[wasm_bindgen]
pub struct WebOnlineUsers {
    users: OnlineUsers<DomPresenceView>,
}

#[wasm_bindgen]
impl WebOnlineUsers {
    #[wasm_bindgen(constructor)]
    pub fn new(table_id: &str) -> JsResult<WebOnlineUsers> {
        let table = web_document().get_existing_element_by_id(table_id)?;
        Ok(WebOnlineUsers { users: OnlineUsers::new(DomPresenceView { table }) })
    }

    pub fn insert(&mut self, username: &str) { self.users.insert(username); }
    pub fn remove(&mut self, username: &str) { self.users.remove(username); }
    pub fn clear(&mut self) { self.users.clear(); }
    pub fn contains(&self, username: &str) -> bool { self.users.contains(username) }
    pub fn len(&self) -> usize { self.users.len() }
    pub fn is_empty(&self) -> bool { self.users.is_empty() }
}
