use std::collections::HashMap;

use crate::avatar::{AvatarColor, avatar_color, avatar_initials};


#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PresenceRow {
    pub username: String,
    pub initials: String,
    pub color: AvatarColor,
}

impl PresenceRow {
    pub fn new(username: &str) -> Self {
        PresenceRow {
            username: username.to_owned(),
            initials: avatar_initials(username),
            color: avatar_color(username),
        }
    }
}

pub trait PresenceView {
    type Element;

    fn append_row(&mut self, row: &PresenceRow) -> Self::Element;
    fn remove_row(&mut self, element: Self::Element);
    fn remove_all(&mut self);
}

// List of connected users, at most one row per username.
pub struct OnlineUsers<V: PresenceView> {
    view: V,
    // Usernames in insertion order.
    order: Vec<String>,
    rows: HashMap<String, V::Element>,
}

impl<V: PresenceView> OnlineUsers<V> {
    pub fn new(view: V) -> Self {
        OnlineUsers { view, order: Vec::new(), rows: HashMap::new() }
    }

    pub fn view(&self) -> &V { &self.view }

    pub fn insert(&mut self, username: &str) {
        if self.rows.contains_key(username) {
            return;
        }
        let element = self.view.append_row(&PresenceRow::new(username));
        self.rows.insert(username.to_owned(), element);
        self.order.push(username.to_owned());
    }

    pub fn remove(&mut self, username: &str) {
        let Some(element) = self.rows.remove(username) else {
            return;
        };
        self.view.remove_row(element);
        self.order.retain(|u| u != username);
    }

    pub fn clear(&mut self) {
        self.view.remove_all();
        self.rows.clear();
        self.order.clear();
    }

    pub fn contains(&self, username: &str) -> bool { self.rows.contains_key(username) }
    pub fn len(&self) -> usize { self.order.len() }
    pub fn is_empty(&self) -> bool { self.order.is_empty() }
    pub fn usernames(&self) -> impl Iterator<Item = &str> { self.order.iter().map(String::as_str) }
}
