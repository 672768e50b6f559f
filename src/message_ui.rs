// Chat message list: a scrolling column of bubbles that can grow at both ends (new messages at
// the end, history pages at the start).

use std::collections::VecDeque;
use std::time::Duration;

use instant::Instant;

use crate::avatar::{AvatarColor, avatar_color, avatar_initials};
use crate::relative_time::time_label;
use crate::timer::{TimerId, TimerQueue};
use crate::utc_time::UtcDateTime;


pub const TIME_LABEL_REFRESH_INTERVAL: Duration = Duration::from_secs(10);
// Content must exceed the container by more than this to count as scrollable.
pub const SCROLLABLE_THRESHOLD_PX: f64 = 5.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AvatarSide {
    Left,
    Right,
}

impl AvatarSide {
    pub fn flipped(self) -> Self {
        match self {
            AvatarSide::Left => AvatarSide::Right,
            AvatarSide::Right => AvatarSide::Left,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct BubbleId(u64);

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ChatBubble {
    pub id: BubbleId,
    pub text: String,
    pub username: String,
    pub timestamp: UtcDateTime,
    pub initials: String,
    pub color: AvatarColor,
    pub side: AvatarSide,
    pub time_label: String,
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

// Current time in both clocks: timers run on `instant`, labels are computed from `utc`.
#[derive(Clone, Copy, Debug)]
pub struct UiNow {
    pub instant: Instant,
    pub utc: UtcDateTime,
}

impl UiNow {
    pub fn new(instant: Instant, utc: UtcDateTime) -> Self { UiNow { instant, utc } }
    pub fn now() -> Self { UiNow { instant: Instant::now(), utc: UtcDateTime::now() } }
}

// Rendering side of the chat. Elements are handles to rendered nodes in the scroll container.
pub trait MessageView {
    type Element: Clone;

    fn render_bubble(&mut self, bubble: &ChatBubble) -> Self::Element;
    fn set_time_label(&mut self, element: &Self::Element, label: &str);
    fn append(&mut self, element: &Self::Element);
    fn prepend(&mut self, element: &Self::Element);
    fn remove(&mut self, element: &Self::Element);
    fn remove_all(&mut self);
    // Height including margins.
    fn outer_height(&self, element: &Self::Element) -> f64;
    fn scroll_metrics(&self) -> ScrollMetrics;
    fn set_scroll_top(&mut self, scroll_top: f64);
    fn set_inactive(&mut self, inactive: bool);
}

#[derive(Clone, Debug)]
struct ChatEntry<E> {
    element: E,
    // Set for chat bubbles; arbitrary elements have no bubble and no timer.
    bubble: Option<(ChatBubble, TimerId)>,
}

pub struct MessageUi<V: MessageView> {
    view: V,
    entries: VecDeque<ChatEntry<V::Element>>,
    timers: TimerQueue<BubbleId>,
    next_bubble_id: u64,
    append_side: AvatarSide,
    prepend_side: AvatarSide,
    on_scroll_top: Option<Box<dyn FnMut()>>,
    inactive: bool,
}

const INITIAL_APPEND_SIDE: AvatarSide = AvatarSide::Left;
const INITIAL_PREPEND_SIDE: AvatarSide = AvatarSide::Right;

impl<V: MessageView> MessageUi<V> {
    pub fn new(view: V) -> Self {
        MessageUi {
            view,
            entries: VecDeque::new(),
            timers: TimerQueue::new(),
            next_bubble_id: 0,
            append_side: INITIAL_APPEND_SIDE,
            prepend_side: INITIAL_PREPEND_SIDE,
            on_scroll_top: None,
            inactive: false,
        }
    }

    pub fn view(&self) -> &V { &self.view }
    pub fn view_mut(&mut self) -> &mut V { &mut self.view }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn num_active_timers(&self) -> usize { self.timers.len() }
    pub fn is_inactive(&self) -> bool { self.inactive }

    pub fn bubbles(&self) -> impl Iterator<Item = &ChatBubble> {
        self.entries.iter().filter_map(|entry| entry.bubble.as_ref().map(|(bubble, _)| bubble))
    }

    fn make_bubble(
        &mut self, message: &str, username: &str, timestamp: UtcDateTime, side: AvatarSide,
        now: UiNow,
    ) -> ChatEntry<V::Element> {
        let id = BubbleId(self.next_bubble_id);
        self.next_bubble_id += 1;
        let bubble = ChatBubble {
            id,
            text: message.to_owned(),
            username: username.to_owned(),
            timestamp,
            initials: avatar_initials(username),
            color: avatar_color(username),
            side,
            time_label: time_label(timestamp, now.utc),
        };
        let element = self.view.render_bubble(&bubble);
        let timer = self.timers.set_interval(now.instant, TIME_LABEL_REFRESH_INTERVAL, id);
        ChatEntry { element, bubble: Some((bubble, timer)) }
    }

    pub fn insert_end(
        &mut self, message: &str, username: &str, timestamp: UtcDateTime, now: UiNow,
    ) {
        let side = self.append_side;
        self.append_side = side.flipped();
        let entry = self.make_bubble(message, username, timestamp, side, now);
        self.view.append(&entry.element);
        self.entries.push_back(entry);
    }

    // Keeps the visible content in place by scrolling down by the new bubble's height.
    pub fn insert_start(
        &mut self, message: &str, username: &str, timestamp: UtcDateTime, now: UiNow,
    ) {
        let side = self.prepend_side;
        self.prepend_side = side.flipped();
        let entry = self.make_bubble(message, username, timestamp, side, now);
        self.prepend_entry(entry, true);
    }

    pub fn insert_start_element(&mut self, element: V::Element, permit_scrolling: bool) {
        self.prepend_entry(ChatEntry { element, bubble: None }, !permit_scrolling);
    }

    pub fn insert_end_element(&mut self, element: V::Element) {
        self.view.append(&element);
        self.entries.push_back(ChatEntry { element, bubble: None });
    }

    fn prepend_entry(&mut self, entry: ChatEntry<V::Element>, keep_scroll: bool) {
        self.view.prepend(&entry.element);
        if keep_scroll {
            let scroll_top = self.view.scroll_metrics().scroll_top;
            let height = self.view.outer_height(&entry.element);
            self.view.set_scroll_top(scroll_top + height);
        }
        self.entries.push_front(entry);
    }

    fn discard(&mut self, entry: ChatEntry<V::Element>) {
        if let Some((_, timer)) = entry.bubble {
            self.timers.clear(timer);
        }
        self.view.remove(&entry.element);
    }

    pub fn remove_start(&mut self, should_scroll_start: bool) {
        if let Some(entry) = self.entries.pop_front() {
            self.discard(entry);
        }
        if should_scroll_start {
            self.scroll_start();
        }
    }

    pub fn remove_end(&mut self) {
        if let Some(entry) = self.entries.pop_back() {
            self.discard(entry);
        }
    }

    pub fn get_start(&self) -> Option<&V::Element> { self.entries.front().map(|e| &e.element) }

    pub fn clear(&mut self) {
        self.view.remove_all();
        self.entries.clear();
        self.timers.clear_all();
        self.append_side = INITIAL_APPEND_SIDE;
        self.prepend_side = INITIAL_PREPEND_SIDE;
    }

    pub fn is_scrolled_end(&self) -> bool {
        let m = self.view.scroll_metrics();
        // Browsers report fractional scroll positions on zoomed pages.
        m.scroll_height - m.scroll_top - m.client_height < 1.0
    }

    pub fn scroll_end(&mut self) {
        let m = self.view.scroll_metrics();
        self.view.set_scroll_top(m.scroll_height - m.client_height);
    }

    pub fn scroll_start(&mut self) { self.view.set_scroll_top(0.0); }

    pub fn is_scrollable(&self) -> bool {
        let m = self.view.scroll_metrics();
        m.scroll_height > SCROLLABLE_THRESHOLD_PX + m.client_height
    }

    // Replaces the previously registered callback, if any.
    pub fn onscrolltop(&mut self, callback: impl FnMut() + 'static) {
        self.on_scroll_top = Some(Box::new(callback));
    }

    // To be called by the view on every scroll event.
    pub fn on_scroll(&mut self) {
        if self.view.scroll_metrics().scroll_top == 0.0 {
            if let Some(callback) = &mut self.on_scroll_top {
                callback();
            }
        }
    }

    pub fn mark_inactive(&mut self) {
        self.inactive = true;
        self.view.set_inactive(true);
    }
    pub fn mark_active(&mut self) {
        self.inactive = false;
        self.view.set_inactive(false);
    }

    // Refreshes relative time labels whose timers are due.
    pub fn refresh(&mut self, now: UiNow) {
        while let Some((_, bubble_id)) = self.timers.pop_due(now.instant) {
            let Some(entry) = self
                .entries
                .iter_mut()
                .find(|entry| matches!(&entry.bubble, Some((bubble, _)) if bubble.id == bubble_id))
            else {
                continue;
            };
            if let Some((bubble, _)) = &mut entry.bubble {
                bubble.time_label = time_label(bubble.timestamp, now.utc);
                self.view.set_time_label(&entry.element, &bubble.time_label);
            }
        }
    }
}
