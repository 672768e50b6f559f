mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::TestClock;
use pretty_assertions::assert_eq;
use webchess::message_ui::{AvatarSide, MessageUi, UiNow};
use webchess::test_util::{FAKE_ELEMENT_HEIGHT, FakeMessageView};
use webchess::utc_time::UtcDateTime;


const NOW_MILLIS: i64 = 1_700_000_000_000;

fn utc(offset_seconds: i64) -> UtcDateTime {
    UtcDateTime::from_unix_millis(NOW_MILLIS + offset_seconds * 1000).unwrap()
}

struct ChatFixture {
    chat: MessageUi<FakeMessageView>,
    clock: TestClock,
}

impl ChatFixture {
    fn new() -> Self {
        ChatFixture {
            chat: MessageUi::new(FakeMessageView::new(200.0)),
            clock: TestClock::new(),
        }
    }
    // Both clocks advanced by the same amount.
    fn now(&self, millis: u64) -> UiNow {
        UiNow::new(self.clock.at(millis), utc(millis as i64 / 1000))
    }
}

#[test]
fn append_and_prepend_alternate_independently() {
    let mut fx = ChatFixture::new();
    let now = fx.now(0);
    fx.chat.insert_end("a", "alice", utc(0), now);
    fx.chat.insert_end("b", "bob", utc(0), now);
    fx.chat.insert_start("c", "carol", utc(0), now);
    fx.chat.insert_end("d", "dave", utc(0), now);
    fx.chat.insert_start("e", "erin", utc(0), now);
    assert_eq!(fx.chat.view().texts(), vec!["e", "c", "a", "b", "d"]);
    use AvatarSide::*;
    assert_eq!(fx.chat.view().sides(), vec![
        Some(Left),
        Some(Right),
        Some(Left),
        Some(Right),
        Some(Left),
    ]);
}

#[test]
fn bubble_contents() {
    let mut fx = ChatFixture::new();
    fx.chat.insert_end("hello", "magnus", utc(-300), fx.now(0));
    let bubble = fx.chat.bubbles().next().unwrap().clone();
    assert_eq!(bubble.initials, "MAG");
    assert_eq!(bubble.time_label, "5 minutes ago");
    assert_eq!(bubble.color, webchess::avatar::avatar_color("magnus"));
    assert_eq!(fx.chat.view().nodes[0].username.as_deref(), Some("magnus"));
}

#[test]
fn insert_start_keeps_scroll_position() {
    let mut fx = ChatFixture::new();
    let now = fx.now(0);
    fx.chat.view_mut().scroll_top = 30.0;
    fx.chat.insert_start("old", "alice", utc(-100), now);
    assert_eq!(fx.chat.view().scroll_top, 30.0 + FAKE_ELEMENT_HEIGHT);

    let marker = fx.chat.view_mut().make_element("load more");
    fx.chat.insert_start_element(marker, true);
    assert_eq!(fx.chat.view().scroll_top, 30.0 + FAKE_ELEMENT_HEIGHT);
    assert_eq!(fx.chat.get_start(), Some(&marker));
    assert_eq!(fx.chat.num_active_timers(), 1);
}

#[test]
fn labels_refresh_every_ten_seconds() {
    let mut fx = ChatFixture::new();
    fx.chat.insert_end("hi", "alice", utc(0), fx.now(0));
    assert_eq!(fx.chat.view().nodes[0].time_label.as_deref(), Some("just now"));
    let now = fx.now(9_000);
    fx.chat.refresh(now);
    assert_eq!(fx.chat.view().nodes[0].time_label.as_deref(), Some("just now"));
    for t in (10_000..=130_000).step_by(10_000) {
        let now = fx.now(t);
        fx.chat.refresh(now);
    }
    assert_eq!(fx.chat.view().nodes[0].time_label.as_deref(), Some("2 minutes ago"));
    assert_eq!(fx.chat.bubbles().next().unwrap().time_label, "2 minutes ago");
}

#[test]
fn remove_cancels_timers() {
    let mut fx = ChatFixture::new();
    let now = fx.now(0);
    for text in ["a", "b", "c"] {
        fx.chat.insert_end(text, "alice", utc(0), now);
    }
    let marker = fx.chat.view_mut().make_element("marker");
    fx.chat.insert_end_element(marker);
    assert_eq!(fx.chat.num_active_timers(), 3);

    fx.chat.view_mut().scroll_top = 80.0;
    fx.chat.remove_start(true);
    assert_eq!(fx.chat.view().scroll_top, 0.0);
    fx.chat.remove_end();
    assert_eq!(fx.chat.view().texts(), vec!["b", "c"]);
    assert_eq!(fx.chat.num_active_timers(), 2);
    fx.chat.remove_end();
    assert_eq!(fx.chat.num_active_timers(), 1);
}

#[test]
fn clear_resets_everything() {
    let mut fx = ChatFixture::new();
    let now = fx.now(0);
    fx.chat.insert_end("a", "alice", utc(0), now);
    fx.chat.insert_start("b", "bob", utc(0), now);
    fx.chat.insert_end("c", "carol", utc(0), now);
    fx.chat.clear();
    assert!(fx.chat.is_empty());
    assert!(fx.chat.view().nodes.is_empty());
    assert_eq!(fx.chat.num_active_timers(), 0);
    assert_eq!(fx.chat.get_start(), None);

    // Directions start over.
    fx.chat.insert_end("d", "dave", utc(0), now);
    fx.chat.insert_start("e", "erin", utc(0), now);
    assert_eq!(fx.chat.view().sides(), vec![Some(AvatarSide::Right), Some(AvatarSide::Left)]);

    // Removing from an empty list is harmless.
    fx.chat.clear();
    fx.chat.remove_start(false);
    fx.chat.remove_end();
    let later = fx.now(60_000);
    fx.chat.refresh(later);
    assert!(fx.chat.view().nodes.is_empty());
}

#[test]
fn scroll_helpers() {
    let mut fx = ChatFixture::new();
    let now = fx.now(0);
    // Container is 200px tall; each bubble is 50px.
    for _ in 0..4 {
        fx.chat.insert_end("m", "alice", utc(0), now);
    }
    assert!(!fx.chat.is_scrollable());
    assert!(fx.chat.is_scrolled_end());
    fx.chat.insert_end("m", "alice", utc(0), now);
    assert!(fx.chat.is_scrollable());
    assert!(!fx.chat.is_scrolled_end());
    fx.chat.scroll_end();
    assert_eq!(fx.chat.view().scroll_top, 50.0);
    assert!(fx.chat.is_scrolled_end());
    fx.chat.scroll_start();
    assert_eq!(fx.chat.view().scroll_top, 0.0);
}

#[test]
fn scroll_top_callback() {
    let mut fx = ChatFixture::new();
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));
    fx.chat.on_scroll();
    {
        let first = Rc::clone(&first);
        fx.chat.onscrolltop(move || first.set(first.get() + 1));
    }
    fx.chat.on_scroll();
    fx.chat.view_mut().scroll_top = 10.0;
    fx.chat.on_scroll();
    assert_eq!(first.get(), 1);
    {
        let second = Rc::clone(&second);
        fx.chat.onscrolltop(move || second.set(second.get() + 1));
    }
    fx.chat.view_mut().scroll_top = 0.0;
    fx.chat.on_scroll();
    assert_eq!((first.get(), second.get()), (1, 1));
}

#[test]
fn inactive_marker() {
    let mut fx = ChatFixture::new();
    fx.chat.mark_inactive();
    assert!(fx.chat.view().inactive && fx.chat.is_inactive());
    fx.chat.mark_active();
    assert!(!fx.chat.view().inactive);
}
