use pretty_assertions::assert_eq;
use webchess::online_users::OnlineUsers;
use webchess::test_util::FakePresenceView;


#[test]
fn duplicate_insert_is_noop() {
    let mut users = OnlineUsers::new(FakePresenceView::default());
    users.insert("alice");
    users.insert("alice");
    assert_eq!(users.view().usernames(), vec!["alice"]);
    assert_eq!(users.view().num_appends, 1);
    assert_eq!(users.len(), 1);
}

#[test]
fn keys_are_exact() {
    let mut users = OnlineUsers::new(FakePresenceView::default());
    users.insert("alice");
    users.insert("Alice");
    users.insert("alice ");
    assert_eq!(users.len(), 3);
    assert_eq!(users.view().rows[1].initials, "ALI");
}

#[test]
fn remove() {
    let mut users = OnlineUsers::new(FakePresenceView::default());
    users.insert("alice");
    users.insert("bob");
    users.insert("carol");
    users.remove("bob");
    users.remove("bob");
    users.remove("dave");
    assert!(!users.contains("bob"));
    assert_eq!(users.usernames().collect::<Vec<_>>(), vec!["alice", "carol"]);
    assert_eq!(users.view().usernames(), vec!["alice", "carol"]);

    // Can come back after leaving.
    users.insert("bob");
    assert_eq!(users.usernames().collect::<Vec<_>>(), vec!["alice", "carol", "bob"]);
}

#[test]
fn clear() {
    let mut users = OnlineUsers::new(FakePresenceView::default());
    users.insert("alice");
    users.insert("bob");
    users.clear();
    assert!(users.is_empty());
    assert!(users.view().rows.is_empty());
    users.insert("alice");
    assert_eq!(users.view().usernames(), vec!["alice"]);
}
