mod common;

use common::*;
use futures::executor::block_on;
use proptest::prelude::*;
use roofquote::backend::ApiError;
use roofquote::model::SuggestionList;
use roofquote::{Autocomplete, Config, Estimator, Key, KeyOutcome};
use std::cell::RefCell;

fn widget() -> Autocomplete {
    Autocomplete::from_config(&Config::default())
}

/// Widget showing three suggestions for "123 Main".
fn open_widget() -> Autocomplete {
    let mut w = widget();
    let t = w.input("123 Main");
    assert_eq!(w.debounce_elapsed(t).as_deref(), Some("123 Main"));
    assert!(w.receive(t, Ok(vec![
        suggestion("123 Main St, Springfield"),
        suggestion("123 Main Ave, Shelbyville"),
        suggestion("123 Main Rd, Capital City"),
    ])));
    assert!(w.is_open());
    w
}

proptest! {
    #[test]
    fn short_input_is_always_empty_and_closed(prior in "[a-z ]{3,12}", text in "\\PC{0,2}") {
        let mut w = widget();
        let t0 = w.input(&prior);
        w.receive(t0, Ok(vec![suggestion("previous")]));
        let t = w.input(&text);
        prop_assert!(w.suggestions().is_empty());
        prop_assert!(!w.is_open());
        prop_assert_eq!(w.debounce_elapsed(t), None);
        // Late answers for either ticket cannot reopen it
        prop_assert!(!w.receive(t0, Ok(vec![suggestion("late")])));
        prop_assert!(!w.receive(t, Ok(vec![suggestion("late")])));
        prop_assert!(w.suggestions().is_empty());
        prop_assert!(!w.is_open());
    }
}

#[test]
fn only_latest_ticket_fetches() {
    let mut w = widget();
    let t1 = w.input("123 M");
    let t2 = w.input("123 Ma");
    assert_eq!(w.debounce_elapsed(t1), None);
    assert_eq!(w.debounce_elapsed(t2).as_deref(), Some("123 Ma"));
    assert!(!w.receive(t1, Ok(vec![suggestion("stale")])));
    assert!(w.suggestions().is_empty());
}

#[test]
fn empty_or_failed_response_closes() {
    let mut w = open_widget();
    let t = w.input("123 Main S");
    w.receive(t, Ok(vec![]));
    assert!(!w.is_open() && w.suggestions().is_empty());

    let mut w = open_widget();
    let t = w.input("123 Main S");
    w.receive(t, Err(ApiError::Transport("offline".into())));
    assert!(!w.is_open() && w.suggestions().is_empty());
}

#[test]
fn arrows_wrap_at_both_ends() {
    let mut w = open_widget();
    assert_eq!(w.key(Key::Down), KeyOutcome::Highlighted(0));
    assert_eq!(w.key(Key::Down), KeyOutcome::Highlighted(1));
    assert_eq!(w.key(Key::Down), KeyOutcome::Highlighted(2));
    assert_eq!(w.key(Key::Down), KeyOutcome::Highlighted(0));
    assert_eq!(w.key(Key::Up), KeyOutcome::Highlighted(2));

    let mut w = open_widget();
    assert_eq!(w.key(Key::Up), KeyOutcome::Highlighted(2));
}

#[test]
fn enter_commits_highlighted() {
    let mut w = open_widget();
    assert_eq!(w.key(Key::Enter), KeyOutcome::Consumed);
    assert!(w.is_open());
    w.key(Key::Down);
    w.key(Key::Down);
    assert_eq!(w.key(Key::Enter), KeyOutcome::Committed("123 Main Ave, Shelbyville".into()));
    assert_eq!(w.text(), "123 Main Ave, Shelbyville");
    assert!(!w.is_open());
}

#[test]
fn escape_closes_but_keeps_text() {
    let mut w = open_widget();
    assert_eq!(w.key(Key::Escape), KeyOutcome::Closed);
    assert!(!w.is_open());
    assert_eq!(w.text(), "123 Main");
    assert_eq!(w.key(Key::Down), KeyOutcome::Ignored);
    // Focus brings the held list back
    w.focus();
    assert!(w.is_open());
}

#[test]
fn click_outside_and_hover() {
    let mut w = open_widget();
    w.hover(1);
    assert_eq!(w.highlighted(), Some(1));
    w.hover(9);
    assert_eq!(w.highlighted(), Some(1));
    w.click_outside();
    assert!(!w.is_open());
    assert_eq!(w.text(), "123 Main");
}

#[test]
fn selection_drops_pending_responses() {
    let mut w = open_widget();
    // Typing more keeps the current list until the next response lands
    let pending = w.input("123 Main St");
    assert!(w.is_open());
    assert_eq!(w.select(0).as_deref(), Some("123 Main St, Springfield"));
    assert_eq!(w.text(), "123 Main St, Springfield");
    assert!(!w.receive(pending, Ok(vec![suggestion("again")])));
    assert!(!w.is_open());
    assert_eq!(w.select(5), None);
}

#[test]
fn key_names_map() {
    assert_eq!(Key::from_name("ArrowDown"), Some(Key::Down));
    assert_eq!(Key::from_name("ArrowUp"), Some(Key::Up));
    assert_eq!(Key::from_name("Enter"), Some(Key::Enter));
    assert_eq!(Key::from_name("Escape"), Some(Key::Escape));
    assert_eq!(Key::from_name("a"), None);
}

#[test]
fn refresh_goes_through_backend() {
    let backend = MockBackend::new();
    *backend.suggestions.borrow_mut() = Ok(SuggestionList {
        success: true,
        suggestions: vec![suggestion("1 Infinite Loop, Cupertino, CA")],
        error: None,
    });
    let est = Estimator::new(backend, Config::default());
    let w = RefCell::new(widget());

    let t = w.borrow_mut().input("1 I");
    assert!(block_on(est.refresh_suggestions(&w, t)));
    assert!(w.borrow().is_open());

    // Too short: nothing fetched
    let t = w.borrow_mut().input("1 ");
    assert!(!block_on(est.refresh_suggestions(&w, t)));
    assert_eq!(est.backend().calls(), vec!["suggestions"]);
}

#[test]
fn unsuccessful_listing_is_a_failure() {
    let backend = MockBackend::new();
    *backend.suggestions.borrow_mut() = Ok(SuggestionList {
        success: false,
        suggestions: vec![],
        error: Some("Google Maps API key not configured".into()),
    });
    let est = Estimator::new(backend, Config::default());
    let err = block_on(est.fetch_suggestions("1 Infinite")).unwrap_err();
    assert_eq!(err, ApiError::Rejected("Google Maps API key not configured".into()));
}
