//! Property-based tests for backend event handling.
//!
//! Events addressed to a closed tab never change the session, and applying the
//! same event twice leaves the same state as applying it once.

use std::sync::Arc;

use proptest::prelude::*;

use tabshell::managers::navigation_controller::{NavigationConfig, NavigationController};
use tabshell::managers::session_store::{SessionStore, SessionStoreTrait};
use tabshell::services::page_load_backend::PageLoadBackend;
use tabshell::types::events::{BackendEvent, EventOutcome};
use tabshell::types::tab::{SequentialTabIds, TabId};

struct NullBackend;

impl PageLoadBackend for NullBackend {
    fn start_load(&self, _tab_id: &TabId, _url: &str) {}
}

fn controller_with_tabs(count: usize) -> NavigationController {
    let store = SessionStore::new(Box::new(SequentialTabIds::new()), 10);
    let mut nav = NavigationController::new(store, Arc::new(NullBackend), NavigationConfig::default());
    for _ in 1..count {
        nav.open_tab(None);
    }
    nav
}

fn arb_event() -> impl Strategy<Value = BackendEvent> {
    prop_oneof![
        Just(BackendEvent::LoadStarted),
        "[a-zA-Z0-9 ]{0,20}".prop_map(BackendEvent::TitleChanged),
        "https://[a-z]{1,8}\\.com/favicon\\.ico".prop_map(BackendEvent::FaviconChanged),
        Just(BackendEvent::LoadFinished),
        "[a-z ]{1,20}".prop_map(BackendEvent::LoadFailed),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn events_for_closed_tab_never_mutate(
        count in 2..6usize,
        close_idx in 0..6usize,
        events in prop::collection::vec(arb_event(), 1..20),
    ) {
        let mut nav = controller_with_tabs(count);
        let closed = nav.store().tabs()[close_idx % count].id.clone();
        nav.close_tab(&closed).unwrap();
        let before = nav.snapshot();

        for event in events {
            prop_assert_eq!(nav.on_backend_event(&closed, event), EventOutcome::Dropped);
        }

        prop_assert_eq!(nav.snapshot(), before);
    }

    #[test]
    fn events_only_touch_their_own_tab(
        count in 2..6usize,
        target_idx in 0..6usize,
        event in arb_event(),
    ) {
        let mut nav = controller_with_tabs(count);
        let target = nav.store().tabs()[target_idx % count].id.clone();
        let before = nav.snapshot();

        prop_assert_eq!(nav.on_backend_event(&target, event), EventOutcome::Applied);

        let after = nav.snapshot();
        prop_assert_eq!(&after.active_id, &before.active_id);
        for (old, new) in before.tabs.iter().zip(after.tabs.iter()) {
            prop_assert_eq!(&old.id, &new.id);
            if old.id != target {
                prop_assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn applying_an_event_twice_is_idempotent(event in arb_event()) {
        let mut nav = controller_with_tabs(2);
        let id = TabId::from("1");

        nav.on_backend_event(&id, event.clone());
        let once = nav.snapshot();
        nav.on_backend_event(&id, event);

        prop_assert_eq!(nav.snapshot(), once);
    }
}
