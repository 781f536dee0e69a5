//! Tabshell: tab and session core for a desktop browser shell.
//!
//! Entry point: runs a console walkthrough of the session state machine
//! against the simulated page load backend.

use std::sync::Arc;
use std::time::Duration;

use tabshell::managers::navigation_controller::{NavigationConfig, NavigationController};
use tabshell::managers::session_store::{SessionStore, SessionStoreTrait};
use tabshell::services::page_load_backend::SimulatedBackend;
use tabshell::types::settings::SearchEngine;
use tabshell::types::tab::SequentialTabIds;

const LATENCY: Duration = Duration::from_millis(20);

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tabshell::logging::init("warn");

    println!();
    println!("══════════════════════════════════════════════════════════════");
    println!("  Tabshell v{} — Demo Mode", env!("CARGO_PKG_VERSION"));
    println!("══════════════════════════════════════════════════════════════");
    println!();

    let (backend, mut events) = SimulatedBackend::channel(LATENCY);
    let store = SessionStore::new(Box::new(SequentialTabIds::new()), 50);
    let config = NavigationConfig {
        search_engine: SearchEngine::builtin().into_iter().next(),
        notifications_enabled: true,
    };
    let mut nav = NavigationController::new(store, Arc::new(backend), config);
    let mut diagnostics = nav.diagnostics();

    section("Initial session");
    print_strip(&nav);

    section("Open a tab and navigate it");
    let second = nav.open_tab(None);
    if let Ok(url) = nav.navigate_to("example.com") {
        println!("  navigating tab {} to {}", second, url);
    }
    print_strip(&nav);
    settle(&mut nav, &mut events).await;
    print_strip(&nav);

    section("Search from the address bar, then go back");
    let _ = nav.navigate_to("tab state machines");
    settle(&mut nav, &mut events).await;
    if let Ok(Some(url)) = nav.go_back() {
        println!("  back to {}", url);
    }
    settle(&mut nav, &mut events).await;
    print_strip(&nav);

    section("Close a tab while it is loading");
    let third = nav.open_tab(None);
    let _ = nav.navigate_to("https://slow.example.org");
    let _ = nav.close_tab(&third);
    settle(&mut nav, &mut events).await;
    print_strip(&nav);

    section("Load failure");
    let _ = nav.navigate_to("gopher://old.example.net");
    settle(&mut nav, &mut events).await;
    while let Ok(notification) = diagnostics.try_recv() {
        println!("  [{:?}] {}: {}", notification.kind, notification.title, notification.message);
    }
    print_strip(&nav);

    section("Close every tab");
    for id in nav.snapshot().ids() {
        let _ = nav.close_tab(&id);
    }
    print_strip(&nav);
    println!();
}

fn section(name: &str) {
    println!("──────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("──────────────────────────────────────────────────────────────");
}

/// Waits out the simulated latency and applies whatever the backend reported.
async fn settle(
    nav: &mut NavigationController,
    events: &mut tokio::sync::mpsc::UnboundedReceiver<tabshell::types::events::TabEvent>,
) {
    tokio::time::sleep(LATENCY * 3).await;
    nav.drain(events);
}

fn print_strip(nav: &NavigationController) {
    for tab in nav.store().tabs() {
        println!(
            "  {} [{}] {:<24} {}{}",
            if tab.is_active { "*" } else { " " },
            tab.id,
            tab.title,
            tab.url,
            if tab.is_loading { "  (loading)" } else { "" }
        );
    }
    println!();
}
