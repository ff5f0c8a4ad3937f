/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Integration tests that exercise multiple modules together (App +
//! navigator + surface + render). Per-module unit tests live in each
//! module's own `#[cfg(test)] mod tests` block.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyEventState;
use crossterm::event::KeyModifiers;
use graph_picker::FetchError;
use graph_picker::LevelFetcher;
use graph_picker::LoadTicket;
use graph_picker::Node;
use graph_picker::RenderState;
use graph_picker::fetch::decode_level;
use ratatui::backend::TestBackend;
use serde_json::Value;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedReceiver;

use super::*;

/// Unroutable agent address; graph loads fail fast and are ignored.
const NOWHERE: &str = "http://127.0.0.1:1";

/// In-memory agent tree keyed by API path.
struct StaticTree(HashMap<&'static str, Value>);

impl StaticTree {
    fn agent() -> Self {
        Self(HashMap::from([
            (
                "/api",
                json!({"value": {"root": {
                    "agent": {}, "cpu": {}, "disk": {}, "memory": {}, "interface": {}
                }}}),
            ),
            (
                "/api/cpu",
                json!({"value": {"cpu": {"percent": [[12.5], "%"], "count": [[4], "cores"]}}}),
            ),
            (
                "/api/disk",
                json!({"value": {"disk": {"logical": {}, "physical": {}}}}),
            ),
            (
                "/api/disk/logical",
                json!({"value": {"logical": {"sda1": [[12, 15], "B"], "sdb1": [[3], "B"]}}}),
            ),
            (
                "/api/disk/physical",
                json!({"value": {"physical": {"sda": [[1], "B"]}}}),
            ),
            ("/api/memory", json!({"value": {"memory": {}}})),
        ]))
    }
}

#[async_trait]
impl LevelFetcher for StaticTree {
    async fn fetch(&self, path: &str) -> Result<Node, FetchError> {
        match self.0.get(path) {
            Some(body) => decode_level(path, body.to_string().as_bytes()),
            None => Err(FetchError::Status {
                path: path.to_string(),
                status: 404,
            }),
        }
    }
}

fn test_app() -> (App, UnboundedReceiver<AppEvent>) {
    let config = Config::default();
    let (events, completions) = mpsc::unbounded_channel();
    let surface = HttpGraphSurface::new(
        reqwest::Client::new(),
        NOWHERE,
        None,
        None,
        events.clone(),
    );
    let app = App::new(
        &config,
        NOWHERE.to_string(),
        Arc::new(StaticTree::agent()),
        surface,
        events,
        ThemeName::Nord,
    );
    (app, completions)
}

async fn loaded_app() -> (App, UnboundedReceiver<AppEvent>) {
    let (mut app, completions) = test_app();
    let root = app.navigator.initialize();
    app.settle(root).await;
    (app, completions)
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn current_ticket(app: &App) -> LoadTicket {
    match app.navigator.renderer().state() {
        RenderState::Loading { ticket, .. }
        | RenderState::Loaded { ticket, .. }
        | RenderState::Failed { ticket, .. } => *ticket,
        RenderState::Idle => panic!("nothing rendered"),
    }
}

fn fragment(body: &str) -> GraphFragment {
    GraphFragment {
        status: 200,
        content_type: Some("text/html".to_string()),
        size: body.len(),
        head: body.as_bytes().to_vec(),
        fetched_at: Utc::now(),
        elapsed: Duration::from_millis(3),
    }
}

fn screen(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
    terminal.draw(|frame| render::ui(frame, app)).unwrap();
    let buffer = terminal.backend().buffer();
    buffer
        .content
        .chunks(buffer.area.width as usize)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

// Initial load cascades to the first leaf and renders it.
#[tokio::test]
async fn initial_load_cascades_to_first_leaf() {
    let (app, _completions) = loaded_app().await;
    let chain = app.navigator.chain();
    assert_eq!(chain.len(), 2);
    assert_eq!(
        chain.get(0).unwrap().names(),
        &["cpu", "disk", "memory", "interface"]
    );
    assert_eq!(app.navigator.selection_path(), vec!["cpu", "percent"]);
    assert_eq!(
        app.navigator.renderer().current_address(),
        Some("/graph/cpu/percent")
    );
    assert_eq!(app.focus, Cursor::new(2));
}

// Moving the root selection truncates before asking for the next level.
#[tokio::test]
async fn changing_root_truncates_then_fetches() {
    let (mut app, _completions) = loaded_app().await;

    let request = match app.on_key(press(KeyCode::Char('j'))) {
        KeyResult::Fetch(request) => request,
        KeyResult::None => panic!("expected a fetch"),
    };
    assert_eq!(request.path, "/api/disk");
    assert_eq!(request.position, 1);
    assert_eq!(app.navigator.chain().len(), 1);
    assert_eq!(app.focus, Cursor::new(1));

    app.settle(request).await;
    assert_eq!(app.navigator.selection_path(), vec!["disk", "logical", "sda1"]);
    assert_eq!(
        app.navigator.renderer().current_address(),
        Some("/graph/disk/logical/sda1")
    );
}

// Leaf levels render on change and never fetch.
#[tokio::test]
async fn leaf_changes_render_without_fetching() {
    let (mut app, _completions) = loaded_app().await;
    assert!(app.on_key(press(KeyCode::Char('l'))) == KeyResult::None);
    assert_eq!(app.focus.pos(), 1);

    assert_eq!(app.on_key(press(KeyCode::Down)), KeyResult::None);
    assert_eq!(
        app.navigator.renderer().current_address(),
        Some("/graph/cpu/count")
    );
    // Already on the last option.
    assert_eq!(app.on_key(press(KeyCode::Down)), KeyResult::None);
    assert_eq!(app.navigator.chain().get(1).unwrap().selected(), Some(1));
}

// Enter re-fires the selection and re-renders the same URL.
#[tokio::test]
async fn enter_rerenders_same_leaf() {
    let (mut app, _completions) = loaded_app().await;
    app.on_key(press(KeyCode::Right));
    let before = current_ticket(&app);
    assert_eq!(app.on_key(press(KeyCode::Enter)), KeyResult::None);
    let after = current_ticket(&app);
    assert!(after > before);
    assert_eq!(
        app.navigator.renderer().current_address(),
        Some("/graph/cpu/percent")
    );
}

// Option controls rebuild the query on the stored address.
#[tokio::test]
async fn option_keys_rerender_with_query() {
    let (mut app, _completions) = loaded_app().await;

    app.on_key(press(KeyCode::Char('d')));
    assert_eq!(
        app.navigator.renderer().current_address(),
        Some("/graph/cpu/percent?delta=1")
    );
    app.on_key(press(KeyCode::Char('u')));
    assert_eq!(
        app.navigator.renderer().current_address(),
        Some("/graph/cpu/percent?delta=1&unit=k")
    );
    app.on_key(press(KeyCode::Char('U')));
    app.on_key(press(KeyCode::Char('U')));
    app.on_key(press(KeyCode::Char('U')));
    assert_eq!(
        app.navigator.renderer().current_address(),
        Some("/graph/cpu/percent?delta=1&unit=k&units=Percent")
    );
    app.on_key(press(KeyCode::Char('d')));
    app.on_key(press(KeyCode::Char('U')));
    assert_eq!(
        app.navigator.renderer().current_address(),
        Some("/graph/cpu/percent?unit=k")
    );

    // Options survive navigation to a new leaf.
    app.on_key(press(KeyCode::Right));
    app.on_key(press(KeyCode::Char('j')));
    assert_eq!(
        app.navigator.renderer().current_address(),
        Some("/graph/cpu/count?unit=k")
    );
}

// Graph completions are applied only for the current ticket.
#[tokio::test]
async fn graph_completions_respect_tickets() {
    let (mut app, _completions) = loaded_app().await;
    let first = current_ticket(&app);
    app.on_key(press(KeyCode::Char('r')));
    let second = current_ticket(&app);
    assert!(second > first);

    assert!(
        app.handle_event(AppEvent::Graph {
            ticket: first,
            result: Ok(fragment("<old>")),
        })
        .is_none()
    );
    assert!(matches!(
        app.navigator.renderer().state(),
        RenderState::Loading { .. }
    ));
    assert!(app.navigator.renderer().surface().shown().is_none());

    app.handle_event(AppEvent::Graph {
        ticket: second,
        result: Ok(fragment("<svg/>")),
    });
    assert!(matches!(
        app.navigator.renderer().state(),
        RenderState::Loaded { .. }
    ));
    assert_eq!(
        app.navigator.renderer().surface().shown().unwrap().head,
        b"<svg/>"
    );

    app.handle_event(AppEvent::Graph {
        ticket: second,
        result: Err("HTTP 500".to_string()),
    });
    assert!(matches!(
        app.navigator.renderer().state(),
        RenderState::Failed { .. }
    ));
}

// A level whose fetch fails leaves the chain untouched and shows the error.
#[tokio::test]
async fn failed_level_is_shown_inline() {
    let (mut app, _completions) = loaded_app().await;
    // Root order: cpu, disk, memory, interface; "interface" is unknown.
    app.on_key(press(KeyCode::End));
    assert_eq!(app.focus.pos(), 1);
    app.on_key(press(KeyCode::Home));
    for _ in 0..2 {
        if let KeyResult::Fetch(request) = app.on_key(press(KeyCode::Char('j'))) {
            app.settle(request).await;
        }
    }
    let request = match app.on_key(press(KeyCode::Char('j'))) {
        KeyResult::Fetch(request) => request,
        KeyResult::None => panic!("expected a fetch"),
    };
    app.settle(request).await;

    assert_eq!(app.navigator.chain().len(), 1);
    let failure = app.navigator.failure().unwrap();
    assert_eq!(failure.path, "/api/interface");

    let text = screen(&app);
    assert!(text.contains("/api/interface"), "{text}");
    assert!(text.contains("HTTP 404"), "{text}");
}

// Reload starts over from the root.
#[tokio::test]
async fn reload_reinitializes_chain() {
    let (mut app, _completions) = loaded_app().await;
    let request = match app.on_key(press(KeyCode::Char('R'))) {
        KeyResult::Fetch(request) => request,
        KeyResult::None => panic!("expected a fetch"),
    };
    assert_eq!(request.path, "/api");
    assert!(app.navigator.chain().is_empty());
    assert_eq!(app.focus, Cursor::new(0));

    app.settle(request).await;
    assert_eq!(app.navigator.chain().len(), 2);
}

// Quit keys and key releases.
#[tokio::test]
async fn quit_keys_and_releases() {
    let (mut app, _completions) = test_app();
    let release = KeyEvent {
        code: KeyCode::Char('q'),
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    };
    app.on_key(release);
    assert!(!app.should_quit);

    app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit);

    let (mut app, _completions) = test_app();
    app.on_key(press(KeyCode::Esc));
    assert!(app.should_quit);
}

// Keys on an empty chain are harmless.
#[tokio::test]
async fn keys_before_first_level_are_noops() {
    let (mut app, _completions) = test_app();
    for code in [
        KeyCode::Up,
        KeyCode::Down,
        KeyCode::Left,
        KeyCode::Right,
        KeyCode::Enter,
        KeyCode::Char('r'),
        KeyCode::Char('d'),
    ] {
        assert_eq!(app.on_key(press(code)), KeyResult::None);
    }
    assert!(app.navigator.renderer().placeholder_visible());
    assert!(screen(&app).contains("Select a metric to graph it."));
}

// The full frame shows header, chain columns and graph details.
#[tokio::test]
async fn frame_shows_chain_and_graph() {
    let (mut app, _completions) = loaded_app().await;
    let ticket = current_ticket(&app);
    app.handle_event(AppEvent::Graph {
        ticket,
        result: Ok(fragment("<html>\n<img src=\"chart.png\">")),
    });

    let text = screen(&app);
    for needle in [
        "graph-picker",
        NOWHERE,
        "cpu / percent",
        "interface",
        "percent",
        "/graph/cpu/percent",
        "loaded",
        "chart.png",
    ] {
        assert!(text.contains(needle), "missing {needle:?} in\n{text}");
    }
    assert!(!text.contains("agent"), "non-graphable root shown:\n{text}");
}
