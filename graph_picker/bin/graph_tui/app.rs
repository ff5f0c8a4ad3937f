/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use futures::StreamExt;
use graph_picker::Config;
use graph_picker::DisplayOptions;
use graph_picker::LevelFetcher;
use graph_picker::LevelRequest;
use graph_picker::Navigator;
use graph_picker::Renderer;
use graph_picker::fetch::resolve;
use graph_picker::graph_url::NONE_SENTINEL;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;

use crate::AppEvent;
use crate::Cursor;
use crate::HttpGraphSurface;
use crate::KeyResult;
use crate::Theme;
use crate::ThemeName;
use crate::format::format_refresh_label;
use crate::render::ui;

/// How often the screen is redrawn without input, so fetch ages stay
/// current.
const REDRAW_INTERVAL: Duration = Duration::from_secs(1);

/// Runtime state for the graph picker TUI.
///
/// `App` owns the [`Navigator`] (and through it the graph surface),
/// the level fetcher, the focused chain level, and the display option
/// controls. Level fetches run as spawned tasks; their results come
/// back through the `events` channel.
pub(crate) struct App {
    /// Base URL of the agent (e.g. `http://127.0.0.1:5693`).
    pub(crate) base_url: String,
    pub(crate) navigator: Navigator<HttpGraphSurface>,
    fetcher: Arc<dyn LevelFetcher>,
    events: UnboundedSender<AppEvent>,
    /// Set when the user requests exit (`q` / `Esc` / `Ctrl-C`).
    pub(crate) should_quit: bool,

    /// Focused chain level.
    pub(crate) focus: Cursor,

    pub(crate) delta: bool,
    pub(crate) unit: Cursor,
    pub(crate) units: Cursor,
    pub(crate) unit_choices: Vec<String>,
    pub(crate) units_choices: Vec<String>,

    /// Human-readable graph poll interval; `None` when polling is off.
    pub(crate) refresh_interval_label: Option<String>,

    pub(crate) theme: Theme,
    pub(crate) theme_name: ThemeName,
}

impl App {
    pub(crate) fn new(
        config: &Config,
        base_url: String,
        fetcher: Arc<dyn LevelFetcher>,
        surface: HttpGraphSurface,
        events: UnboundedSender<AppEvent>,
        theme_name: ThemeName,
    ) -> Self {
        let refresh_interval_label = format_refresh_label(surface.poll_interval());
        Self {
            base_url,
            navigator: Navigator::new(config.navigator_settings(), Renderer::new(surface)),
            fetcher,
            events,
            should_quit: false,
            focus: Cursor::new(0),
            delta: false,
            unit: Cursor::new(config.picker.unit_choices.len()),
            units: Cursor::new(config.picker.units_choices.len()),
            unit_choices: config.picker.unit_choices.clone(),
            units_choices: config.picker.units_choices.clone(),
            refresh_interval_label,
            theme: Theme::new(theme_name),
            theme_name,
        }
    }

    /// Display options from the current control values.
    pub(crate) fn display_options(&self) -> DisplayOptions {
        let pick = |choices: &[String], cursor: &Cursor| -> String {
            choices
                .get(cursor.pos())
                .map_or(NONE_SENTINEL, String::as_str)
                .to_string()
        };
        DisplayOptions::from_controls(
            self.delta,
            &pick(&self.unit_choices, &self.unit),
            &pick(&self.units_choices, &self.units),
        )
    }

    /// Apply a completion. Returns a follow-up level request when the
    /// new level auto-advanced.
    pub(crate) fn handle_event(&mut self, event: AppEvent) -> Option<LevelRequest> {
        match event {
            AppEvent::Level(response) => {
                let next = self.navigator.apply(response);
                self.sync_focus();
                next
            }
            AppEvent::Graph { ticket, result } => {
                self.navigator.renderer_mut().loaded(ticket, result);
                None
            }
        }
    }

    /// Fetch `request` in the background; the response arrives as an
    /// [`AppEvent::Level`].
    pub(crate) fn spawn_fetch(&self, request: LevelRequest) {
        let fetcher = Arc::clone(&self.fetcher);
        let events = self.events.clone();
        tokio::spawn(async move {
            let response = resolve(fetcher.as_ref(), request).await;
            if events.send(AppEvent::Level(response)).is_err() {
                tracing::debug!("event loop gone; dropping level response");
            }
        });
    }

    /// Run `request` and every request it cascades into, in place.
    /// Used for the initial load, before the event loop starts.
    pub(crate) async fn settle(&mut self, request: LevelRequest) {
        let mut next = Some(request);
        while let Some(request) = next {
            let response = resolve(self.fetcher.as_ref(), request).await;
            next = self.handle_event(AppEvent::Level(response));
        }
    }

    fn sync_focus(&mut self) {
        self.focus.update_len(self.navigator.chain().len());
    }

    /// Move the selection at the focused level by one option.
    fn step_selection(&mut self, forward: bool) -> KeyResult {
        let level = self.focus.pos();
        let Some(widget) = self.navigator.chain().get(level) else {
            return KeyResult::None;
        };
        let mut choice = Cursor::new(widget.names().len());
        choice.set_pos(widget.selected().unwrap_or(0));
        let moved = if forward {
            choice.move_down()
        } else {
            choice.move_up()
        };
        if !moved {
            return KeyResult::None;
        }
        self.select(level, choice.pos())
    }

    fn select(&mut self, level: usize, index: usize) -> KeyResult {
        let next = self.navigator.select(level, index);
        self.sync_focus();
        next.map_or(KeyResult::None, KeyResult::Fetch)
    }

    fn apply_options(&mut self) {
        let options = self.display_options();
        self.navigator.set_options(options);
    }

    /// Handle a single keypress.
    pub(crate) fn on_key(&mut self, key: KeyEvent) -> KeyResult {
        if key.kind != KeyEventKind::Press {
            return KeyResult::None;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                KeyResult::None
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                KeyResult::None
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.focus.move_up();
                KeyResult::None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.focus.move_down();
                KeyResult::None
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.focus.home();
                KeyResult::None
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.focus.end();
                KeyResult::None
            }
            KeyCode::Up | KeyCode::Char('k') => self.step_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.step_selection(true),
            KeyCode::Enter => {
                // Re-fire the current choice, like re-selecting it.
                let level = self.focus.pos();
                match self.navigator.chain().get(level).and_then(|w| w.selected()) {
                    Some(index) => self.select(level, index),
                    None => KeyResult::None,
                }
            }
            KeyCode::Char('d') => {
                self.delta = !self.delta;
                self.apply_options();
                KeyResult::None
            }
            KeyCode::Char('u') => {
                if self.unit.cycle() {
                    self.apply_options();
                }
                KeyResult::None
            }
            KeyCode::Char('U') => {
                if self.units.cycle() {
                    self.apply_options();
                }
                KeyResult::None
            }
            KeyCode::Char('r') => {
                self.navigator.refresh();
                KeyResult::None
            }
            KeyCode::Char('R') => {
                let request = self.navigator.initialize();
                self.sync_focus();
                KeyResult::Fetch(request)
            }
            _ => KeyResult::None,
        }
    }
}

/// Drive the main event loop.
///
/// Redraws after every key press, completion, or redraw tick, and
/// schedules the level fetches the navigator asks for.
pub(crate) async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    mut completions: UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);
    let mut events = EventStream::new();

    loop {
        terminal.draw(|frame| ui(frame, &app))?;

        tokio::select! {
            _ = redraw.tick() => {}
            Some(event) = completions.recv() => {
                if let Some(request) = app.handle_event(event) {
                    app.spawn_fetch(request);
                }
            }
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        if let KeyResult::Fetch(request) = app.on_key(key) {
                            app.spawn_fetch(request);
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e),
                    None => break,
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
