/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Interactive TUI for browsing a monitoring agent's metric tree and
//! graphing a metric.
//!
//! The agent exposes its tree at `GET /api/<path>` and graphs at
//! `GET /graph/<path>`. The TUI shows one column per tree level,
//! starting from the graphable root categories; choosing a branch
//! fetches the next level, choosing a leaf loads its graph.
//!
//! Invariants carried by the library and relied on here:
//! - **Prefix chain**: changing a level discards every deeper level
//!   before the next fetch is scheduled.
//! - **Latest request wins**: level fetches run concurrently as
//!   spawned tasks, but only the most recently issued request is
//!   applied; late responses are dropped.
//! - **Ticketed graph loads**: graph loads and polls are tagged with a
//!   load ticket; completions for a replaced graph are dropped, and
//!   the replaced graph's poll task is aborted.
//!
//! ```bash
//! graph-picker-tui --addr 127.0.0.1:5693 --token public
//! ```

mod actions;
mod app;
mod cursor;
mod format;
mod logging;
mod render;
mod surface;
mod theme;

use std::io;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

pub(crate) use actions::*;
use anyhow::Context;
pub(crate) use app::*;
use clap::Parser;
use crossterm::ExecutableCommand;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
pub(crate) use cursor::*;
use graph_picker::Config;
use graph_picker::HttpLevelFetcher;
use graph_picker::client::build_client;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
pub(crate) use surface::*;
pub(crate) use theme::*;

// Terminal setup / teardown

/// Put the terminal into "TUI mode".
///
/// Enables raw mode, switches to the alternate screen, and clears it,
/// returning a `ratatui::Terminal` backed by crossterm.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

/// Restore the terminal back to normal "shell mode".
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Defaults, then the config file and environment, then flags.
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = Config::load(args.config.as_deref()).context("loading configuration")?;
    args.apply(&mut config);
    config.validate().context("validating command-line overrides")?;
    Ok(config)
}

// Main loop

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if !io::stdout().is_terminal() {
        eprintln!("This TUI requires a real terminal.");
        return Ok(());
    }

    let config = load_config(&args)?;
    logging::init(&config.logging)?;

    let (base_url, client) = build_client(&config.agent);
    let fetcher = Arc::new(HttpLevelFetcher::new(
        client.clone(),
        base_url.clone(),
        config.agent.token.clone(),
    ));
    let (events, completions) = tokio::sync::mpsc::unbounded_channel();
    let surface = HttpGraphSurface::new(
        client,
        base_url.clone(),
        config.agent.token.clone(),
        config.graph.refresh_interval(),
        events.clone(),
    );
    let mut app = App::new(&config, base_url, fetcher, surface, events, args.theme);

    // Spinner on stderr while the root level (and its auto-advance
    // cascade) loads, before the alternate screen takes over.
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("spinner template")?,
    );
    spinner.set_message(format!("graph-picker: connecting to {} ...", app.base_url));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let root = app.navigator.initialize();
    app.settle(root).await;
    spinner.finish_and_clear();

    if let Some(failure) = app.navigator.failure() {
        tracing::warn!(error = %failure.error, "initial load failed; starting with an empty chain");
    }

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, app, completions).await;
    restore_terminal(&mut terminal)?;
    result.context("running the TUI")
}

#[cfg(test)]
mod tests;
