/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use graph_picker::Config;
use graph_picker::LevelMode;
use graph_picker::config::CONFIG_ENV;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

/// Selectable color theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ThemeName {
    /// Nord, an arctic, north-bluish color palette.
    #[default]
    Nord,
    /// doom-nord-light: desaturated Nord accents for light backgrounds.
    DoomNordLight,
}

impl std::fmt::Display for ThemeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeName::Nord => write!(f, "nord"),
            ThemeName::DoomNordLight => write!(f, "doom-nord-light"),
        }
    }
}

/// Command-line arguments for the graph picker TUI.
///
/// Flags override the config file and `GRAPH_PICKER_*` variables.
#[derive(Debug, Default, Parser)]
#[command(name = "graph-picker-tui", about = "Browse and graph a monitoring agent's metrics")]
pub(crate) struct Args {
    /// TOML config file
    #[arg(long, env = CONFIG_ENV)]
    pub(crate) config: Option<PathBuf>,

    /// Agent address (e.g., 127.0.0.1:5693 or https://host:5693)
    #[arg(long, short)]
    pub(crate) addr: Option<String>,

    /// Access token sent with every request
    #[arg(long)]
    pub(crate) token: Option<String>,

    /// PEM CA certificate; enables TLS
    #[arg(long)]
    pub(crate) tls_ca: Option<PathBuf>,

    /// PEM client certificate for mutual TLS
    #[arg(long)]
    pub(crate) tls_cert: Option<PathBuf>,

    /// PEM client key for mutual TLS
    #[arg(long)]
    pub(crate) tls_key: Option<PathBuf>,

    /// Graph poll interval in milliseconds (0 disables polling)
    #[arg(long)]
    pub(crate) refresh_ms: Option<u64>,

    /// Color theme
    #[arg(long, default_value_t = ThemeName::Nord, value_enum)]
    pub(crate) theme: ThemeName,
}

impl Args {
    /// Layer the flags that were given over `config`.
    pub(crate) fn apply(&self, config: &mut Config) {
        if let Some(addr) = &self.addr {
            config.agent.addr = addr.clone();
        }
        if let Some(token) = &self.token {
            config.agent.token = Some(token.clone());
        }
        if let Some(ca) = &self.tls_ca {
            config.agent.tls_ca = Some(ca.clone());
        }
        if let Some(cert) = &self.tls_cert {
            config.agent.tls_cert = Some(cert.clone());
        }
        if let Some(key) = &self.tls_key {
            config.agent.tls_key = Some(key.clone());
        }
        if let Some(refresh_ms) = self.refresh_ms {
            config.graph.refresh_ms = refresh_ms;
        }
    }
}

/// All user-visible text in the TUI.
pub(crate) struct Labels {
    pub(crate) app_name: &'static str,

    pub(crate) separator: &'static str,
    pub(crate) selection_caret: &'static str,
    pub(crate) refresh_icon: &'static str,
    pub(crate) no_selection: &'static str,
    pub(crate) polling_off: &'static str,

    // Header
    pub(crate) delta: &'static str,
    pub(crate) unit: &'static str,
    pub(crate) units: &'static str,
    pub(crate) on: &'static str,
    pub(crate) off: &'static str,

    // Chain pane
    pub(crate) branch_marker: &'static str,
    pub(crate) leaf_marker: &'static str,
    pub(crate) loading: &'static str,
    pub(crate) empty_level: &'static str,

    // Graph pane
    pub(crate) placeholder: &'static str,
    pub(crate) address: &'static str,
    pub(crate) state: &'static str,
    pub(crate) state_loading: &'static str,
    pub(crate) state_loaded: &'static str,
    pub(crate) state_failed: &'static str,
    pub(crate) http_status: &'static str,
    pub(crate) content_type: &'static str,
    pub(crate) size: &'static str,
    pub(crate) fetched: &'static str,
    pub(crate) error_message: &'static str,

    // Pane titles
    pub(crate) pane_chain: &'static str,
    pub(crate) pane_graph: &'static str,
    pub(crate) pane_preview: &'static str,

    pub(crate) footer_help_text: &'static str,
}

impl Labels {
    /// English label set.
    pub(crate) fn en() -> Self {
        Self {
            app_name: "graph-picker",
            separator: " • ",
            selection_caret: "▸ ",
            refresh_icon: "⟳ ",
            no_selection: "No selection",
            polling_off: "manual",
            delta: "delta:",
            unit: "unit:",
            units: "units:",
            on: "on",
            off: "off",
            branch_marker: "▶",
            leaf_marker: "◆",
            loading: "loading…",
            empty_level: "(empty)",
            placeholder: "Select a metric to graph it.",
            address: "Address: ",
            state: "State: ",
            state_loading: "loading",
            state_loaded: "loaded",
            state_failed: "failed",
            http_status: "HTTP: ",
            content_type: "Type: ",
            size: "Size: ",
            fetched: "Fetched: ",
            error_message: "Error: ",
            pane_chain: "Metrics",
            pane_graph: "Graph",
            pane_preview: "Preview",
            footer_help_text: "q: quit | h/l: level | j/k: choose | Enter: redraw | d: delta | u/U: unit/units | r: refresh | R: reload",
        }
    }
}

/// Color scheme for the TUI.
///
/// Each field is a semantic role; themes assign concrete colors.
pub(crate) struct ColorScheme {
    // UI chrome
    pub(crate) app_name: Style,
    pub(crate) border: Style,
    pub(crate) border_focused: Style,

    // Level kinds
    pub(crate) level_branch: Style,
    pub(crate) level_leaf: Style,

    // Semantic states
    pub(crate) error: Style,
    pub(crate) info: Style,
    pub(crate) muted: Style,

    // Header stats
    pub(crate) stat_timing: Style,
    pub(crate) stat_selection: Style,
    pub(crate) stat_system: Style,
    pub(crate) stat_url: Style,
    pub(crate) stat_label: Style,

    // Graph pane
    pub(crate) detail_label: Style,
    pub(crate) detail_status_ok: Style,
    pub(crate) detail_status_warn: Style,
    pub(crate) detail_status_failed: Style,
    pub(crate) footer_help: Style,
}

impl ColorScheme {
    /// Nord color scheme (https://www.nordtheme.com/).
    pub(crate) fn nord() -> Self {
        // Polar Night
        let polar3 = Color::Rgb(76, 86, 106); // #4C566A
        // Snow Storm
        let snow0 = Color::Rgb(216, 222, 233); // #D8DEE9
        // Frost
        let frost_teal = Color::Rgb(143, 188, 187); // #8FBCBB
        let frost_cyan = Color::Rgb(136, 192, 208); // #88C0D0
        let frost_blue = Color::Rgb(129, 161, 193); // #81A1C1
        let frost_dark = Color::Rgb(94, 129, 172); // #5E81AC
        // Aurora
        let aurora_red = Color::Rgb(191, 97, 106); // #BF616A
        let aurora_orange = Color::Rgb(208, 135, 112); // #D08770
        let aurora_yellow = Color::Rgb(235, 203, 139); // #EBCB8B
        let aurora_green = Color::Rgb(163, 190, 140); // #A3BE8C
        let aurora_purple = Color::Rgb(180, 142, 173); // #B48EAD

        Self {
            app_name: Style::default().fg(frost_cyan).add_modifier(Modifier::BOLD),
            border: Style::default().fg(polar3),
            border_focused: Style::default().fg(frost_cyan),

            level_branch: Style::default().fg(frost_blue),
            level_leaf: Style::default().fg(aurora_green),

            error: Style::default().fg(aurora_red),
            info: Style::default().fg(frost_cyan),
            muted: Style::default().fg(polar3),

            stat_timing: Style::default().fg(aurora_yellow),
            stat_selection: Style::default().fg(aurora_purple),
            stat_system: Style::default().fg(frost_dark),
            stat_url: Style::default().fg(polar3),
            stat_label: Style::default().fg(snow0),

            detail_label: Style::default().fg(frost_teal),
            detail_status_ok: Style::default().fg(aurora_green),
            detail_status_warn: Style::default().fg(aurora_orange),
            detail_status_failed: Style::default().fg(aurora_red).add_modifier(Modifier::BOLD),
            footer_help: Style::default().fg(polar3),
        }
    }

    /// doom-nord-light color scheme.
    ///
    /// Source: doom-nord-light-theme.el
    pub(crate) fn doom_nord_light() -> Self {
        let base7 = Color::Rgb(96, 114, 140); // #60728C
        let fg = Color::Rgb(59, 66, 82); // #3B4252
        let red = Color::Rgb(153, 50, 75); // #99324B
        let orange = Color::Rgb(172, 68, 38); // #AC4426
        let green = Color::Rgb(79, 137, 76); // #4F894C
        let yellow = Color::Rgb(154, 117, 0); // #9A7500
        let blue = Color::Rgb(59, 110, 168); // #3B6EA8
        let dark_blue = Color::Rgb(82, 114, 175); // #5272AF
        let teal = Color::Rgb(41, 131, 141); // #29838D
        let cyan = Color::Rgb(57, 142, 172); // #398EAC
        let violet = Color::Rgb(132, 40, 121); // #842879

        Self {
            app_name: Style::default().fg(teal).add_modifier(Modifier::BOLD),
            border: Style::default().fg(base7),
            border_focused: Style::default().fg(cyan),

            level_branch: Style::default().fg(blue),
            level_leaf: Style::default().fg(green),

            error: Style::default().fg(red),
            info: Style::default().fg(cyan),
            muted: Style::default().fg(base7),

            stat_timing: Style::default().fg(yellow),
            stat_selection: Style::default().fg(violet),
            stat_system: Style::default().fg(dark_blue),
            stat_url: Style::default().fg(base7),
            stat_label: Style::default().fg(fg),

            detail_label: Style::default().fg(teal),
            detail_status_ok: Style::default().fg(green),
            detail_status_warn: Style::default().fg(orange),
            detail_status_failed: Style::default().fg(red).add_modifier(Modifier::BOLD),
            footer_help: Style::default().fg(base7),
        }
    }

    /// Style for names offered at a level of the given mode.
    pub(crate) fn level_style(&self, mode: LevelMode) -> Style {
        match mode {
            LevelMode::Branch => self.level_branch,
            LevelMode::LeafSet => self.level_leaf,
        }
    }
}

/// Complete visual presentation: colors and text.
pub(crate) struct Theme {
    pub(crate) scheme: ColorScheme,
    pub(crate) labels: Labels,
}

impl Theme {
    pub(crate) fn new(theme_name: ThemeName) -> Self {
        let scheme = match theme_name {
            ThemeName::Nord => ColorScheme::nord(),
            ThemeName::DoomNordLight => ColorScheme::doom_nord_light(),
        };
        Self {
            scheme,
            labels: Labels::en(),
        }
    }
}
