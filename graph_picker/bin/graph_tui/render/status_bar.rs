/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use graph_picker::graph_url::NONE_SENTINEL;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;

use crate::App;
use crate::theme::ColorScheme;
use crate::theme::Labels;
use crate::theme::ThemeName;

/// Render the top status/header bar.
///
/// Line 1: app name • agent URL • delta/unit/units • poll interval.
/// Line 2: the chosen path and the graph address it resolved to.
pub(crate) fn render_header(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let l = &app.theme.labels;
    let s = &app.theme.scheme;

    let options = app.display_options();
    let delta_state = if options.delta { l.on } else { l.off };
    let unit = options.unit.as_deref().unwrap_or(NONE_SENTINEL);
    let units = options.units.as_deref().unwrap_or(NONE_SENTINEL);

    let mut line1_spans = vec![
        Span::styled(l.app_name, s.app_name),
        Span::styled(l.separator, s.stat_label),
        Span::styled(&app.base_url, s.stat_url),
        Span::styled(l.separator, s.stat_label),
        Span::styled(l.delta, s.stat_label),
        Span::styled(delta_state, s.stat_system),
        Span::styled(l.separator, s.stat_label),
        Span::styled(l.unit, s.stat_label),
        Span::styled(unit.to_string(), s.stat_system),
        Span::styled(l.separator, s.stat_label),
        Span::styled(l.units, s.stat_label),
        Span::styled(units.to_string(), s.stat_system),
    ];

    if !matches!(app.theme_name, ThemeName::Nord) {
        line1_spans.extend(vec![
            Span::styled(l.separator, s.stat_label),
            Span::styled(format!("theme:{}", app.theme_name), s.stat_system),
        ]);
    }

    line1_spans.extend(vec![
        Span::styled(l.separator, s.stat_label),
        Span::styled(l.refresh_icon, s.stat_timing),
        Span::styled(
            app.refresh_interval_label
                .clone()
                .unwrap_or_else(|| l.polling_off.to_string()),
            s.stat_timing,
        ),
    ]);

    let path = app.navigator.selection_path();
    let line2_spans = if path.is_empty() {
        vec![Span::styled(l.no_selection, s.info)]
    } else {
        let mut spans = vec![
            Span::styled(l.selection_caret, s.stat_selection),
            Span::styled(path.join(" / "), s.stat_selection),
        ];
        if let Some(address) = app.navigator.renderer().current_address() {
            spans.extend(vec![
                Span::styled(l.separator, s.stat_label),
                Span::styled(address.to_string(), s.stat_url),
            ]);
        }
        spans
    };

    let header = Paragraph::new(vec![Line::from(line1_spans), Line::from(line2_spans)]).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(s.border),
    );

    frame.render_widget(header, area);
}

/// Render the bottom help bar showing the keyboard shortcuts.
pub(crate) fn render_footer(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    scheme: &ColorScheme,
    labels: &Labels,
) {
    let footer = Paragraph::new(labels.footer_help_text)
        .style(scheme.footer_help)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, area);
}
