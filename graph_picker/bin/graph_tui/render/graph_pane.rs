/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use graph_picker::RenderState;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;

use crate::App;
use crate::format::format_age;
use crate::format::format_local_time;
use crate::format::format_size;
use crate::format::preview_lines;

/// Render the graph area: load details on the left, a preview of the
/// fetched resource on the right. Shows the placeholder until a leaf
/// has been chosen.
pub(crate) fn render_graph_pane(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let l = &app.theme.labels;
    let s = &app.theme.scheme;
    let renderer = app.navigator.renderer();

    if renderer.placeholder_visible() {
        let placeholder = Paragraph::new(Line::from(Span::styled(l.placeholder, s.info))).block(
            Block::default()
                .title(l.pane_graph)
                .borders(Borders::ALL)
                .border_style(s.border),
        );
        frame.render_widget(placeholder, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let label = |text: &'static str| Span::styled(text, s.detail_label);
    let mut lines = Vec::new();

    if let Some(address) = renderer.current_address() {
        lines.push(Line::from(vec![
            label(l.address),
            Span::styled(address.to_string(), s.stat_url),
        ]));
    }

    let (state, state_style) = match renderer.state() {
        RenderState::Idle => ("", s.muted),
        RenderState::Loading { .. } => (l.state_loading, s.detail_status_warn),
        RenderState::Loaded { .. } => (l.state_loaded, s.detail_status_ok),
        RenderState::Failed { .. } => (l.state_failed, s.detail_status_failed),
    };
    let mut state_spans = vec![label(l.state), Span::styled(state, state_style)];
    if renderer.surface().is_polling()
        && let Some(interval) = &app.refresh_interval_label
    {
        state_spans.push(Span::styled(
            format!("  {}{}", l.refresh_icon, interval),
            s.stat_timing,
        ));
    }
    lines.push(Line::from(state_spans));
    if let RenderState::Failed { error, .. } = renderer.state() {
        lines.push(Line::from(vec![
            label(l.error_message),
            Span::styled(error.clone(), s.error),
        ]));
    }

    let shown = renderer.surface().shown();
    if let Some(fragment) = shown {
        lines.push(Line::from(vec![
            label(l.http_status),
            Span::styled(fragment.status.to_string(), s.detail_status_ok),
        ]));
        lines.push(Line::from(vec![
            label(l.content_type),
            Span::raw(fragment.content_type.clone().unwrap_or_else(|| "-".to_string())),
        ]));
        lines.push(Line::from(vec![
            label(l.size),
            Span::raw(format_size(fragment.size)),
        ]));
        lines.push(Line::from(vec![
            label(l.fetched),
            Span::raw(format_local_time(fragment.fetched_at)),
            Span::styled(
                format!(
                    " ({}, {}ms)",
                    format_age(fragment.fetched_at, chrono::Utc::now()),
                    fragment.elapsed.as_millis()
                ),
                s.stat_timing,
            ),
        ]));
    }

    let details = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(l.pane_graph)
            .borders(Borders::ALL)
            .border_style(s.border),
    );
    frame.render_widget(details, chunks[0]);

    let preview_block = Block::default()
        .title(l.pane_preview)
        .borders(Borders::ALL)
        .border_style(s.border);
    let max_lines = preview_block.inner(chunks[1]).height as usize;
    let preview: Vec<Line> = shown
        .map(|fragment| preview_lines(fragment, max_lines))
        .unwrap_or_default()
        .into_iter()
        .map(Line::from)
        .collect();
    frame.render_widget(Paragraph::new(preview).block(preview_block), chunks[1]);
}
