/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use graph_picker::LevelMode;
use graph_picker::LevelWidget;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::ListState;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;

use crate::App;

const MIN_COLUMN_WIDTH: u16 = 12;
const MAX_COLUMN_WIDTH: u16 = 32;

/// Width of a level column: the widest name (or title) plus the caret,
/// marker and borders, clamped.
pub(crate) fn column_width<'a>(title: &str, names: impl Iterator<Item = &'a str>) -> u16 {
    let widest = names
        .map(|n| n.chars().count())
        .chain(std::iter::once(title.chars().count()))
        .max()
        .unwrap_or(0);
    u16::try_from(widest + 6)
        .unwrap_or(MAX_COLUMN_WIDTH)
        .clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
}

/// Trailing column after the chain: an in-flight fetch or the last
/// failure.
enum Pending<'a> {
    Loading { title: &'a str, path: &'a str },
    Failed { path: &'a str, message: String },
}

/// Render the selection chain: one column per level, root first,
/// followed by a loading or error column when applicable.
pub(crate) fn render_chain_pane(frame: &mut ratatui::Frame<'_>, area: Rect, app: &App) {
    let l = &app.theme.labels;
    let s = &app.theme.scheme;
    let chain = app.navigator.chain();

    let block = Block::default()
        .title(l.pane_chain)
        .borders(Borders::ALL)
        .border_style(s.border);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let pending = if let Some(request) = app.navigator.in_flight() {
        Some(Pending::Loading {
            title: &request.selection_key,
            path: &request.path,
        })
    } else {
        app.navigator.failure().map(|failure| Pending::Failed {
            path: &failure.path,
            message: failure.error.to_string(),
        })
    };

    let mut constraints: Vec<Constraint> = chain
        .iter()
        .map(|level| {
            Constraint::Length(column_width(
                level.selection_key(),
                level.names().iter().map(String::as_str),
            ))
        })
        .collect();
    if pending.is_some() {
        constraints.push(Constraint::Min(MIN_COLUMN_WIDTH * 2));
    }
    constraints.push(Constraint::Fill(1));

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(inner);

    for (index, level) in chain.iter().enumerate() {
        render_level(frame, columns[index], app, level, index == app.focus.pos());
    }

    if let Some(pending) = pending {
        let area = columns[chain.len()];
        let (title, lines, style) = match pending {
            Pending::Loading { title, path } => (
                title.to_string(),
                vec![Line::from(l.loading), Line::from(path.to_string())],
                s.info,
            ),
            Pending::Failed { path, message } => (
                path.to_string(),
                vec![
                    Line::from(Span::styled(l.error_message, s.detail_label)),
                    Line::from(message),
                ],
                s.error,
            ),
        };
        let paragraph = Paragraph::new(lines)
            .style(style)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(style),
            );
        frame.render_widget(paragraph, area);
    }
}

fn render_level(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    app: &App,
    level: &LevelWidget,
    focused: bool,
) {
    let l = &app.theme.labels;
    let s = &app.theme.scheme;
    let marker = match level.mode() {
        LevelMode::Branch => l.branch_marker,
        LevelMode::LeafSet => l.leaf_marker,
    };
    let name_style = s.level_style(level.mode());

    let items: Vec<ListItem> = if level.is_inert() {
        vec![ListItem::new(Span::styled(l.empty_level, s.muted))]
    } else {
        level
            .names()
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let selected = level.selected() == Some(i);
                let (caret, style) = if selected {
                    (
                        l.selection_caret,
                        s.stat_selection.add_modifier(Modifier::BOLD),
                    )
                } else {
                    ("  ", name_style)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(caret, style),
                    Span::styled(format!("{} ", marker), name_style),
                    Span::styled(name.as_str(), style),
                ]))
            })
            .collect()
    };

    let border_style = if focused {
        s.border_focused
    } else {
        s.border
    };
    let list = List::new(items)
        .block(
            Block::default()
                .title(level.selection_key())
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .highlight_style(Style::default());
    let mut state = ListState::default().with_selected(level.selected());
    frame.render_stateful_widget(list, area, &mut state);
}
