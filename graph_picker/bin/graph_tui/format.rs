/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;

use crate::surface::GraphFragment;

/// Label for the graph poll interval ("5s", "250ms"), or `None` when
/// polling is off.
pub(crate) fn format_refresh_label(interval: Option<Duration>) -> Option<String> {
    interval.map(|d| humantime::format_duration(d).to_string())
}

/// Human-readable age of a fetch, relative to `now` (e.g. "just now",
/// "5s ago", "3m 12s ago").
pub(crate) fn format_age(fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let total_secs = now.signed_duration_since(fetched_at).num_seconds();
    if total_secs < 2 {
        "just now".to_string()
    } else if total_secs < 60 {
        format!("{}s ago", total_secs)
    } else if total_secs < 3600 {
        format!("{}m {}s ago", total_secs / 60, total_secs % 60)
    } else {
        format!("{}h {}m ago", total_secs / 3600, (total_secs % 3600) / 60)
    }
}

/// Local wall-clock time of a fetch.
pub(crate) fn format_local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&chrono::Local).format("%H:%M:%S").to_string()
}

/// Byte count with a binary unit suffix.
pub(crate) fn format_size(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Lines of the fragment to show in the preview pane, at most
/// `max_lines`.
pub(crate) fn preview_lines(fragment: &GraphFragment, max_lines: usize) -> Vec<String> {
    if !fragment.is_textual() {
        return vec![format!(
            "<{} of {}>",
            format_size(fragment.size),
            fragment.content_type.as_deref().unwrap_or("binary data")
        )];
    }
    let text = String::from_utf8_lossy(&fragment.head);
    let mut lines: Vec<String> = text
        .lines()
        .take(max_lines)
        .map(|line| line.replace('\t', "    "))
        .collect();
    if fragment.size > fragment.head.len() && lines.len() < max_lines {
        lines.push("…".to_string());
    }
    lines
}
