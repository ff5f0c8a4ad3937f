/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Graph URL composition.
//!
//! `build` maps an API path (or a previously built graph address) and
//! the current [`DisplayOptions`] to the graph resource URL. It is a
//! pure function: identical inputs always produce byte-identical
//! output, with query parameters in the fixed order `delta`, `unit`,
//! `units`.
//!
//! Tree paths carry raw metric names, which may contain `?`, `#` or
//! spaces. Their segments are percent-encoded when the graph URL is
//! built, so the only `?` in a built address is the query separator.

/// Prefix of tree-query paths.
pub const API_PREFIX: &str = "/api";

/// Prefix of graph resource paths.
pub const GRAPH_PREFIX: &str = "/graph";

/// Control value meaning "leave this option out".
pub const NONE_SENTINEL: &str = "None";

/// Display options that only affect the graph query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Graph the per-interval delta rather than the raw counter.
    pub delta: bool,
    /// Unit override; `None` (or the `"None"` sentinel) omits it.
    pub unit: Option<String>,
    /// Units filter; `None` (or the `"None"` sentinel) omits it.
    pub units: Option<String>,
}

impl DisplayOptions {
    /// Build options from raw control values, mapping the `"None"`
    /// sentinel to an absent option.
    pub fn from_controls(delta: bool, unit: &str, units: &str) -> Self {
        Self {
            delta,
            unit: choice(unit),
            units: choice(units),
        }
    }

    /// Query parameters these options produce, in emission order.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::with_capacity(3);
        if self.delta {
            pairs.push(("delta", "1"));
        }
        if let Some(unit) = self.unit.as_deref().and_then(non_sentinel) {
            pairs.push(("unit", unit));
        }
        if let Some(units) = self.units.as_deref().and_then(non_sentinel) {
            pairs.push(("units", units));
        }
        pairs
    }
}

fn choice(value: &str) -> Option<String> {
    non_sentinel(value).map(str::to_string)
}

fn non_sentinel(value: &str) -> Option<&str> {
    if value.is_empty() || value == NONE_SENTINEL {
        None
    } else {
        Some(value)
    }
}

/// Strip any query string from a built `address`. Built addresses
/// have encoded segments, so the first `?` is the separator.
pub fn strip_query(address: &str) -> &str {
    match address.find('?') {
        Some(idx) => &address[..idx],
        None => address,
    }
}

/// Percent-encode each segment of a slash-separated path.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Swap a leading `/api` for `/graph`. Paths without the prefix are
/// returned unchanged.
pub fn graph_path(api_path: &str) -> String {
    match api_path.strip_prefix(API_PREFIX) {
        Some(rest) => format!("{}{}", GRAPH_PREFIX, rest),
        None => api_path.to_string(),
    }
}

/// Compose the graph resource URL for `api_path` under `options`.
///
/// A tree path (`/api/...`) holds raw names: it is encoded segment by
/// segment and never treated as having a query. Anything else is taken
/// to be a previously built address; its query is discarded and the
/// path kept as is, so a stored address can be fed back in when only
/// the options change.
pub fn build(api_path: &str, options: &DisplayOptions) -> String {
    let path = if api_path.starts_with(API_PREFIX) {
        graph_path(&encode_path(api_path))
    } else {
        strip_query(api_path).to_string()
    };
    let query = options
        .query_pairs()
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    if query.is_empty() {
        path
    } else {
        format!("{}?{}", path, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(delta: bool, unit: &str, units: &str) -> DisplayOptions {
        DisplayOptions::from_controls(delta, unit, units)
    }

    #[test]
    fn units_only() {
        assert_eq!(
            build("/api/disk/sda1", &opts(false, "None", "Percent")),
            "/graph/disk/sda1?units=Percent"
        );
    }

    #[test]
    fn delta_only() {
        assert_eq!(build("/api/cpu", &opts(true, "None", "None")), "/graph/cpu?delta=1");
    }

    #[test]
    fn no_options_has_no_trailing_question_mark() {
        assert_eq!(
            build("/api/memory/virtual/used", &opts(false, "None", "None")),
            "/graph/memory/virtual/used"
        );
        assert_eq!(build("/api", &DisplayOptions::default()), "/graph");
    }

    #[test]
    fn all_options_in_fixed_order() {
        assert_eq!(
            build("/api/interface/eth0/bytes_sent", &opts(true, "k", "B")),
            "/graph/interface/eth0/bytes_sent?delta=1&unit=k&units=B"
        );
    }

    #[test]
    fn stale_query_is_discarded() {
        let stored = "/graph/cpu/percent?delta=1&unit=G";
        assert_eq!(build(stored, &opts(false, "None", "None")), "/graph/cpu/percent");
        assert_eq!(
            build(stored, &opts(false, "M", "None")),
            "/graph/cpu/percent?unit=M"
        );
    }

    #[test]
    fn rederiving_is_idempotent() {
        let options = opts(true, "M", "Percent");
        let first = build("/graph/disk/sda1?units=B", &options);
        let second = build("/graph/disk/sda1?units=B", &options);
        assert_eq!(first, second);
        assert_eq!(build(&first, &options), first);
    }

    #[test]
    fn reserved_characters_in_names_are_encoded() {
        let options = opts(true, "None", "B");
        let url = build("/api/interface/Intel(R) PRO 1000 #2?/bytes_sent", &options);
        assert_eq!(
            url,
            "/graph/interface/Intel%28R%29%20PRO%201000%20%232%3F/bytes_sent?delta=1&units=B"
        );

        // Re-deriving from the stored address neither truncates at the
        // encoded `?` nor encodes twice.
        assert_eq!(
            build(&url, &opts(false, "None", "None")),
            "/graph/interface/Intel%28R%29%20PRO%201000%20%232%3F/bytes_sent"
        );
        assert_eq!(build(&url, &options), url);
    }

    #[test]
    fn encode_path_keeps_separators() {
        assert_eq!(encode_path("/api"), "/api");
        assert_eq!(encode_path("/api/disk/C:|"), "/api/disk/C%3A%7C");
    }

    #[test]
    fn only_the_leading_prefix_is_replaced() {
        assert_eq!(
            build("/api/plugins/api", &DisplayOptions::default()),
            "/graph/plugins/api"
        );
        assert_eq!(build("/other/api", &DisplayOptions::default()), "/other/api");
    }

    #[test]
    fn option_values_are_percent_encoded() {
        assert_eq!(
            build("/api/cpu", &opts(false, "%", "None")),
            "/graph/cpu?unit=%25"
        );
    }

    #[test]
    fn sentinel_and_empty_values_are_omitted() {
        let options = DisplayOptions {
            delta: false,
            unit: Some("None".to_string()),
            units: Some(String::new()),
        };
        assert!(options.query_pairs().is_empty());
        assert_eq!(opts(false, "None", "None"), DisplayOptions::default());
    }
}
