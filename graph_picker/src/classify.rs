/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Level classification: which names a level offers, and whether
//! choosing one descends further or graphs a metric.

use std::borrow::Cow;

use crate::node::ChildDescriptor;
use crate::node::Node;

/// Selection key of the first chain level.
pub const ROOT_KEY: &str = "root";

/// Root categories offered for navigation by default. The agent
/// exposes other root keys (services, processes, plugins, ...) that
/// cannot be graphed.
pub const DEFAULT_GRAPHABLES: [&str; 4] = ["disk", "interface", "memory", "cpu"];

/// How a level's change events are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelMode {
    /// Selecting a name fetches the next level.
    Branch,
    /// Selecting a name renders a graph.
    LeafSet,
}

/// Result of classifying one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Names offered for selection, in source order.
    pub names: Vec<String>,
    /// Branch unless at least one surviving child is a leaf set.
    pub mode: LevelMode,
}

/// Classify the children of `node`, fetched under `selection_key`.
///
/// The agent wraps a node's children under the node's own name
/// (`{"value": {"disk": {...}}}`), so when `node` holds an object
/// child named `selection_key` that object is the level. Otherwise the
/// node's own entries are the level.
///
/// At the root, names outside `graphables` are dropped before the
/// mode is decided. A single array child anywhere in the level flips
/// the whole level to [`LevelMode::LeafSet`].
pub fn classify<S: AsRef<str>>(
    node: &Node,
    selection_key: &str,
    graphables: &[S],
) -> Classification {
    let scoped: Cow<'_, Node> = match node
        .child(selection_key)
        .and_then(ChildDescriptor::as_mapping)
    {
        Some(inner) => Cow::Owned(Node::from_mapping(inner.clone())),
        None => Cow::Borrowed(node),
    };

    let at_root = selection_key == ROOT_KEY;
    let mut names = Vec::with_capacity(scoped.len());
    let mut mode = LevelMode::Branch;
    for (name, descriptor) in scoped.children() {
        if at_root && !graphables.iter().any(|g| g.as_ref() == name) {
            continue;
        }
        if descriptor.is_leaf_set() {
            mode = LevelMode::LeafSet;
        }
        names.push(name.clone());
    }

    Classification { names, mode }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use serde_json::json;

    use super::*;

    fn node(value: Value) -> Node {
        Node::from_response(json!({ "value": value })).unwrap()
    }

    #[test]
    fn root_hides_non_graphable_categories() {
        let n = node(json!({
            "agent": {}, "cpu": {}, "services": {}, "disk": {},
            "processes": [], "memory": {}, "plugins": {}, "interface": {}
        }));
        let c = classify(&n, ROOT_KEY, &DEFAULT_GRAPHABLES);
        assert_eq!(c.names, vec!["cpu", "disk", "memory", "interface"]);
        assert_eq!(c.mode, LevelMode::Branch);
    }

    #[test]
    fn filtered_root_arrays_do_not_flip_mode() {
        // "processes" is an array but is not graphable, so it never
        // survives filtering and cannot flip the level.
        let n = node(json!({"processes": [], "cpu": {}}));
        let c = classify(&n, ROOT_KEY, &DEFAULT_GRAPHABLES);
        assert_eq!(c.names, vec!["cpu"]);
        assert_eq!(c.mode, LevelMode::Branch);
    }

    #[test]
    fn root_never_returns_names_outside_graphables() {
        let n = node(json!({
            "cpu": {}, "user": {}, "system": [], "disk": [], "x": 1, "memory": {}
        }));
        let c = classify(&n, ROOT_KEY, &DEFAULT_GRAPHABLES);
        for name in &c.names {
            assert!(DEFAULT_GRAPHABLES.contains(&name.as_str()), "{name}");
        }
        assert_eq!(c.mode, LevelMode::LeafSet);
    }

    #[test]
    fn unwraps_children_nested_under_selection_key() {
        let n = node(json!({"root": {"disk": {}, "cpu": {}, "services": {}}}));
        let c = classify(&n, ROOT_KEY, &DEFAULT_GRAPHABLES);
        assert_eq!(c.names, vec!["disk", "cpu"]);

        let n = node(json!({"disk": {"logical": {}, "physical": {}}}));
        let c = classify(&n, "disk", &DEFAULT_GRAPHABLES);
        assert_eq!(c.names, vec!["logical", "physical"]);
    }

    #[test]
    fn leaf_set_when_any_child_is_an_array() {
        let n = node(json!({"sda1": [[12, 15], "B"]}));
        let c = classify(&n, "disk", &DEFAULT_GRAPHABLES);
        assert_eq!(c.names, vec!["sda1"]);
        assert_eq!(c.mode, LevelMode::LeafSet);
    }

    #[test]
    fn mixed_level_is_leaf_set() {
        let n = node(json!({"free": {}, "used": [10, "GiB"], "total": {}}));
        let c = classify(&n, "memory", &DEFAULT_GRAPHABLES);
        assert_eq!(c.names, vec!["free", "used", "total"]);
        assert_eq!(c.mode, LevelMode::LeafSet);
    }

    #[test]
    fn branch_only_level_stays_branch() {
        let n = node(json!({"virtual": {}, "swap": {}}));
        let c = classify(&n, "memory", &DEFAULT_GRAPHABLES);
        assert_eq!(c.mode, LevelMode::Branch);
    }

    #[test]
    fn empty_level_yields_no_names() {
        let c = classify(&node(json!({})), "disk", &DEFAULT_GRAPHABLES);
        assert!(c.names.is_empty());
        assert_eq!(c.mode, LevelMode::Branch);

        let c = classify(&node(json!({"agent": {}})), ROOT_KEY, &DEFAULT_GRAPHABLES);
        assert!(c.names.is_empty());
    }

    #[test]
    fn non_root_levels_are_not_filtered() {
        let n = node(json!({"services": {}, "eth0": {}}));
        let c = classify(&n, "interface", &DEFAULT_GRAPHABLES);
        assert_eq!(c.names, vec!["services", "eth0"]);
    }

    #[test]
    fn custom_graphables_apply_at_root() {
        let n = node(json!({"cpu": {}, "disk": {}, "services": {}}));
        let graphables = vec!["services".to_string()];
        let c = classify(&n, ROOT_KEY, &graphables);
        assert_eq!(c.names, vec!["services"]);
    }
}
