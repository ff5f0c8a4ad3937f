/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Decoded tree levels.
//!
//! The agent answers `GET /api/<path>` with `{"value": {...}}`. The
//! entries of the `value` object are the children of the requested
//! path. Each child is tagged once, here, as either a further
//! [`ChildDescriptor::Branch`] or a graphable
//! [`ChildDescriptor::LeafSet`]; nothing downstream looks at the raw
//! JSON shape again.

use serde_json::Map;
use serde_json::Value;

/// One child of a tree level.
#[derive(Debug, Clone, PartialEq)]
pub enum ChildDescriptor {
    /// Anything that is not an array. Objects carry further children.
    Branch(Value),
    /// An array value: a terminal, graphable metric.
    LeafSet(Vec<Value>),
}

impl ChildDescriptor {
    /// Tag a raw JSON value. Array-typed values are leaf sets;
    /// everything else is a branch.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => ChildDescriptor::LeafSet(items),
            other => ChildDescriptor::Branch(other),
        }
    }

    /// Whether this child terminates navigation.
    pub fn is_leaf_set(&self) -> bool {
        matches!(self, ChildDescriptor::LeafSet(_))
    }

    /// The child's own entries, when it is a branch holding an object.
    pub fn as_mapping(&self) -> Option<&Map<String, Value>> {
        match self {
            ChildDescriptor::Branch(Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}

/// The children of one tree path, in the order the agent sent them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    children: Vec<(String, ChildDescriptor)>,
}

impl Node {
    /// Build a node from an already-unwrapped mapping.
    ///
    /// Entry order follows the mapping's iteration order, which is
    /// insertion order with `serde_json/preserve_order`.
    pub fn from_mapping(map: Map<String, Value>) -> Self {
        Self {
            children: map
                .into_iter()
                .map(|(name, value)| (name, ChildDescriptor::from_value(value)))
                .collect(),
        }
    }

    /// Decode a full API response body. Returns `None` when the body is
    /// not an object with an object-typed `value` member.
    pub fn from_response(body: Value) -> Option<Self> {
        match body {
            Value::Object(mut outer) => match outer.remove("value") {
                Some(Value::Object(inner)) => Some(Self::from_mapping(inner)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Children in source order.
    pub fn children(&self) -> &[(String, ChildDescriptor)] {
        &self.children
    }

    /// Look up a child by name.
    pub fn child(&self, name: &str) -> Option<&ChildDescriptor> {
        self.children
            .iter()
            .find(|(child, _)| child == name)
            .map(|(_, descriptor)| descriptor)
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True when the level has no children at all.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
