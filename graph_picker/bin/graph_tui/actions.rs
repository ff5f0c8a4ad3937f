/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use graph_picker::LevelRequest;
use graph_picker::LevelResponse;
use graph_picker::LoadTicket;

use crate::surface::GraphFragment;

/// Result of handling a key event.
#[derive(Debug, PartialEq)]
pub(crate) enum KeyResult {
    /// Nothing to schedule.
    None,
    /// The navigator wants a level fetched.
    Fetch(LevelRequest),
}

/// Completions delivered to the event loop.
#[derive(Debug)]
pub(crate) enum AppEvent {
    /// A level fetch finished.
    Level(LevelResponse),
    /// A graph load (or poll) finished.
    Graph {
        ticket: LoadTicket,
        result: Result<GraphFragment, String>,
    },
}
