/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! The graph display area.
//!
//! [`Renderer`] is the only writer of the display surface and of the
//! "current address" (the last graph URL loaded). State transitions:
//!
//! ```text
//! Idle ──render──▶ Loading ──loaded(ok)──▶ Loaded
//!                     │                       │
//!                     └──loaded(err)──▶ Failed│
//!   any state ──render──▶ Loading (fresh ticket)
//! ```
//!
//! Every load carries a [`LoadTicket`]. Completions for a ticket that
//! has since been superseded are dropped, so a slow graph never
//! overwrites a newer one.

use crate::graph_url;
use crate::graph_url::DisplayOptions;

/// Identity of one graph load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(pub u64);

/// Where graphs are displayed. The plotting itself belongs to the
/// implementor.
pub trait GraphSurface {
    /// Loaded graph content.
    type Fragment;

    /// Release anything the displayed graph owns (poll timers, tasks).
    fn unload(&mut self);

    /// Remove the displayed content.
    fn clear(&mut self);

    /// Start loading `url`. Completions are reported back through
    /// [`Renderer::loaded`] with the same `ticket`.
    fn load(&mut self, ticket: LoadTicket, url: &str);

    /// Display a fragment produced by the current load.
    fn attach(&mut self, fragment: Self::Fragment);
}

/// Render state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RenderState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A load is in progress.
    Loading {
        /// Load identity.
        ticket: LoadTicket,
        /// URL being loaded.
        url: String,
    },
    /// The surface shows the graph for `url`.
    Loaded {
        /// Load identity.
        ticket: LoadTicket,
        /// URL shown.
        url: String,
    },
    /// The load for `url` failed.
    Failed {
        /// Load identity.
        ticket: LoadTicket,
        /// URL that failed.
        url: String,
        /// Reason reported by the surface.
        error: String,
    },
}

impl RenderState {
    fn ticket(&self) -> Option<LoadTicket> {
        match self {
            RenderState::Idle => None,
            RenderState::Loading { ticket, .. }
            | RenderState::Loaded { ticket, .. }
            | RenderState::Failed { ticket, .. } => Some(*ticket),
        }
    }
}

/// Owner of the graph display area.
#[derive(Debug)]
pub struct Renderer<S> {
    surface: S,
    state: RenderState,
    current_address: Option<String>,
    placeholder_visible: bool,
    next_ticket: u64,
}

impl<S: GraphSurface> Renderer<S> {
    /// A renderer showing the "not renderable" placeholder.
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            state: RenderState::Idle,
            current_address: None,
            placeholder_visible: true,
            next_ticket: 0,
        }
    }

    /// Render the graph for a selected leaf. Returns the URL loaded.
    pub fn render_selection(&mut self, api_path: &str, options: &DisplayOptions) -> String {
        let url = graph_url::build(api_path, options);
        self.render(url.clone());
        url
    }

    /// Re-derive the URL from the stored address under `options` and
    /// render it. Does nothing until something has been rendered.
    pub fn rerender(&mut self, options: &DisplayOptions) -> Option<String> {
        let address = self.current_address.as_deref()?;
        let url = graph_url::build(address, options);
        self.render(url.clone());
        Some(url)
    }

    /// Replace whatever is displayed with a fresh load of `url`.
    pub fn render(&mut self, url: String) -> LoadTicket {
        self.placeholder_visible = false;
        self.current_address = Some(url.clone());
        self.surface.unload();
        self.surface.clear();

        self.next_ticket += 1;
        let ticket = LoadTicket(self.next_ticket);
        tracing::info!(%url, ticket = ticket.0, "rendering graph");
        self.surface.load(ticket, &url);
        self.state = RenderState::Loading { ticket, url };
        ticket
    }

    /// Report a load completion. Returns false when `ticket` is stale
    /// and the completion was dropped.
    pub fn loaded(&mut self, ticket: LoadTicket, result: Result<S::Fragment, String>) -> bool {
        if self.state.ticket() != Some(ticket) {
            tracing::debug!(ticket = ticket.0, "dropping stale graph load");
            return false;
        }
        let url = match &self.state {
            RenderState::Loading { url, .. }
            | RenderState::Loaded { url, .. }
            | RenderState::Failed { url, .. } => url.clone(),
            RenderState::Idle => return false,
        };
        match result {
            Ok(fragment) => {
                self.surface.attach(fragment);
                self.state = RenderState::Loaded { ticket, url };
            }
            Err(error) => {
                tracing::warn!(%url, %error, "graph load failed");
                self.state = RenderState::Failed { ticket, url, error };
            }
        }
        true
    }

    /// Current render state.
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Last graph URL loaded, query included.
    pub fn current_address(&self) -> Option<&str> {
        self.current_address.as_deref()
    }

    /// Whether the "not renderable" placeholder is showing.
    pub fn placeholder_visible(&self) -> bool {
        self.placeholder_visible
    }

    /// The display surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The display surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Surface that records every call it receives.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub(crate) calls: Vec<String>,
        pub(crate) shown: Option<String>,
    }

    impl GraphSurface for RecordingSurface {
        type Fragment = String;

        fn unload(&mut self) {
            self.calls.push("unload".to_string());
        }

        fn clear(&mut self) {
            self.calls.push("clear".to_string());
            self.shown = None;
        }

        fn load(&mut self, ticket: LoadTicket, url: &str) {
            self.calls.push(format!("load {} {}", ticket.0, url));
        }

        fn attach(&mut self, fragment: String) {
            self.calls.push(format!("attach {}", fragment));
            self.shown = Some(fragment);
        }
    }
}
