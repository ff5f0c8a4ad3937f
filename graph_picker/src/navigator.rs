/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Cascading selection over the metric tree.
//!
//! The [`Navigator`] keeps a [`WidgetChain`]: one [`LevelWidget`] per
//! tree level, from the root category down to the level currently
//! being browsed. It is a synchronous state machine; it never awaits.
//!
//! Invariants:
//! - **Prefix chain**: the chain is always a contiguous prefix of the
//!   user's path. Changing the selection at level `k` truncates the
//!   chain to `k + 1` entries before anything else happens, including
//!   issuing the next request.
//! - **Latest request wins**: every [`LevelRequest`] carries a fresh
//!   [`RequestToken`]. Issuing a request at position `p` implies the
//!   chain was just truncated to `p` entries, so it supersedes every
//!   earlier request at any position. [`Navigator::apply`] accepts a
//!   response only if its token is the one in flight.
//! - **No partial widgets**: a failed fetch appends nothing and leaves
//!   the chain as it was; the failure is kept as a [`LevelFailure`]
//!   for display.
//! - **Subscriptions die with their entry**: each widget owns the
//!   [`Subscription`] that decides what its change events do. Dropping
//!   the entry drops the binding.

use crate::classify::Classification;
use crate::classify::DEFAULT_GRAPHABLES;
use crate::classify::LevelMode;
use crate::classify::ROOT_KEY;
use crate::classify::classify;
use crate::fetch::FetchError;
use crate::fetch::LevelRequest;
use crate::fetch::LevelResponse;
use crate::fetch::RequestToken;
use crate::graph_url::API_PREFIX;
use crate::graph_url::DisplayOptions;
use crate::renderer::GraphSurface;
use crate::renderer::Renderer;

/// What a widget does when its selection changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subscription {
    /// Discard deeper levels and fetch the level below the choice.
    Cascade,
    /// Render the graph for the choice.
    Render,
}

impl From<LevelMode> for Subscription {
    fn from(mode: LevelMode) -> Self {
        match mode {
            LevelMode::Branch => Subscription::Cascade,
            LevelMode::LeafSet => Subscription::Render,
        }
    }
}

/// One selection control in the chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelWidget {
    base_path: String,
    selection_key: String,
    names: Vec<String>,
    mode: LevelMode,
    selected: Option<usize>,
    subscription: Subscription,
}

impl LevelWidget {
    fn new(base_path: String, selection_key: String, classification: Classification) -> Self {
        Self {
            base_path,
            selection_key,
            names: classification.names,
            mode: classification.mode,
            selected: None,
            subscription: classification.mode.into(),
        }
    }

    /// API path this level was fetched from.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Name chosen in the parent level (`root` for the first level).
    pub fn selection_key(&self) -> &str {
        &self.selection_key
    }

    /// Names offered, in source order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Branch or leaf-set level.
    pub fn mode(&self) -> LevelMode {
        self.mode
    }

    /// Index of the current choice.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Name of the current choice.
    pub fn selected_name(&self) -> Option<&str> {
        self.selected.and_then(|i| self.names.get(i)).map(String::as_str)
    }

    /// The change handler bound to this level.
    pub fn subscription(&self) -> Subscription {
        self.subscription
    }

    /// An empty level offers nothing to act on.
    pub fn is_inert(&self) -> bool {
        self.names.is_empty()
    }

    /// API path of `name` under this level.
    pub fn child_path(&self, name: &str) -> String {
        format!("{}/{}", self.base_path, name)
    }
}

/// Ordered selection controls, root first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WidgetChain {
    levels: Vec<LevelWidget>,
}

impl WidgetChain {
    /// Number of levels displayed.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// True before the root level arrives.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level at `index`.
    pub fn get(&self, index: usize) -> Option<&LevelWidget> {
        self.levels.get(index)
    }

    /// The deepest level.
    pub fn last(&self) -> Option<&LevelWidget> {
        self.levels.last()
    }

    /// Levels, root first.
    pub fn iter(&self) -> impl Iterator<Item = &LevelWidget> {
        self.levels.iter()
    }

    /// Names chosen from the root down, stopping at the first level
    /// without a choice.
    pub fn selection_path(&self) -> Vec<&str> {
        self.levels.iter().map_while(|level| level.selected_name()).collect()
    }

    /// Keep the first `len` levels. Returns how many were removed.
    fn truncate(&mut self, len: usize) -> usize {
        let removed = self.levels.len().saturating_sub(len);
        self.levels.truncate(len);
        removed
    }

    fn push(&mut self, level: LevelWidget) {
        self.levels.push(level);
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut LevelWidget> {
        self.levels.get_mut(index)
    }
}

/// A level fetch that failed. Nothing was appended for it.
#[derive(Debug)]
pub struct LevelFailure {
    /// Position the level would have occupied.
    pub position: usize,
    /// Path that was requested.
    pub path: String,
    /// What went wrong.
    pub error: FetchError,
}

/// Tunables for a [`Navigator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigatorSettings {
    /// Root tree path.
    pub api_root: String,
    /// Root categories offered for navigation.
    pub graphables: Vec<String>,
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self {
            api_root: API_PREFIX.to_string(),
            graphables: DEFAULT_GRAPHABLES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Drives level transitions and keeps the chain consistent.
#[derive(Debug)]
pub struct Navigator<S> {
    settings: NavigatorSettings,
    chain: WidgetChain,
    renderer: Renderer<S>,
    options: DisplayOptions,
    in_flight: Option<LevelRequest>,
    failure: Option<LevelFailure>,
    next_token: u64,
}

impl<S: GraphSurface> Navigator<S> {
    /// A navigator with an empty chain. Call [`Navigator::initialize`]
    /// to request the root level.
    pub fn new(settings: NavigatorSettings, renderer: Renderer<S>) -> Self {
        Self {
            settings,
            chain: WidgetChain::default(),
            renderer,
            options: DisplayOptions::default(),
            in_flight: None,
            failure: None,
            next_token: 0,
        }
    }

    /// Start over from the root: drop the chain and request the root
    /// level at position 0.
    pub fn initialize(&mut self) -> LevelRequest {
        self.chain.truncate(0);
        let root = self.settings.api_root.clone();
        self.request_level(0, root, ROOT_KEY.to_string())
    }

    /// Issue a request for the level at `position`. Supersedes any
    /// request already in flight.
    fn request_level(&mut self, position: usize, path: String, selection_key: String) -> LevelRequest {
        debug_assert_eq!(position, self.chain.len());
        self.next_token += 1;
        let request = LevelRequest {
            position,
            token: RequestToken(self.next_token),
            path,
            selection_key,
        };
        if let Some(previous) = self.in_flight.replace(request.clone()) {
            tracing::debug!(
                superseded = %previous.token,
                path = %previous.path,
                "superseding in-flight level request"
            );
        }
        self.failure = None;
        tracing::info!(
            position,
            token = %request.token,
            path = %request.path,
            "requesting level"
        );
        request
    }

    /// Apply a fetch outcome. Returns the next request when the new
    /// level auto-advanced into a branch.
    pub fn apply(&mut self, response: LevelResponse) -> Option<LevelRequest> {
        let LevelResponse { request, result } = response;
        match &self.in_flight {
            Some(current) if current.token == request.token => {}
            _ => {
                tracing::warn!(
                    token = %request.token,
                    path = %request.path,
                    "discarding stale level response"
                );
                return None;
            }
        }
        self.in_flight = None;

        let node = match result {
            Ok(node) => node,
            Err(error) => {
                tracing::warn!(path = %request.path, %error, "level fetch failed");
                self.failure = Some(LevelFailure {
                    position: request.position,
                    path: request.path,
                    error,
                });
                return None;
            }
        };

        let classification = classify(&node, &request.selection_key, &self.settings.graphables);
        tracing::info!(
            position = request.position,
            path = %request.path,
            mode = ?classification.mode,
            names = classification.names.len(),
            "level ready"
        );
        let position = request.position;
        self.chain.push(LevelWidget::new(
            request.path,
            request.selection_key,
            classification,
        ));

        // Select the first option and fire its handler right away, so
        // a fresh level cascades without user input.
        if self.chain.get(position).is_some_and(|level| !level.is_inert()) {
            self.select(position, 0)
        } else {
            None
        }
    }

    /// The selection at `level` changed to `index`. Deeper levels are
    /// discarded first; then the level's subscription either requests
    /// the next level or renders.
    ///
    /// Out-of-range `level` or `index` values are ignored.
    pub fn select(&mut self, level: usize, index: usize) -> Option<LevelRequest> {
        let Some(widget) = self.chain.get_mut(level) else {
            tracing::debug!(level, "ignoring change on a level that is not displayed");
            return None;
        };
        let Some(name) = widget.names.get(index).cloned() else {
            tracing::debug!(level, index, "ignoring change to a missing option");
            return None;
        };
        widget.selected = Some(index);
        let subscription = widget.subscription;
        let path = widget.child_path(&name);

        let removed = self.chain.truncate(level + 1);
        if removed > 0 {
            tracing::debug!(level, removed, "discarded deeper levels");
        }
        if self
            .in_flight
            .as_ref()
            .is_some_and(|request| request.position > level)
        {
            self.in_flight = None;
        }
        if self
            .failure
            .as_ref()
            .is_some_and(|failure| failure.position > level)
        {
            self.failure = None;
        }

        match subscription {
            Subscription::Cascade => Some(self.request_level(level + 1, path, name)),
            Subscription::Render => {
                self.renderer.render_selection(&path, &self.options);
                None
            }
        }
    }

    /// [`Navigator::select`] by name.
    pub fn select_name(&mut self, level: usize, name: &str) -> Option<LevelRequest> {
        let index = self
            .chain
            .get(level)?
            .names
            .iter()
            .position(|candidate| candidate == name)?;
        self.select(level, index)
    }

    /// Replace the display options and re-render from the stored
    /// address. Returns the re-derived URL, if anything was rendered.
    pub fn set_options(&mut self, options: DisplayOptions) -> Option<String> {
        self.options = options;
        self.renderer.rerender(&self.options)
    }

    /// Manual refresh: re-render the stored address with the current
    /// options.
    pub fn refresh(&mut self) -> Option<String> {
        self.renderer.rerender(&self.options)
    }

    /// The selection chain.
    pub fn chain(&self) -> &WidgetChain {
        &self.chain
    }

    /// Chosen names, root first.
    pub fn selection_path(&self) -> Vec<&str> {
        self.chain.selection_path()
    }

    /// Current display options.
    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// The request whose response is awaited.
    pub fn in_flight(&self) -> Option<&LevelRequest> {
        self.in_flight.as_ref()
    }

    /// The last level fetch failure, until the next request.
    pub fn failure(&self) -> Option<&LevelFailure> {
        self.failure.as_ref()
    }

    /// Navigator settings.
    pub fn settings(&self) -> &NavigatorSettings {
        &self.settings
    }

    /// The graph renderer.
    pub fn renderer(&self) -> &Renderer<S> {
        &self.renderer
    }

    /// The graph renderer, mutably (load completions are reported here).
    pub fn renderer_mut(&mut self) -> &mut Renderer<S> {
        &mut self.renderer
    }
}
