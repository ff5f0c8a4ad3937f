/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Graph picker - cascading navigation over a monitoring agent's
//! metric tree.
//!
//! 1. Fetch (`fetch`): one-shot `GET /api/<path>` level lookups.
//! 2. Classify (`classify`): names offered at a level, and whether
//!    choosing one descends further or graphs a metric.
//! 3. Navigate (`navigator`): the chain of selection levels, kept a
//!    prefix of the user's path under out-of-order responses.
//! 4. Render (`renderer`, `graph_url`): graph URL composition and the
//!    display lifecycle.
//!
//! The navigator never awaits. It emits [`LevelRequest`]s, the caller
//! runs them through a [`LevelFetcher`], and feeds the
//! [`LevelResponse`]s back.

pub mod classify;
pub mod client;
pub mod config;
pub mod fetch;
pub mod graph_url;
pub mod navigator;
pub mod node;
pub mod renderer;

pub use classify::LevelMode;
pub use config::Config;
pub use config::ConfigError;
pub use fetch::FetchError;
pub use fetch::HttpLevelFetcher;
pub use fetch::LevelFetcher;
pub use fetch::LevelRequest;
pub use fetch::LevelResponse;
pub use fetch::RequestToken;
pub use graph_url::DisplayOptions;
pub use navigator::LevelWidget;
pub use navigator::Navigator;
pub use navigator::NavigatorSettings;
pub use navigator::WidgetChain;
pub use node::Node;
pub use renderer::GraphSurface;
pub use renderer::LoadTicket;
pub use renderer::RenderState;
pub use renderer::Renderer;
