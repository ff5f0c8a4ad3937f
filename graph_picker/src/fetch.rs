/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! One-shot level fetches.
//!
//! A [`LevelFetcher`] answers "what are the children of this path?"
//! with a single attempt and no retry. The navigator never awaits a
//! fetcher itself: it hands out [`LevelRequest`]s and accepts
//! [`LevelResponse`]s, and the caller decides where the future runs.

use async_trait::async_trait;
use serde_json::Value;

use crate::graph_url::encode_path;
use crate::node::Node;

/// Errors produced while fetching one tree level. Every variant names
/// the path that was requested.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("request for {path} failed: {source}")]
    Transport {
        /// Requested tree path.
        path: String,
        /// Underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The agent answered with a non-success status.
    #[error("request for {path} returned HTTP {status}")]
    Status {
        /// Requested tree path.
        path: String,
        /// HTTP status code.
        status: u16,
    },

    /// The body was not JSON.
    #[error("response for {path} is not valid JSON: {details}")]
    Decode {
        /// Requested tree path.
        path: String,
        /// Parser message.
        details: String,
    },

    /// The agent reported an error instead of a value.
    #[error("agent rejected {path}: {message}")]
    Agent {
        /// Requested tree path.
        path: String,
        /// Message from the agent's `error` member.
        message: String,
    },

    /// The body was JSON but had no `value` object.
    #[error("response for {path} has no `value` object")]
    Malformed {
        /// Requested tree path.
        path: String,
    },
}

impl FetchError {
    /// The tree path whose fetch failed.
    pub fn path(&self) -> &str {
        match self {
            FetchError::Transport { path, .. }
            | FetchError::Status { path, .. }
            | FetchError::Decode { path, .. }
            | FetchError::Agent { path, .. }
            | FetchError::Malformed { path } => path,
        }
    }
}

/// Decode a response body for `path` into a [`Node`].
pub fn decode_level(path: &str, body: &[u8]) -> Result<Node, FetchError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| FetchError::Decode {
        path: path.to_string(),
        details: e.to_string(),
    })?;
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Err(FetchError::Agent {
            path: path.to_string(),
            message: message.to_string(),
        });
    }
    Node::from_response(value).ok_or_else(|| FetchError::Malformed {
        path: path.to_string(),
    })
}

/// Source of tree levels.
#[async_trait]
pub trait LevelFetcher: Send + Sync {
    /// Fetch the children of `path` (e.g. `/api/disk`). Single attempt.
    async fn fetch(&self, path: &str) -> Result<Node, FetchError>;
}

/// Monotonic identity of an issued level request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub u64);

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A level the navigator wants fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelRequest {
    /// Chain position the resulting widget will occupy.
    pub position: usize,
    /// Staleness token; only the latest issued token is accepted.
    pub token: RequestToken,
    /// Tree path to fetch, e.g. `/api/disk/logical`.
    pub path: String,
    /// Name selected in the parent level (`root` for the first level).
    pub selection_key: String,
}

/// The outcome of a [`LevelRequest`].
#[derive(Debug)]
pub struct LevelResponse {
    /// The request this answers.
    pub request: LevelRequest,
    /// Fetched node or the failure.
    pub result: Result<Node, FetchError>,
}

/// Run `request` on `fetcher`.
pub async fn resolve<F: LevelFetcher + ?Sized>(
    fetcher: &F,
    request: LevelRequest,
) -> LevelResponse {
    let result = fetcher.fetch(&request.path).await;
    LevelResponse { request, result }
}

/// Fetches levels from the agent's HTTP API.
#[derive(Clone, Debug)]
pub struct HttpLevelFetcher {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpLevelFetcher {
    /// `base_url` includes the scheme (e.g. `https://host:5693`).
    /// `token` is sent as the `token` query parameter when present.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Base URL requests are issued against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a tree path, without the token.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, encode_path(path))
    }
}

#[async_trait]
impl LevelFetcher for HttpLevelFetcher {
    async fn fetch(&self, path: &str) -> Result<Node, FetchError> {
        let url = self.url_for(path);
        tracing::debug!(%url, "fetching level");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.query(&[("token", token)]);
        }
        let response = request.send().await.map_err(|source| FetchError::Transport {
            path: path.to_string(),
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes().await.map_err(|source| FetchError::Transport {
            path: path.to_string(),
            source,
        })?;
        decode_level(path, &body)
    }
}
