/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Graph surface backed by the agent's HTTP graph endpoint.
//!
//! `load` spawns a task that fetches the graph resource and, when a
//! poll interval is configured, keeps re-fetching it. Each result is
//! sent to the event loop tagged with the load's ticket. `unload`
//! aborts the task, so a replaced graph never keeps polling.

use std::time::Duration;
use std::time::Instant;

use chrono::DateTime;
use chrono::Utc;
use graph_picker::GraphSurface;
use graph_picker::LoadTicket;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::actions::AppEvent;

/// Largest body prefix kept for the preview.
const PREVIEW_LIMIT: usize = 16 * 1024;

/// One fetched copy of a graph resource.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GraphFragment {
    pub(crate) status: u16,
    pub(crate) content_type: Option<String>,
    /// Total body size in bytes.
    pub(crate) size: usize,
    /// Up to [`PREVIEW_LIMIT`] bytes of the body.
    pub(crate) head: Vec<u8>,
    pub(crate) fetched_at: DateTime<Utc>,
    pub(crate) elapsed: Duration,
}

impl GraphFragment {
    /// Whether the body can be shown as text.
    pub(crate) fn is_textual(&self) -> bool {
        match self.content_type.as_deref() {
            Some(ct) => {
                let ct = ct.to_ascii_lowercase();
                ct.starts_with("text/")
                    || ct.contains("json")
                    || ct.contains("xml")
                    || ct.contains("javascript")
            }
            None => std::str::from_utf8(&self.head).is_ok(),
        }
    }
}

/// Fetch `url` once.
pub(crate) async fn fetch_graph(
    client: &reqwest::Client,
    url: &str,
    token: Option<&str>,
) -> Result<GraphFragment, String> {
    let started = Instant::now();
    let mut request = client.get(url);
    if let Some(token) = token {
        request = request.query(&[("token", token)]);
    }
    let response = request.send().await.map_err(|e| e.to_string())?;
    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {}", status.as_u16()));
    }
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.bytes().await.map_err(|e| e.to_string())?;
    Ok(GraphFragment {
        status: status.as_u16(),
        content_type,
        size: body.len(),
        head: body[..body.len().min(PREVIEW_LIMIT)].to_vec(),
        fetched_at: Utc::now(),
        elapsed: started.elapsed(),
    })
}

/// [`GraphSurface`] that loads graphs over HTTP.
pub(crate) struct HttpGraphSurface {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    poll_interval: Option<Duration>,
    events: UnboundedSender<AppEvent>,
    task: Option<JoinHandle<()>>,
    shown: Option<GraphFragment>,
}

impl HttpGraphSurface {
    pub(crate) fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        token: Option<String>,
        poll_interval: Option<Duration>,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            poll_interval,
            events,
            task: None,
            shown: None,
        }
    }

    /// The fragment currently displayed.
    pub(crate) fn shown(&self) -> Option<&GraphFragment> {
        self.shown.as_ref()
    }

    /// Whether a load or poll task is alive.
    pub(crate) fn is_polling(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub(crate) fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval
    }
}

impl GraphSurface for HttpGraphSurface {
    type Fragment = GraphFragment;

    fn unload(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn clear(&mut self) {
        self.shown = None;
    }

    fn load(&mut self, ticket: LoadTicket, url: &str) {
        let client = self.client.clone();
        let absolute = format!("{}{}", self.base_url, url);
        let token = self.token.clone();
        let poll_interval = self.poll_interval;
        let events = self.events.clone();

        self.task = Some(tokio::spawn(async move {
            loop {
                let result = fetch_graph(&client, &absolute, token.as_deref()).await;
                if let Err(error) = &result {
                    tracing::debug!(url = %absolute, %error, "graph fetch failed");
                }
                if events.send(AppEvent::Graph { ticket, result }).is_err() {
                    break;
                }
                match poll_interval {
                    Some(interval) => tokio::time::sleep(interval).await,
                    None => break,
                }
            }
        }));
    }

    fn attach(&mut self, fragment: GraphFragment) {
        self.shown = Some(fragment);
    }
}

impl Drop for HttpGraphSurface {
    fn drop(&mut self) {
        self.unload();
    }
}
