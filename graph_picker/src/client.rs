/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! TLS-aware `reqwest` client construction.
//!
//! Builds `(base_url, reqwest::Client)` from [`AgentConfig`], choosing
//! HTTP vs HTTPS and configuring certificate verification when TLS
//! material is available.
//!
//! Address handling:
//! - `addr` may be `host:port` (no scheme) or an explicit
//!   `http://...` / `https://...`.
//! - An explicit scheme is authoritative.
//!
//! TLS is enabled by an explicit `https://` scheme or by a readable
//! `tls_ca`. A client identity (`tls_cert` + `tls_key`) is attached on
//! a best-effort basis: failing to parse it does not disable TLS.

use std::path::Path;

use crate::config::AgentConfig;

/// Split an address into an optional `http`/`https` scheme and the
/// remaining host part.
pub fn parse_addr(addr: &str) -> (Option<&str>, &str) {
    if let Some(host) = addr.strip_prefix("https://") {
        (Some("https"), host)
    } else if let Some(host) = addr.strip_prefix("http://") {
        (Some("http"), host)
    } else {
        (None, addr)
    }
}

/// Install `ca_bytes` as the root trust anchor and, when both halves
/// are present, a client identity.
///
/// Returns `(updated_builder, ca_installed)`.
fn add_tls(
    builder: reqwest::ClientBuilder,
    ca_bytes: &[u8],
    cert_bytes: Option<Vec<u8>>,
    key_bytes: Option<Vec<u8>>,
) -> (reqwest::ClientBuilder, bool) {
    let root_cert = match reqwest::Certificate::from_pem(ca_bytes) {
        Ok(c) => c,
        Err(error) => {
            tracing::warn!(%error, "TLS: invalid CA PEM");
            return (builder, false);
        }
    };
    let mut builder = builder.add_root_certificate(root_cert);

    if let (Some(cert), Some(key)) = (cert_bytes, key_bytes) {
        let mut id_pem = cert;
        id_pem.extend_from_slice(&key);
        match reqwest::Identity::from_pem(&id_pem) {
            Ok(identity) => builder = builder.identity(identity),
            Err(error) => tracing::warn!(%error, "TLS: invalid client identity PEM"),
        }
    }

    (builder, true)
}

/// [`add_tls`] from PEM files. An unreadable CA leaves the builder
/// unchanged; unreadable identity files just omit the identity.
fn add_tls_from_paths(
    builder: reqwest::ClientBuilder,
    ca_path: &Path,
    cert_path: Option<&Path>,
    key_path: Option<&Path>,
) -> (reqwest::ClientBuilder, bool) {
    let ca_bytes = match std::fs::read(ca_path) {
        Ok(b) => b,
        Err(error) => {
            tracing::warn!(path = %ca_path.display(), %error, "TLS: cannot read CA file");
            return (builder, false);
        }
    };
    let cert_bytes = cert_path.and_then(|p| std::fs::read(p).ok());
    let key_bytes = key_path.and_then(|p| std::fs::read(p).ok());
    add_tls(builder, &ca_bytes, cert_bytes, key_bytes)
}

/// Build a `reqwest` client and the agent base URL.
///
/// Returns `(base_url, client)` where `base_url` always carries the
/// selected scheme (`http://...` or `https://...`).
pub fn build_client(agent: &AgentConfig) -> (String, reqwest::Client) {
    let (explicit_scheme, host) = parse_addr(&agent.addr);

    let mut builder = reqwest::Client::builder().timeout(agent.timeout());
    let mut use_tls = explicit_scheme == Some("https");

    if let Some(ca_path) = &agent.tls_ca {
        let (b, ok) = add_tls_from_paths(
            builder,
            ca_path,
            agent.tls_cert.as_deref(),
            agent.tls_key.as_deref(),
        );
        builder = b;
        // An explicit http:// wins over a configured CA.
        use_tls = explicit_scheme != Some("http") && (use_tls || ok);
    }

    let scheme = if use_tls { "https" } else { "http" };
    let base_url = format!("{}://{}", scheme, host.trim_end_matches('/'));
    let client = builder.build().unwrap_or_else(|error| {
        tracing::warn!(%error, "falling back to a default HTTP client");
        reqwest::Client::new()
    });
    tracing::debug!(%base_url, "agent client ready");

    (base_url, client)
}
