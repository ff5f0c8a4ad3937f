/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Layered configuration.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, the
//! `GRAPH_PICKER_*` environment variables, and finally CLI flags
//! (applied by the binary on top of [`Config::load`]).
//!
//! ```toml
//! [agent]
//! addr = "https://monitor.example.com:5693"
//! token = "public"
//! tls_ca = "/etc/ssl/agent-ca.pem"
//!
//! [picker]
//! graphables = ["cpu", "memory"]
//!
//! [graph]
//! refresh_ms = 2000
//! ```

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::classify::DEFAULT_GRAPHABLES;
use crate::graph_url::NONE_SENTINEL;
use crate::navigator::NavigatorSettings;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "GRAPH_PICKER_CONFIG";
/// Agent address override.
pub const ADDR_ENV: &str = "GRAPH_PICKER_ADDR";
/// Access token override.
pub const TOKEN_ENV: &str = "GRAPH_PICKER_TOKEN";
/// Request timeout override, in milliseconds.
pub const TIMEOUT_ENV: &str = "GRAPH_PICKER_TIMEOUT_MS";
/// Graph poll interval override, in milliseconds.
pub const REFRESH_ENV: &str = "GRAPH_PICKER_REFRESH_MS";
/// Log file override.
pub const LOG_FILE_ENV: &str = "GRAPH_PICKER_LOG_FILE";

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config file {}: {source}", .path.display())]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema.
    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: toml::de::Error,
    },

    /// An environment override could not be parsed.
    #[error("invalid environment override {name}={raw:?}: {details}")]
    Env {
        /// Variable name.
        name: String,
        /// Raw value.
        raw: String,
        /// Parser message.
        details: String,
    },

    /// The merged configuration is inconsistent.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Agent connection settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// `host:port`, or a URL with an explicit `http://`/`https://`.
    pub addr: String,
    /// Access token sent as the `token` query parameter.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout_ms: u64,
    /// PEM CA file; enables TLS.
    pub tls_ca: Option<PathBuf>,
    /// PEM client certificate for mutual TLS.
    pub tls_cert: Option<PathBuf>,
    /// PEM client key for mutual TLS.
    pub tls_key: Option<PathBuf>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:5693".to_string(),
            token: None,
            timeout_ms: 5000,
            tls_ca: None,
            tls_cert: None,
            tls_key: None,
        }
    }
}

impl AgentConfig {
    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// What the picker offers.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Root categories shown at the first level.
    pub graphables: Vec<String>,
    /// Choices cycled by the unit control; the first is the default.
    pub unit_choices: Vec<String>,
    /// Choices cycled by the units control; the first is the default.
    pub units_choices: Vec<String>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            graphables: DEFAULT_GRAPHABLES.iter().map(|s| s.to_string()).collect(),
            unit_choices: ["None", "k", "M", "G", "T"].map(String::from).to_vec(),
            units_choices: ["None", "B", "b", "Percent"].map(String::from).to_vec(),
        }
    }
}

/// Graph display settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Poll interval of the displayed graph; `0` disables polling.
    pub refresh_ms: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { refresh_ms: 5000 }
    }
}

impl GraphConfig {
    /// Poll interval, or `None` when polling is disabled.
    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_ms > 0).then(|| Duration::from_millis(self.refresh_ms))
    }
}

/// Log sink settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file; the terminal belongs to the UI.
    pub file: PathBuf,
    /// `EnvFilter` directives used when `GRAPH_PICKER_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("graph-picker.log"),
            filter: "info".to_string(),
        }
    }
}

/// Full configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `[agent]`
    pub agent: AgentConfig,
    /// `[picker]`
    pub picker: PickerConfig,
    /// `[graph]`
    pub graph: GraphConfig,
    /// `[logging]`
    pub logging: LoggingConfig,
}

impl Config {
    /// Load from `path` (defaults when `None`), then apply environment
    /// overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Missing sections take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `GRAPH_PICKER_*` overrides read through `lookup`. Blank
    /// values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|raw| !raw.trim().is_empty());

        if let Some(addr) = var(ADDR_ENV) {
            self.agent.addr = addr;
        }
        if let Some(token) = var(TOKEN_ENV) {
            self.agent.token = Some(token);
        }
        if let Some(raw) = var(TIMEOUT_ENV) {
            self.agent.timeout_ms = parse_u64(TIMEOUT_ENV, raw)?;
        }
        if let Some(raw) = var(REFRESH_ENV) {
            self.graph.refresh_ms = parse_u64(REFRESH_ENV, raw)?;
        }
        if let Some(file) = var(LOG_FILE_ENV) {
            self.logging.file = PathBuf::from(file);
        }
        Ok(())
    }

    /// Reject configurations the picker cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.addr.trim().is_empty() {
            return Err(ConfigError::Invalid("agent.addr must not be empty".into()));
        }
        if self.agent.timeout_ms == 0 {
            return Err(ConfigError::Invalid("agent.timeout_ms must be positive".into()));
        }
        if self.agent.tls_cert.is_some() != self.agent.tls_key.is_some() {
            return Err(ConfigError::Invalid(
                "agent.tls_cert and agent.tls_key must be set together".into(),
            ));
        }
        if self.picker.graphables.is_empty() {
            return Err(ConfigError::Invalid("picker.graphables must not be empty".into()));
        }
        validate_choices("picker.unit_choices", &self.picker.unit_choices)?;
        validate_choices("picker.units_choices", &self.picker.units_choices)?;
        Ok(())
    }

    /// Navigator settings derived from this configuration.
    pub fn navigator_settings(&self) -> NavigatorSettings {
        NavigatorSettings {
            graphables: self.picker.graphables.clone(),
            ..NavigatorSettings::default()
        }
    }
}

fn parse_u64(name: &str, raw: String) -> Result<u64, ConfigError> {
    raw.trim().parse::<u64>().map_err(|error| ConfigError::Env {
        name: name.to_string(),
        details: error.to_string(),
        raw,
    })
}

fn validate_choices(field: &str, choices: &[String]) -> Result<(), ConfigError> {
    match choices.first() {
        Some(first) if first == NONE_SENTINEL => Ok(()),
        Some(first) => Err(ConfigError::Invalid(format!(
            "{field} must start with {NONE_SENTINEL:?}, got {first:?}"
        ))),
        None => Err(ConfigError::Invalid(format!("{field} must not be empty"))),
    }
}
