// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_CONTEXT_LABEL, MAX_CONCURRENCY};
use crate::contexts::concurrent::default_concurrency;
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Declaration of the execution contexts available to registries.
///
/// # Fields
/// * `default_context` - Label of the context used for observers registered
///   without one (defaults to `main`)
/// * `contexts` - Every context to build, in declaration order
///
/// # Example
/// ```yaml
/// default_context: main
/// contexts:
///   - label: main
///     kind: serial
///   - label: alpha
///     kind: concurrent
///     max_concurrency: 4
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "default_context_label")]
    pub default_context: String,
    #[serde(default)]
    pub contexts: Vec<ContextConfig>,
}

fn default_context_label() -> String {
    DEFAULT_CONTEXT_LABEL.to_string()
}

/// Configuration for a single execution context.
///
/// `max_concurrency` only applies to concurrent queues; when omitted they use
/// the number of available CPU cores, capped at `MAX_CONCURRENCY`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContextConfig {
    pub label: String,
    pub kind: QueueKind,
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

impl ContextConfig {
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency
            .unwrap_or_else(|| default_concurrency().min(MAX_CONCURRENCY))
    }
}

/// Which execution context implementation backs a declared context.
///
/// # Variants
/// * `Serial` - One job at a time, FIFO
/// * `Concurrent` - Parallel jobs, capped by `max_concurrency`
/// * `Manual` - Jobs run only when the host drains the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    Serial,
    Concurrent,
    Manual,
}

impl QueueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueKind::Serial => "serial",
            QueueKind::Concurrent => "concurrent",
            QueueKind::Manual => "manual",
        }
    }
}

/// Serialization format of a config file, picked from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Parse a config from an in-memory document.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
    let cfg: Config = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };
    Ok(cfg)
}

/// Load a config from a YAML, JSON or TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, format)
}

/// Load a config file and check it with [`crate::config::validate_config`].
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}
