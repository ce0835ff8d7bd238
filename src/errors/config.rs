// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ContextError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while validating a context configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A context was declared with an empty or whitespace-only label
    EmptyLabel {
        /// Position of the offending entry in the `contexts` list
        index: usize,
    },
    /// Two contexts share the same label
    DuplicateLabel {
        /// The duplicated label
        label: String,
    },
    /// `default_context` names a context that is not declared
    UnknownDefaultContext {
        /// The label that could not be found
        label: String,
    },
    /// `max_concurrency` was set on a queue kind that does not use it
    ConcurrencyNotApplicable {
        /// The serial or manual context carrying the setting
        label: String,
    },
    /// `max_concurrency` falls outside the accepted bounds
    ConcurrencyOutOfRange {
        label: String,
        requested: usize,
        min: usize,
        max: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyLabel { index } => {
                write!(f, "Context #{} has an empty label", index)
            }
            ValidationError::DuplicateLabel { label } => {
                write!(f, "Duplicate context label: '{}'", label)
            }
            ValidationError::UnknownDefaultContext { label } => {
                write!(
                    f,
                    "Default context '{}' is not declared in the contexts list",
                    label
                )
            }
            ValidationError::ConcurrencyNotApplicable { label } => {
                write!(
                    f,
                    "Context '{}' sets max_concurrency but is not a concurrent queue",
                    label
                )
            }
            ValidationError::ConcurrencyOutOfRange {
                label,
                requested,
                min,
                max,
            } => {
                write!(
                    f,
                    "Context '{}' requests max_concurrency={} which is outside [{}, {}]",
                    label, requested, min, max
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading a context configuration or building its runtime.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension does not map to a supported format.
    #[error("unsupported config format for '{0}' (expected .yaml, .yml, .json or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// One or more validation rules failed.
    #[error("configuration validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),

    /// A declared context could not be constructed.
    #[error("failed to build context: {0}")]
    Context(#[from] ContextError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
