// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by execution contexts when accepting work.

use thiserror::Error;

/// Reasons an execution context can refuse a job.
///
/// The registry never surfaces these to its caller; a refused job is logged
/// and counted in the dispatch report instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The context was shut down and no longer accepts jobs.
    #[error("execution context '{label}' is closed")]
    Closed { label: String },

    /// A tokio-backed context was built outside of a tokio runtime.
    #[error("execution context '{label}' requires a running tokio runtime")]
    NoRuntime { label: String },
}
