// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for execution context lifecycle events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A queue started accepting jobs.
///
/// # Log Level
/// `debug!` - Lifecycle event
pub struct QueueStarted<'a> {
    pub label: &'a str,
    pub kind: &'a str,
}

impl Display for QueueStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Started {} queue '{}'", self.kind, self.label)
    }
}

impl StructuredLog for QueueStarted<'_> {
    fn log(&self) {
        tracing::debug!(label = self.label, kind = self.kind, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "queue_started",
            span_name = name,
            label = self.label,
            kind = self.kind,
        )
    }
}

/// A queue's worker stopped; remaining jobs were discarded.
///
/// # Log Level
/// `debug!` - Lifecycle event
pub struct QueueStopped<'a> {
    pub label: &'a str,
    pub jobs_run: u64,
}

impl Display for QueueStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stopped queue '{}' after running {} jobs",
            self.label, self.jobs_run
        )
    }
}

impl StructuredLog for QueueStopped<'_> {
    fn log(&self) {
        tracing::debug!(label = self.label, jobs_run = self.jobs_run, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "queue_stopped",
            span_name = name,
            label = self.label,
            jobs_run = self.jobs_run,
        )
    }
}

/// A job panicked while running on a queue.
///
/// # Log Level
/// `error!` - An observer callback crashed
///
/// # Example
/// ```
/// use multicast_delegate::observability::messages::context::JobPanicked;
///
/// let msg = JobPanicked {
///     label: "main",
///     reason: "index out of bounds",
/// };
///
/// assert_eq!(msg.to_string(), "Job on queue 'main' panicked: index out of bounds");
/// ```
pub struct JobPanicked<'a> {
    pub label: &'a str,
    pub reason: &'a str,
}

impl Display for JobPanicked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Job on queue '{}' panicked: {}", self.label, self.reason)
    }
}

impl StructuredLog for JobPanicked<'_> {
    fn log(&self) {
        tracing::error!(label = self.label, reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "job_panicked",
            span_name = name,
            label = self.label,
            reason = self.reason,
        )
    }
}
