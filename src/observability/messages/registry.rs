// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for multicast registry events.
//!
//! This module contains message types for logging events related to:
//! * Observer registration and removal
//! * Compaction of expired nodes
//! * Fan-out dispatch and the nodes it skipped

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Observer appended to the registry.
///
/// # Log Level
/// `debug!` - Registry bookkeeping
///
/// # Example
/// ```
/// use multicast_delegate::observability::messages::registry::ObserverAdded;
///
/// let msg = ObserverAdded {
///     context: "alpha",
///     node_count: 2,
/// };
///
/// assert_eq!(msg.to_string(), "Observer added on context 'alpha': 2 nodes registered");
/// ```
pub struct ObserverAdded<'a> {
    pub context: &'a str,
    pub node_count: usize,
}

impl Display for ObserverAdded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Observer added on context '{}': {} nodes registered",
            self.context, self.node_count
        )
    }
}

impl StructuredLog for ObserverAdded<'_> {
    fn log(&self) {
        tracing::debug!(
            context = self.context,
            node_count = self.node_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "observer_added",
            span_name = name,
            context = self.context,
            node_count = self.node_count,
        )
    }
}

/// Nodes matching an observer's identity were filtered out.
///
/// # Log Level
/// `debug!` - Registry bookkeeping
pub struct ObserverRemoved {
    pub removed: usize,
    pub remaining: usize,
}

impl Display for ObserverRemoved {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Observer removed: {} nodes dropped, {} remaining",
            self.removed, self.remaining
        )
    }
}

impl StructuredLog for ObserverRemoved {
    fn log(&self) {
        tracing::debug!(
            removed = self.removed,
            remaining = self.remaining,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "observer_removed",
            span_name = name,
            removed = self.removed,
            remaining = self.remaining,
        )
    }
}

/// Expired nodes were purged by an explicit compaction.
///
/// # Log Level
/// `debug!` - Registry bookkeeping
pub struct NodesCompacted {
    pub removed: usize,
    pub remaining: usize,
}

impl Display for NodesCompacted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Compacted registry: {} expired nodes purged, {} remaining",
            self.removed, self.remaining
        )
    }
}

impl StructuredLog for NodesCompacted {
    fn log(&self) {
        tracing::debug!(
            removed = self.removed,
            remaining = self.remaining,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "nodes_compacted",
            span_name = name,
            removed = self.removed,
            remaining = self.remaining,
        )
    }
}

/// A node whose observer was dropped was skipped during dispatch.
///
/// # Log Level
/// `trace!` - Expected, high-frequency event
pub struct ExpiredNodeSkipped {
    pub index: usize,
}

impl Display for ExpiredNodeSkipped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Skipping expired node at position {}", self.index)
    }
}

impl StructuredLog for ExpiredNodeSkipped {
    fn log(&self) {
        tracing::trace!(index = self.index, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("expired_node_skipped", span_name = name, index = self.index)
    }
}

/// A context refused an action during dispatch.
///
/// # Log Level
/// `warn!` - The observer will miss this invocation
///
/// # Example
/// ```
/// use multicast_delegate::errors::ContextError;
/// use multicast_delegate::observability::messages::registry::ScheduleFailed;
///
/// let error = ContextError::Closed { label: "alpha".to_string() };
/// let msg = ScheduleFailed {
///     context: "alpha",
///     error: &error,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct ScheduleFailed<'a> {
    pub context: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ScheduleFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to schedule observer callback on context '{}': {}",
            self.context, self.error
        )
    }
}

impl StructuredLog for ScheduleFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            context = self.context,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "schedule_failed",
            span_name = name,
            context = self.context,
            error = %self.error,
        )
    }
}

/// A fan-out dispatch is about to walk the registry.
///
/// # Log Level
/// `trace!` - Emitted on every invocation
///
/// # Example
/// ```
/// use multicast_delegate::observability::messages::registry::DispatchStarted;
/// use multicast_delegate::observability::messages::StructuredLog;
///
/// let msg = DispatchStarted { node_count: 3 };
/// let span = msg.span("dispatch");
/// let _guard = span.enter();
/// msg.log();
/// ```
pub struct DispatchStarted {
    pub node_count: usize,
}

impl Display for DispatchStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Dispatching to {} registered nodes", self.node_count)
    }
}

impl StructuredLog for DispatchStarted {
    fn log(&self) {
        tracing::trace!(node_count = self.node_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("dispatch", span_name = name, node_count = self.node_count)
    }
}

/// Summary of one fan-out dispatch.
///
/// # Log Level
/// `trace!` - Emitted on every invocation
pub struct DispatchCompleted {
    pub scheduled: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Display for DispatchCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dispatch scheduled {} callbacks ({} expired skipped, {} refused)",
            self.scheduled, self.skipped, self.failed
        )
    }
}

impl StructuredLog for DispatchCompleted {
    fn log(&self) {
        tracing::trace!(
            scheduled = self.scheduled,
            skipped = self.skipped,
            failed = self.failed,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "dispatch_completed",
            span_name = name,
            scheduled = self.scheduled,
            skipped = self.skipped,
            failed = self.failed,
        )
    }
}
