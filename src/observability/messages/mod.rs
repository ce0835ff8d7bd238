// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! * `registry` - observer registration, removal, compaction and dispatch
//! * `context` - queue startup, shutdown and job failures
//!
//! # Usage Pattern
//!
//! ```rust
//! use multicast_delegate::observability::messages::context::QueueStarted;
//!
//! let msg = QueueStarted {
//!     label: "main",
//!     kind: "serial",
//! };
//!
//! tracing::debug!("{}", msg);
//! ```

use tracing::Span;

pub mod context;
pub mod registry;

/// Emits a message at its designated level with structured fields attached.
pub trait StructuredLog: std::fmt::Display {
    /// Log the message at the level documented on the message type.
    fn log(&self);

    /// Build a span carrying the same fields as `log`.
    fn span(&self, name: &str) -> Span;
}
