// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging.
//!
//! All diagnostic output of the crate goes through message types defined in
//! [`messages`]. Each message is a small struct with a `Display` impl and a
//! [`messages::StructuredLog`] impl, so call sites never carry format strings
//! and log fields stay consistent between the registry and the contexts.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::registry` - observer registration, removal and dispatch
//! * `messages::context` - execution context lifecycle and job failures
//!
//! # Usage
//!
//! ```rust
//! use multicast_delegate::observability::messages::registry::ObserverAdded;
//! use multicast_delegate::observability::messages::StructuredLog;
//!
//! let msg = ObserverAdded {
//!     context: "main",
//!     node_count: 3,
//! };
//!
//! msg.log();
//! ```

pub mod messages;
