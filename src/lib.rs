// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;        // context configuration + runtime builder
pub mod contexts;      // serial, concurrent and manual queues
pub mod delegate;      // weak nodes + multicast registry
pub mod errors;        // error handling
pub mod observability;
pub mod traits;        // execution context abstraction

pub use delegate::{DispatchReport, MulticastDelegate, WeakNode};
pub use traits::ExecutionContext;
