// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod multicast;
pub mod node;
#[cfg(test)]
mod integration_tests;

pub use multicast::{DispatchReport, MulticastDelegate};
pub use node::WeakNode;
