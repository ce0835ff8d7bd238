// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod context_map;
mod loader;
mod runtime;
mod validation;

pub mod consts;

pub use context_map::ContextMap;
pub use loader::{
    load_and_validate_config, load_config, parse_config, Config, ConfigFormat, ContextConfig,
    QueueKind,
};
pub use runtime::{Runtime, RuntimeBuilder};
pub use validation::validate_config;
