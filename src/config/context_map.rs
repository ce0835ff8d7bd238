// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::traits::ExecutionContext;
use std::collections::HashMap;
use std::sync::Arc;

/// Execution contexts keyed by label.
///
/// Hosts look contexts up here when registering observers, so configuration
/// can decide which queue a given observer is called back on.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use multicast_delegate::config::ContextMap;
/// use multicast_delegate::contexts::ManualQueue;
///
/// let mut contexts = ContextMap::new();
/// contexts.insert(Arc::new(ManualQueue::new("alpha")));
///
/// assert!(contexts.contains_key("alpha"));
/// assert_eq!(contexts.context("alpha").map(|c| c.label().to_string()), Some("alpha".to_string()));
/// assert!(contexts.context("beta").is_none());
/// ```
#[derive(Clone, Default)]
pub struct ContextMap(HashMap<String, Arc<dyn ExecutionContext>>);

impl ContextMap {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Insert a context under its own label, returning any context it replaced.
    pub fn insert(&mut self, context: Arc<dyn ExecutionContext>) -> Option<Arc<dyn ExecutionContext>> {
        self.0.insert(context.label().to_string(), context)
    }

    pub fn get(&self, label: &str) -> Option<&Arc<dyn ExecutionContext>> {
        self.0.get(label)
    }

    /// Owned handle to a context, ready to pass to `MulticastDelegate::add_on`.
    pub fn context(&self, label: &str) -> Option<Arc<dyn ExecutionContext>> {
        self.0.get(label).cloned()
    }

    pub fn contains_key(&self, label: &str) -> bool {
        self.0.contains_key(label)
    }

    /// All labels, sorted for stable output.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.0.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &Arc<dyn ExecutionContext>> {
        self.0.values()
    }
}

impl std::fmt::Debug for ContextMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextMap")
            .field("context_count", &self.0.len())
            .field("labels", &self.labels())
            .finish()
    }
}
