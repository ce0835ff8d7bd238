// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::{Arc, Weak};

use crate::traits::ExecutionContext;

/// A registered observer, held weakly, together with the context its
/// callbacks should run on.
///
/// The node never keeps its observer alive. Once the last `Arc` to the
/// observer is dropped elsewhere, [`WeakNode::resolve`] returns `None` for
/// good.
pub struct WeakNode<T: ?Sized> {
    context: Option<Arc<dyn ExecutionContext>>,
    observer: Weak<T>,
}

impl<T: ?Sized> WeakNode<T> {
    /// `context: None` means "use the registry's default context".
    pub fn new(observer: &Arc<T>, context: Option<Arc<dyn ExecutionContext>>) -> Self {
        Self {
            context,
            observer: Arc::downgrade(observer),
        }
    }

    /// The observer, if it is still alive.
    pub fn resolve(&self) -> Option<Arc<T>> {
        self.observer.upgrade()
    }

    pub fn is_alive(&self) -> bool {
        self.observer.strong_count() > 0
    }

    pub fn context(&self) -> Option<&Arc<dyn ExecutionContext>> {
        self.context.as_ref()
    }

    /// Whether this node is live and wraps exactly `observer` (same allocation).
    pub fn refers_to(&self, observer: &Arc<T>) -> bool {
        self.resolve()
            .is_some_and(|live| same_instance(&live, observer))
    }
}

/// Pointer identity, ignoring trait-object metadata.
fn same_instance<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

impl<T: ?Sized> Clone for WeakNode<T> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            observer: self.observer.clone(),
        }
    }
}

/// Nodes are equal when both resolve to the very same observer instance.
/// The bound context is not compared, and an expired node equals nothing.
impl<T: ?Sized> PartialEq for WeakNode<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self.resolve(), other.resolve()) {
            (Some(a), Some(b)) => same_instance(&a, &b),
            _ => false,
        }
    }
}

impl<T: ?Sized> fmt::Debug for WeakNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakNode")
            .field("context", &self.context.as_ref().map(|c| c.label()))
            .field("alive", &self.is_alive())
            .finish()
    }
}
