// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Multicast delegate: weakly held observers, each called back on its own context.
//!
//! A [`MulticastDelegate<T>`] keeps an ordered list of [`WeakNode`]s. Every
//! node pairs a `Weak<T>` with an optional [`ExecutionContext`]; nodes without
//! one fall back to the default context given at construction.
//!
//! # Dispatch
//!
//! [`MulticastDelegate::invoke`] walks the nodes in registration order. For each
//! observer that is still alive it schedules the action on the node's context
//! and moves on; it never waits for an action to run. Nodes whose observer has
//! been dropped are skipped but stay in storage until [`MulticastDelegate::remove`]
//! or [`MulticastDelegate::compact`] purges them, so [`MulticastDelegate::count`]
//! is a storage count, not a live-observer count.
//!
//! # Storage
//!
//! The node list sits behind an `Arc` and is replaced wholesale on every
//! mutation. Cloning a registry is cheap and the clones share storage until one
//! of them changes. Dispatch iterates a snapshot of the list, never the live
//! sequence. Mutation takes `&mut self`; registries shared between threads
//! belong behind a lock.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use multicast_delegate::contexts::ManualQueue;
//! use multicast_delegate::delegate::MulticastDelegate;
//!
//! trait Listener: Send + Sync {
//!     fn on_message(&self, text: &str);
//! }
//!
//! struct Inbox(Mutex<Vec<String>>);
//!
//! impl Listener for Inbox {
//!     fn on_message(&self, text: &str) {
//!         self.0.lock().unwrap().push(text.to_string());
//!     }
//! }
//!
//! let main = Arc::new(ManualQueue::new("main"));
//! let mut delegate: MulticastDelegate<dyn Listener> = MulticastDelegate::new(main.clone());
//!
//! let inbox = Arc::new(Inbox(Mutex::new(Vec::new())));
//! let listener: Arc<dyn Listener> = inbox.clone();
//! delegate.add(Some(&listener));
//!
//! delegate.dispatch(|l| l.on_message("hello"));
//! assert!(inbox.0.lock().unwrap().is_empty()); // only scheduled so far
//!
//! main.run_pending();
//! assert_eq!(*inbox.0.lock().unwrap(), vec!["hello".to_string()]);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::delegate::node::WeakNode;
use crate::observability::messages::registry::{
    DispatchCompleted, DispatchStarted, ExpiredNodeSkipped, NodesCompacted, ObserverAdded,
    ObserverRemoved, ScheduleFailed,
};
use crate::observability::messages::StructuredLog;
use crate::traits::ExecutionContext;

/// What a single `invoke` did with each node.
///
/// Purely informational: dispatch never fails from the caller's point of view.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Actions handed to a context.
    pub scheduled: usize,
    /// Nodes whose observer had already been dropped.
    pub skipped: usize,
    /// Actions a context refused, e.g. because it was shut down.
    pub failed: usize,
}

/// Registry of weakly held observers of shape `T`.
///
/// `T` is usually a trait object (`dyn Listener`) so that unrelated types can
/// observe the same events.
pub struct MulticastDelegate<T: ?Sized> {
    nodes: Arc<Vec<WeakNode<T>>>,
    default_context: Arc<dyn ExecutionContext>,
}

impl<T> MulticastDelegate<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    /// Create an empty registry. Nodes registered without a context are
    /// dispatched on `default_context`.
    pub fn new(default_context: Arc<dyn ExecutionContext>) -> Self {
        Self {
            nodes: Arc::new(Vec::new()),
            default_context,
        }
    }

    /// Number of stored nodes, including ones whose observer has been dropped.
    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes whose observer is still alive.
    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_alive()).count()
    }

    pub fn default_context(&self) -> &Arc<dyn ExecutionContext> {
        &self.default_context
    }

    /// The stored nodes, in registration order.
    pub fn nodes(&self) -> &[WeakNode<T>] {
        &self.nodes
    }

    /// Register `observer` on the default context.
    ///
    /// `None` is ignored. Adding the same observer twice registers it twice.
    pub fn add(&mut self, observer: Option<&Arc<T>>) {
        self.add_on(observer, None);
    }

    /// Register `observer` on `context`, or on the default context when
    /// `context` is `None`.
    ///
    /// `None` as the observer is ignored. Adding the same observer twice
    /// registers it twice.
    pub fn add_on(&mut self, observer: Option<&Arc<T>>, context: Option<Arc<dyn ExecutionContext>>) {
        let Some(observer) = observer else {
            return;
        };

        let node = WeakNode::new(observer, context);
        let context_label = node
            .context()
            .unwrap_or(&self.default_context)
            .label()
            .to_string();

        let mut nodes = Vec::with_capacity(self.nodes.len() + 1);
        nodes.extend(self.nodes.iter().cloned());
        nodes.push(node);
        self.nodes = Arc::new(nodes);

        ObserverAdded {
            context: &context_label,
            node_count: self.nodes.len(),
        }
        .log();
    }

    /// Drop every node that resolves to exactly `observer`.
    ///
    /// `None` is ignored. Nodes whose observer has already been dropped are
    /// kept; only identity matches are removed. Order of the rest is preserved.
    pub fn remove(&mut self, observer: Option<&Arc<T>>) {
        let Some(observer) = observer else {
            return;
        };

        let before = self.nodes.len();
        let nodes: Vec<WeakNode<T>> = self
            .nodes
            .iter()
            .filter(|node| !node.refers_to(observer))
            .cloned()
            .collect();
        let removed = before - nodes.len();
        self.nodes = Arc::new(nodes);

        ObserverRemoved {
            removed,
            remaining: self.nodes.len(),
        }
        .log();
    }

    /// Purge nodes whose observer has been dropped. Returns how many went.
    pub fn compact(&mut self) -> usize {
        let before = self.nodes.len();
        let nodes: Vec<WeakNode<T>> = self
            .nodes
            .iter()
            .filter(|node| node.is_alive())
            .cloned()
            .collect();
        let removed = before - nodes.len();
        if removed > 0 {
            self.nodes = Arc::new(nodes);
        }

        NodesCompacted {
            removed,
            remaining: self.nodes.len(),
        }
        .log();
        removed
    }

    /// Schedule `action` for every live observer on that observer's context.
    ///
    /// Returns as soon as everything is enqueued. `None` or an empty registry
    /// does nothing. Scheduling follows registration order; completion order
    /// across contexts is unspecified.
    pub fn invoke<F>(&self, action: Option<F>) -> DispatchReport
    where
        F: Fn(Arc<T>) + Send + Sync + 'static,
    {
        let mut report = DispatchReport::default();
        let Some(action) = action else {
            return report;
        };

        let nodes = Arc::clone(&self.nodes);
        if nodes.is_empty() {
            return report;
        }

        let start_msg = DispatchStarted {
            node_count: nodes.len(),
        };
        let span = start_msg.span("invoke");
        let _guard = span.enter();
        start_msg.log();

        let action = Arc::new(action);
        for (index, node) in nodes.iter().enumerate() {
            let Some(observer) = node.resolve() else {
                ExpiredNodeSkipped { index }.log();
                report.skipped += 1;
                continue;
            };

            let context = node.context().unwrap_or(&self.default_context);
            let action = Arc::clone(&action);
            match context.schedule(Box::new(move || action(observer))) {
                Ok(()) => report.scheduled += 1,
                Err(err) => {
                    ScheduleFailed {
                        context: context.label(),
                        error: &err,
                    }
                    .log();
                    report.failed += 1;
                }
            }
        }

        DispatchCompleted {
            scheduled: report.scheduled,
            skipped: report.skipped,
            failed: report.failed,
        }
        .log();
        report
    }

    /// Shorthand for `invoke(Some(action))`.
    pub fn dispatch<F>(&self, action: F) -> DispatchReport
    where
        F: Fn(Arc<T>) + Send + Sync + 'static,
    {
        self.invoke(Some(action))
    }
}

impl<T: ?Sized> Clone for MulticastDelegate<T> {
    fn clone(&self) -> Self {
        Self {
            nodes: Arc::clone(&self.nodes),
            default_context: Arc::clone(&self.default_context),
        }
    }
}

impl<T: ?Sized> fmt::Debug for MulticastDelegate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MulticastDelegate")
            .field("node_count", &self.nodes.len())
            .field(
                "live_count",
                &self.nodes.iter().filter(|node| node.is_alive()).count(),
            )
            .field("default_context", &self.default_context.label())
            .finish()
    }
}
