// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::ContextError;

/// A unit of work handed to an execution context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// An execution context ("queue") that observers can be bound to.
///
/// Implementations accept jobs and run them later, on whatever thread or task
/// they manage. `schedule` must never run the job inline on the caller's
/// thread: the registry relies on it returning before the job executes.
#[async_trait]
pub trait ExecutionContext: Send + Sync {
    /// Human-readable name used in logs and for lookup in a `ContextMap`.
    fn label(&self) -> &str;

    /// Enqueue `job` for asynchronous execution.
    ///
    /// Returns `ContextError::Closed` once the context stopped accepting work;
    /// the job is dropped without running in that case.
    fn schedule(&self, job: Job) -> Result<(), ContextError>;

    /// Wait until every job scheduled before this call has finished.
    async fn flush(&self);

    /// Stop accepting jobs. Later `schedule` calls return `ContextError::Closed`.
    fn shutdown(&self);
}
