// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Parallel execution context with a concurrency cap.
//!
//! Every scheduled job becomes its own tokio task that waits for a semaphore
//! permit and then runs the job on the blocking pool. Jobs may finish in any
//! order; the only guarantee is that no more than `max_concurrency` of them
//! run at once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::{Mutex, Semaphore};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::contexts::run_blocking;
use crate::errors::ContextError;
use crate::observability::messages::context::{QueueStarted, QueueStopped};
use crate::observability::messages::StructuredLog;
use crate::traits::{ExecutionContext, Job};

/// Get the default concurrency level based on system capabilities
///
/// Returns the number of available CPU cores, falling back to 4 if detection fails.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Concurrent execution context: jobs run in parallel, bounded by a semaphore.
pub struct ConcurrentQueue {
    label: String,
    handle: Handle,
    max_concurrency: usize,
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
    jobs_run: Arc<AtomicU64>,
    shutdown: CancellationToken,
    /// Serializes `flush`, which closes and reopens the tracker
    flush_lock: Mutex<()>,
}

impl ConcurrentQueue {
    /// Create a concurrent queue on the current tokio runtime.
    pub fn new(label: impl Into<String>, max_concurrency: usize) -> Result<Self, ContextError> {
        let label = label.into();
        let handle = Handle::try_current().map_err(|_| ContextError::NoRuntime {
            label: label.clone(),
        })?;
        Ok(Self::with_handle(label, max_concurrency, handle))
    }

    /// Create a concurrent queue whose tasks are spawned on `handle`.
    pub fn with_handle(label: impl Into<String>, max_concurrency: usize, handle: Handle) -> Self {
        let label = label.into();
        let max_concurrency = max_concurrency.max(1); // Ensure at least 1
        QueueStarted {
            label: &label,
            kind: "concurrent",
        }
        .log();

        Self {
            label,
            handle,
            max_concurrency,
            permits: Arc::new(Semaphore::new(max_concurrency)),
            tracker: TaskTracker::new(),
            jobs_run: Arc::new(AtomicU64::new(0)),
            shutdown: CancellationToken::new(),
            flush_lock: Mutex::new(()),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Jobs scheduled but not yet finished, including those waiting for a permit.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Jobs that ran to completion so far.
    pub fn jobs_run(&self) -> u64 {
        self.jobs_run.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ExecutionContext for ConcurrentQueue {
    fn label(&self) -> &str {
        &self.label
    }

    fn schedule(&self, job: Job) -> Result<(), ContextError> {
        if self.shutdown.is_cancelled() {
            return Err(ContextError::Closed {
                label: self.label.clone(),
            });
        }

        let permits = self.permits.clone();
        let label = self.label.clone();
        let jobs_run = self.jobs_run.clone();
        self.tracker.spawn_on(
            async move {
                // Closed semaphore means the queue shut down while we waited.
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };
                if run_blocking(&label, job).await {
                    jobs_run.fetch_add(1, Ordering::Relaxed);
                }
            },
            &self.handle,
        );
        Ok(())
    }

    async fn flush(&self) {
        let _guard = self.flush_lock.lock().await;
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Jobs still waiting for a permit are discarded; jobs already running
    /// are left to finish.
    fn shutdown(&self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.shutdown.cancel();
        self.permits.close();
        QueueStopped {
            label: &self.label,
            jobs_run: self.jobs_run(),
        }
        .log();
    }
}

impl Drop for ConcurrentQueue {
    fn drop(&mut self) {
        self.shutdown.cancel();
        self.permits.close();
    }
}

impl std::fmt::Debug for ConcurrentQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentQueue")
            .field("label", &self.label)
            .field("max_concurrency", &self.max_concurrency)
            .field("in_flight", &self.tracker.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}
