// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! FIFO execution context backed by a single tokio worker task.
//!
//! Jobs travel over an unbounded mpsc channel to the worker, which runs them
//! one after another on the blocking pool. A job never starts before the
//! previous one finished, so two observers bound to the same serial queue see
//! their callbacks in registration order.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use multicast_delegate::contexts::SerialQueue;
//! use multicast_delegate::traits::ExecutionContext;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let queue = SerialQueue::new("main")?;
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let counter = hits.clone();
//! queue.schedule(Box::new(move || {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! }))?;
//!
//! queue.flush().await;
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::contexts::run_blocking;
use crate::errors::ContextError;
use crate::observability::messages::context::{QueueStarted, QueueStopped};
use crate::observability::messages::StructuredLog;
use crate::traits::{ExecutionContext, Job};

/// Messages consumed by the worker, in the order they were sent
enum QueueMessage {
    Run(Job),
    /// Acknowledged once every earlier `Run` has finished
    Flush(oneshot::Sender<()>),
}

/// Serial execution context: a dispatch queue with exactly one worker.
pub struct SerialQueue {
    label: String,
    sender: mpsc::UnboundedSender<QueueMessage>,
    jobs_run: Arc<AtomicU64>,
    shutdown: CancellationToken,
}

impl SerialQueue {
    /// Create a serial queue whose worker runs on the current tokio runtime.
    ///
    /// Fails with `ContextError::NoRuntime` when called outside a runtime.
    pub fn new(label: impl Into<String>) -> Result<Self, ContextError> {
        let label = label.into();
        let handle = Handle::try_current().map_err(|_| ContextError::NoRuntime {
            label: label.clone(),
        })?;
        Ok(Self::with_handle(label, &handle))
    }

    /// Create a serial queue whose worker runs on `handle`.
    pub fn with_handle(label: impl Into<String>, handle: &Handle) -> Self {
        let label = label.into();
        let (sender, receiver) = mpsc::unbounded_channel();
        let jobs_run = Arc::new(AtomicU64::new(0));
        let shutdown = CancellationToken::new();

        handle.spawn(run_worker(
            label.clone(),
            receiver,
            jobs_run.clone(),
            shutdown.clone(),
        ));
        QueueStarted {
            label: &label,
            kind: "serial",
        }
        .log();

        Self {
            label,
            sender,
            jobs_run,
            shutdown,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled() || self.sender.is_closed()
    }

    /// Jobs that ran to completion so far. Panicked jobs are not counted.
    pub fn jobs_run(&self) -> u64 {
        self.jobs_run.load(Ordering::Relaxed)
    }

    fn closed_error(&self) -> ContextError {
        ContextError::Closed {
            label: self.label.clone(),
        }
    }
}

async fn run_worker(
    label: String,
    mut receiver: mpsc::UnboundedReceiver<QueueMessage>,
    jobs_run: Arc<AtomicU64>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            message = receiver.recv() => match message {
                Some(QueueMessage::Run(job)) => {
                    if run_blocking(&label, job).await {
                        jobs_run.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Some(QueueMessage::Flush(done)) => {
                    // The flusher may have given up waiting.
                    let _ = done.send(());
                }
                None => break,
            },
        }
    }
    QueueStopped {
        label: &label,
        jobs_run: jobs_run.load(Ordering::Relaxed),
    }
    .log();
}

#[async_trait]
impl ExecutionContext for SerialQueue {
    fn label(&self) -> &str {
        &self.label
    }

    fn schedule(&self, job: Job) -> Result<(), ContextError> {
        if self.shutdown.is_cancelled() {
            return Err(self.closed_error());
        }
        self.sender
            .send(QueueMessage::Run(job))
            .map_err(|_| self.closed_error())
    }

    async fn flush(&self) {
        let (done, acknowledged) = oneshot::channel();
        if self.sender.send(QueueMessage::Flush(done)).is_err() {
            return;
        }
        // A stopped worker drops the sender, which also ends the wait.
        let _ = acknowledged.await;
    }

    /// Stop the worker. Jobs still waiting in the channel are discarded.
    fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for SerialQueue {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl std::fmt::Debug for SerialQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialQueue")
            .field("label", &self.label)
            .field("jobs_run", &self.jobs_run())
            .field("closed", &self.is_closed())
            .finish()
    }
}
