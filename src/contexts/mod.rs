// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Execution contexts that observers can be bound to.
//!
//! * [`SerialQueue`] - one job at a time, in scheduling order
//! * [`ConcurrentQueue`] - jobs run in parallel on tokio's blocking pool
//! * [`ManualQueue`] - jobs wait until the owner drains them explicitly

pub mod concurrent;
pub mod manual;
pub mod serial;

pub use concurrent::ConcurrentQueue;
pub use manual::ManualQueue;
pub use serial::SerialQueue;

use crate::observability::messages::context::JobPanicked;
use crate::observability::messages::StructuredLog;
use crate::traits::Job;

/// Run a job on the blocking pool and wait for it, logging a panic instead of
/// propagating it into the worker.
///
/// Returns `true` when the job ran to completion.
pub(crate) async fn run_blocking(label: &str, job: Job) -> bool {
    match tokio::task::spawn_blocking(job).await {
        Ok(()) => true,
        Err(err) if err.is_panic() => {
            let payload = err.into_panic();
            let reason = payload
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("non-string panic payload");
            JobPanicked { label, reason }.log();
            false
        }
        // Cancelled: the runtime is shutting down underneath us.
        Err(_) => false,
    }
}
