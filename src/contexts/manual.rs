// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Execution context whose jobs only run when its owner says so.
//!
//! `ManualQueue` never spawns anything. Scheduled jobs sit in a FIFO until
//! [`ManualQueue::run_pending`] is called, and then run on the caller's thread.
//! This gives single-threaded hosts (and tests) a deterministic way to decide
//! when observer callbacks happen.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::errors::ContextError;
use crate::traits::{ExecutionContext, Job};

pub struct ManualQueue {
    label: String,
    jobs: Mutex<VecDeque<Job>>,
    closed: AtomicBool,
}

impl ManualQueue {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            jobs: Mutex::new(VecDeque::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Number of jobs waiting to run.
    pub fn pending(&self) -> usize {
        self.lock_jobs().len()
    }

    /// Run the jobs queued at the time of the call, oldest first.
    ///
    /// Jobs scheduled by a running job are kept for the next call. A panicking
    /// job propagates to the caller; the rest of the batch stays queued.
    /// Returns the number of jobs that ran.
    pub fn run_pending(&self) -> usize {
        let batch = self.pending();
        let mut ran = 0;
        while ran < batch && self.run_next() {
            ran += 1;
        }
        ran
    }

    /// Run only the oldest queued job. Returns `false` if none was waiting.
    pub fn run_next(&self) -> bool {
        let next = self.lock_jobs().pop_front();
        match next {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    // Lock is never held while a job runs, so poisoning only follows a panic
    // inside VecDeque itself.
    fn lock_jobs(&self) -> MutexGuard<'_, VecDeque<Job>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ExecutionContext for ManualQueue {
    fn label(&self) -> &str {
        &self.label
    }

    fn schedule(&self, job: Job) -> Result<(), ContextError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ContextError::Closed {
                label: self.label.clone(),
            });
        }
        self.lock_jobs().push_back(job);
        Ok(())
    }

    /// Runs the jobs queued at call time; jobs they schedule wait for the next flush.
    async fn flush(&self) {
        self.run_pending();
    }

    /// Already queued jobs can still be run.
    fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for ManualQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualQueue")
            .field("label", &self.label)
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, entry: &'static str) -> Job {
        let log = log.clone();
        Box::new(move || log.lock().unwrap().push(entry))
    }

    #[test]
    fn test_jobs_wait_until_run_pending() {
        let queue = ManualQueue::new("manual");
        let log = Arc::new(Mutex::new(Vec::new()));

        queue.schedule(recorder(&log, "first")).unwrap();
        queue.schedule(recorder(&log, "second")).unwrap();
        assert_eq!(queue.pending(), 2);
        assert!(log.lock().unwrap().is_empty());

        assert_eq!(queue.run_pending(), 2);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_run_next_takes_oldest() {
        let queue = ManualQueue::new("manual");
        let log = Arc::new(Mutex::new(Vec::new()));

        queue.schedule(recorder(&log, "a")).unwrap();
        queue.schedule(recorder(&log, "b")).unwrap();

        assert!(queue.run_next());
        assert_eq!(*log.lock().unwrap(), vec!["a"]);
        assert!(queue.run_next());
        assert!(!queue.run_next());
    }

    #[test]
    fn test_closed_queue_refuses_jobs() {
        let queue = ManualQueue::new("closed");
        queue.shutdown();
        assert_eq!(
            queue.schedule(Box::new(|| {})),
            Err(ContextError::Closed {
                label: "closed".to_string()
            })
        );
        assert_eq!(queue.pending(), 0);
    }

    #[tokio::test]
    async fn test_flush_leaves_jobs_scheduled_by_jobs() {
        let queue = Arc::new(ManualQueue::new("reentrant"));
        let log = Arc::new(Mutex::new(Vec::new()));

        let inner_queue = queue.clone();
        let inner_log = log.clone();
        queue
            .schedule(Box::new(move || {
                inner_log.lock().unwrap().push("outer");
                inner_queue.schedule(recorder(&inner_log, "inner")).unwrap();
            }))
            .unwrap();

        queue.flush().await;
        assert_eq!(*log.lock().unwrap(), vec!["outer"]);
        assert_eq!(queue.pending(), 1);

        queue.flush().await;
        assert_eq!(*log.lock().unwrap(), vec!["outer", "inner"]);
    }

    #[tokio::test]
    async fn test_flush_terminates_on_self_rescheduling_job() {
        fn reschedule(queue: Arc<ManualQueue>, runs: Arc<Mutex<usize>>) -> Job {
            Box::new(move || {
                *runs.lock().unwrap() += 1;
                let next = reschedule(queue.clone(), runs);
                queue.schedule(next).unwrap();
            })
        }

        let queue = Arc::new(ManualQueue::new("looping"));
        let runs = Arc::new(Mutex::new(0));
        queue
            .schedule(reschedule(queue.clone(), runs.clone()))
            .unwrap();

        queue.flush().await;
        assert_eq!(*runs.lock().unwrap(), 1);
        assert_eq!(queue.pending(), 1);
    }

    #[test]
    fn test_panicking_job_keeps_rest_of_batch() {
        let queue = ManualQueue::new("fragile");
        let log = Arc::new(Mutex::new(Vec::new()));

        queue.schedule(Box::new(|| panic!("observer blew up"))).unwrap();
        queue.schedule(recorder(&log, "survivor")).unwrap();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            queue.run_pending()
        }));
        assert!(outcome.is_err());
        assert_eq!(queue.pending(), 1);

        assert_eq!(queue.run_pending(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["survivor"]);
    }
}
