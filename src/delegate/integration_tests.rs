use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;

use crate::contexts::{ConcurrentQueue, SerialQueue};
use crate::delegate::MulticastDelegate;
use crate::errors::ContextError;
use crate::traits::{ExecutionContext, Job};

/// End-to-end dispatch over real tokio-backed queues
#[cfg(test)]
mod tests {
    use super::*;

    trait Listener: Send + Sync {
        fn on_event(&self, event: &str);
    }

    /// Appends `"<name>:<event>"` to a log shared between listeners
    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Listener for Recorder {
        fn on_event(&self, event: &str) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, event));
        }
    }

    fn recorder(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn Listener> {
        Arc::new(Recorder {
            name,
            log: log.clone(),
        })
    }

    /// Serial queue that counts the jobs it actually ran
    struct Counted {
        inner: SerialQueue,
        ran: Arc<AtomicUsize>,
    }

    impl Counted {
        fn new(label: &str) -> Arc<Self> {
            Arc::new(Self {
                inner: SerialQueue::new(label).unwrap(),
                ran: Arc::new(AtomicUsize::new(0)),
            })
        }

        fn ran(&self) -> usize {
            self.ran.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExecutionContext for Counted {
        fn label(&self) -> &str {
            self.inner.label()
        }

        fn schedule(&self, job: Job) -> Result<(), ContextError> {
            let ran = self.ran.clone();
            self.inner.schedule(Box::new(move || {
                job();
                ran.fetch_add(1, Ordering::SeqCst);
            }))
        }

        async fn flush(&self) {
            self.inner.flush().await
        }

        fn shutdown(&self) {
            self.inner.shutdown()
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_observers_run_on_their_own_contexts_after_invoke_returns() {
        let main = Counted::new("main");
        let alpha = Counted::new("alpha");
        let mut registry: MulticastDelegate<dyn Listener> = MulticastDelegate::new(main.clone());

        let log = Arc::new(Mutex::new(Vec::new()));
        let x = recorder("X", &log);
        let y = recorder("Y", &log);
        let alpha_context: Arc<dyn ExecutionContext> = alpha.clone();
        registry.add_on(Some(&x), Some(alpha_context));
        registry.add(Some(&y));

        // Actions block until the gate opens, so nothing can finish before invoke returns.
        let gate = Arc::new(RwLock::new(()));
        let closed_gate = gate.write().unwrap();
        let action_gate = gate.clone();
        let report = registry.dispatch(move |listener| {
            let _open = action_gate.read().unwrap();
            listener.on_event("ping");
        });
        assert_eq!(report.scheduled, 2);
        assert!(log.lock().unwrap().is_empty());

        drop(closed_gate);
        alpha.flush().await;
        main.flush().await;

        let mut seen = log.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, vec!["X:ping", "Y:ping"]);
        assert_eq!(alpha.ran(), 1);
        assert_eq!(main.ran(), 1);
    }

    #[tokio::test]
    async fn test_serial_context_preserves_registration_order() {
        let main = Arc::new(SerialQueue::new("main").unwrap());
        let mut registry: MulticastDelegate<dyn Listener> = MulticastDelegate::new(main.clone());

        let log = Arc::new(Mutex::new(Vec::new()));
        let names = ["a", "b", "c", "d", "e", "f"];
        let listeners: Vec<_> = names.iter().map(|&name| recorder(name, &log)).collect();
        for listener in &listeners {
            registry.add(Some(listener));
        }

        registry.dispatch(|l| l.on_event("1"));
        registry.dispatch(|l| l.on_event("2"));
        main.flush().await;

        let expected: Vec<String> = ["1", "2"]
            .iter()
            .flat_map(|event| names.iter().map(move |name| format!("{}:{}", name, event)))
            .collect();
        assert_eq!(*log.lock().unwrap(), expected);
    }

    #[tokio::test]
    async fn test_dropped_observer_stops_receiving() {
        let main = Arc::new(SerialQueue::new("main").unwrap());
        let mut registry: MulticastDelegate<dyn Listener> = MulticastDelegate::new(main.clone());

        let log = Arc::new(Mutex::new(Vec::new()));
        let a = recorder("A", &log);
        let b = recorder("B", &log);
        registry.add(Some(&a));
        registry.add(Some(&b));

        registry.dispatch(|l| l.on_event("first"));
        main.flush().await;
        drop(a);
        let report = registry.dispatch(|l| l.on_event("second"));
        main.flush().await;

        assert_eq!(report.skipped, 1);
        assert_eq!(registry.count(), 2);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["A:first", "B:first", "B:second"]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_context_reaches_every_observer() {
        let pool = Arc::new(ConcurrentQueue::new("pool", 4).unwrap());
        let mut registry: MulticastDelegate<AtomicUsize> = MulticastDelegate::new(pool.clone());

        let counters: Vec<Arc<AtomicUsize>> = (0..32).map(|_| Arc::new(AtomicUsize::new(0))).collect();
        for counter in &counters {
            registry.add(Some(counter));
        }

        registry.dispatch(|counter| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        pool.flush().await;

        assert!(counters.iter().all(|c| c.load(Ordering::SeqCst) == 1));
    }

    #[tokio::test]
    async fn test_shut_down_context_only_silences_its_own_observers() {
        let main = Arc::new(SerialQueue::new("main").unwrap());
        let audit = Arc::new(SerialQueue::new("audit").unwrap());
        let mut registry: MulticastDelegate<dyn Listener> = MulticastDelegate::new(main.clone());

        let log = Arc::new(Mutex::new(Vec::new()));
        let a = recorder("A", &log);
        let b = recorder("B", &log);
        let audit_context: Arc<dyn ExecutionContext> = audit.clone();
        registry.add_on(Some(&a), Some(audit_context));
        registry.add(Some(&b));

        audit.shutdown();
        let report = registry.dispatch(|l| l.on_event("evt"));
        main.flush().await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.scheduled, 1);
        assert_eq!(*log.lock().unwrap(), vec!["B:evt"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_registry_shared_between_tasks() {
        let main = Arc::new(SerialQueue::new("main").unwrap());
        let registry = Arc::new(Mutex::new(MulticastDelegate::<AtomicUsize>::new(main.clone())));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                let counter = Arc::new(AtomicUsize::new(0));
                registry.lock().unwrap().add(Some(&counter));
                counter
            }));
        }
        let mut counters = Vec::new();
        for handle in handles {
            counters.push(handle.await.unwrap());
        }

        registry.lock().unwrap().dispatch(|c| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        main.flush().await;

        assert_eq!(registry.lock().unwrap().count(), 8);
        assert!(counters.iter().all(|c| c.load(Ordering::SeqCst) == 1));
    }
}
