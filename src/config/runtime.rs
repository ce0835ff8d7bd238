// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::config::{validate_config, Config, ContextConfig, ContextMap, QueueKind};
use crate::contexts::{ConcurrentQueue, ManualQueue, SerialQueue};
use crate::delegate::MulticastDelegate;
use crate::errors::{ConfigError, ContextError};
use crate::traits::ExecutionContext;

/// The execution contexts declared by a config, built and ready to use.
pub struct Runtime {
    contexts: ContextMap,
    default_context: Arc<dyn ExecutionContext>,
}

impl Runtime {
    pub fn contexts(&self) -> &ContextMap {
        &self.contexts
    }

    pub fn default_context(&self) -> &Arc<dyn ExecutionContext> {
        &self.default_context
    }

    /// Context declared under `label`, if any.
    pub fn context(&self, label: &str) -> Option<Arc<dyn ExecutionContext>> {
        self.contexts.context(label)
    }

    /// An empty registry bound to the configured default context.
    pub fn registry<T>(&self) -> MulticastDelegate<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        MulticastDelegate::new(Arc::clone(&self.default_context))
    }

    /// Wait for every context to finish the work scheduled so far.
    pub async fn flush_all(&self) {
        for label in self.contexts.labels() {
            if let Some(context) = self.contexts.get(label) {
                context.flush().await;
            }
        }
    }

    /// Stop every context from accepting new work.
    pub fn shutdown(&self) {
        for context in self.contexts.values() {
            context.shutdown();
        }
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("contexts", &self.contexts)
            .field("default_context", &self.default_context.label())
            .finish()
    }
}

/// Runtime builder - turns a context configuration into live execution contexts.
///
/// # Examples
///
/// ```
/// use multicast_delegate::config::{Config, ContextConfig, QueueKind, RuntimeBuilder};
///
/// let config = Config {
///     default_context: "main".to_string(),
///     contexts: vec![ContextConfig {
///         label: "main".to_string(),
///         kind: QueueKind::Manual,
///         max_concurrency: None,
///     }],
/// };
///
/// let runtime = RuntimeBuilder::from_config(&config).unwrap();
/// assert_eq!(runtime.default_context().label(), "main");
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Validate `cfg` and build its contexts.
    ///
    /// Serial and concurrent queues are spawned on the current tokio runtime;
    /// declaring one outside a runtime fails with `ContextError::NoRuntime`.
    pub fn from_config(cfg: &Config) -> Result<Runtime, ConfigError> {
        Self::build(cfg, Handle::try_current().ok())
    }

    /// Like `from_config`, spawning tokio-backed queues on `handle`.
    pub fn with_handle(cfg: &Config, handle: Handle) -> Result<Runtime, ConfigError> {
        Self::build(cfg, Some(handle))
    }

    fn build(cfg: &Config, handle: Option<Handle>) -> Result<Runtime, ConfigError> {
        validate_config(cfg).map_err(ConfigError::Invalid)?;

        let mut contexts = ContextMap::new();
        for context_cfg in &cfg.contexts {
            contexts.insert(Self::build_context(context_cfg, handle.as_ref())?);
        }

        // Validation guarantees the default is declared.
        let default_context = contexts.context(&cfg.default_context).ok_or_else(|| {
            ConfigError::Invalid(vec![crate::errors::ValidationError::UnknownDefaultContext {
                label: cfg.default_context.clone(),
            }])
        })?;

        Ok(Runtime {
            contexts,
            default_context,
        })
    }

    fn build_context(
        cfg: &ContextConfig,
        handle: Option<&Handle>,
    ) -> Result<Arc<dyn ExecutionContext>, ContextError> {
        let require_handle = || {
            handle.cloned().ok_or_else(|| ContextError::NoRuntime {
                label: cfg.label.clone(),
            })
        };

        let context: Arc<dyn ExecutionContext> = match cfg.kind {
            QueueKind::Serial => Arc::new(SerialQueue::with_handle(&cfg.label, &require_handle()?)),
            QueueKind::Concurrent => Arc::new(ConcurrentQueue::with_handle(
                &cfg.label,
                cfg.effective_concurrency(),
                require_handle()?,
            )),
            QueueKind::Manual => Arc::new(ManualQueue::new(&cfg.label)),
        };
        Ok(context)
    }
}
