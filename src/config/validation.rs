//! Validation of context configurations.
//!
//! Checks run in a fixed order and accumulate, so a user sees every problem in
//! one pass:
//!
//! 1. **Labels**: non-empty and unique
//! 2. **Default context**: must name a declared context
//! 3. **Concurrency**: only on concurrent queues, within bounds
//!
//! # Examples
//!
//! ```rust
//! use multicast_delegate::config::{validate_config, Config, ContextConfig, QueueKind};
//! use multicast_delegate::errors::ValidationError;
//!
//! let config = Config {
//!     default_context: "ui".to_string(),
//!     contexts: vec![ContextConfig {
//!         label: "main".to_string(),
//!         kind: QueueKind::Serial,
//!         max_concurrency: None,
//!     }],
//! };
//!
//! let errors = validate_config(&config).unwrap_err();
//! assert_eq!(
//!     errors,
//!     vec![ValidationError::UnknownDefaultContext { label: "ui".to_string() }]
//! );
//! ```

use std::collections::HashSet;

use crate::config::consts::{MAX_CONCURRENCY, MIN_CONCURRENCY};
use crate::config::{Config, QueueKind};
use crate::errors::ValidationError;

/// Validates a context configuration.
///
/// # Returns
///
/// * `Ok(())` - Every context can be built
/// * `Err(Vec<ValidationError>)` - All problems found, in check order
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    errors.extend(validate_labels(config));
    errors.extend(validate_default_context(config));
    errors.extend(validate_concurrency(config));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_labels(config: &Config) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    for (index, context) in config.contexts.iter().enumerate() {
        if context.label.trim().is_empty() {
            errors.push(ValidationError::EmptyLabel { index });
            continue;
        }
        // Report each duplicate label once, however often it repeats.
        if !seen.insert(context.label.as_str()) && reported.insert(context.label.as_str()) {
            errors.push(ValidationError::DuplicateLabel {
                label: context.label.clone(),
            });
        }
    }
    errors
}

fn validate_default_context(config: &Config) -> Option<ValidationError> {
    let declared = config
        .contexts
        .iter()
        .any(|context| context.label == config.default_context);

    (!declared).then(|| ValidationError::UnknownDefaultContext {
        label: config.default_context.clone(),
    })
}

fn validate_concurrency(config: &Config) -> Vec<ValidationError> {
    config
        .contexts
        .iter()
        .filter_map(|context| {
            let requested = context.max_concurrency?;
            if context.kind != QueueKind::Concurrent {
                return Some(ValidationError::ConcurrencyNotApplicable {
                    label: context.label.clone(),
                });
            }
            if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&requested) {
                return Some(ValidationError::ConcurrencyOutOfRange {
                    label: context.label.clone(),
                    requested,
                    min: MIN_CONCURRENCY,
                    max: MAX_CONCURRENCY,
                });
            }
            None
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContextConfig;

    fn context(label: &str, kind: QueueKind, max_concurrency: Option<usize>) -> ContextConfig {
        ContextConfig {
            label: label.to_string(),
            kind,
            max_concurrency,
        }
    }

    fn config(default_context: &str, contexts: Vec<ContextConfig>) -> Config {
        Config {
            default_context: default_context.to_string(),
            contexts,
        }
    }

    #[test]
    fn test_valid_config() {
        let cfg = config(
            "main",
            vec![
                context("main", QueueKind::Serial, None),
                context("alpha", QueueKind::Concurrent, Some(4)),
                context("tests", QueueKind::Manual, None),
            ],
        );
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn test_duplicate_labels_reported_once() {
        let cfg = config(
            "main",
            vec![
                context("main", QueueKind::Serial, None),
                context("main", QueueKind::Serial, None),
                context("main", QueueKind::Manual, None),
            ],
        );
        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateLabel {
                label: "main".to_string()
            }]
        );
    }

    #[test]
    fn test_empty_label() {
        let cfg = config(
            "main",
            vec![
                context("main", QueueKind::Serial, None),
                context("  ", QueueKind::Serial, None),
            ],
        );
        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyLabel { index: 1 }]);
    }

    #[test]
    fn test_missing_default_context() {
        let cfg = config("main", vec![]);
        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnknownDefaultContext {
                label: "main".to_string()
            }]
        );
    }

    #[test]
    fn test_concurrency_on_serial_queue() {
        let cfg = config("main", vec![context("main", QueueKind::Serial, Some(2))]);
        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::ConcurrencyNotApplicable {
                label: "main".to_string()
            }]
        );
    }

    #[test]
    fn test_concurrency_bounds() {
        let cfg = config(
            "main",
            vec![
                context("main", QueueKind::Serial, None),
                context("zero", QueueKind::Concurrent, Some(0)),
                context("huge", QueueKind::Concurrent, Some(MAX_CONCURRENCY + 1)),
                context("edge", QueueKind::Concurrent, Some(MAX_CONCURRENCY)),
            ],
        );
        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            &errors[0],
            ValidationError::ConcurrencyOutOfRange { label, requested: 0, .. } if label == "zero"
        ));
        assert!(matches!(
            &errors[1],
            ValidationError::ConcurrencyOutOfRange { label, .. } if label == "huge"
        ));
    }

    #[test]
    fn test_errors_accumulate() {
        let cfg = config(
            "ui",
            vec![
                context("", QueueKind::Serial, None),
                context("pool", QueueKind::Manual, Some(3)),
            ],
        );
        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
