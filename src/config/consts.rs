/// Label assumed for the default context when a config omits `default_context`
pub const DEFAULT_CONTEXT_LABEL: &str = "main";
/// Minimum allowed `max_concurrency` for a concurrent queue
pub const MIN_CONCURRENCY: usize = 1;
/// Maximum allowed `max_concurrency` for a concurrent queue (blocking pool default is 512)
pub const MAX_CONCURRENCY: usize = 256;
