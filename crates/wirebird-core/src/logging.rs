//! Tracing setup.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// The filter defaults to `info` and can be overridden through `RUST_LOG`.
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
