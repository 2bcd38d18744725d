//! No-op default extension.

use std::sync::Arc;

use once_cell::sync::Lazy;

use wirebird_extension_sdk::Extension;

/// Extension implementation that ignores every notification.
///
/// Substituted whenever no module is configured, so session code never
/// branches on extension presence.
#[derive(Debug, Default)]
pub struct NoopExtension;

impl Extension for NoopExtension {
    fn on_connect(&self, _version: u32, _platform: &str) {}
}

static NOOP: Lazy<Arc<NoopExtension>> = Lazy::new(|| Arc::new(NoopExtension));

/// Shared handle to the stateless no-op instance.
pub fn noop_extension() -> Arc<dyn Extension> {
    NOOP.clone()
}
