//! Contract types shared by the host and extension modules.

use std::sync::Arc;

use serde_json::value::RawValue;

/// ABI version for dynamically loaded extension modules.
/// Incremented when breaking changes are made to the extension interface.
pub const ABI_VERSION: u32 = 1;

/// Fixed export symbol the host resolves to check a module's ABI version.
pub const ABI_VERSION_SYMBOL: &str = "wirebird_extension_abi_version";

/// Fixed export symbol the host resolves to construct extension instances.
pub const CREATE_SYMBOL: &str = "wirebird_extension_create";

/// Opaque extension-owned state, stored and returned by the host without
/// interpretation.
///
/// The host persists the raw JSON text exactly as written and hands it back
/// byte-for-byte at the next construction. `None` means nothing has been
/// persisted yet (or the state was cleared).
pub type OpaqueState = Option<Box<RawValue>>;

/// In-process constructor for a statically selected extension.
pub type ExtensionCtor = fn(OpaqueState, Arc<dyn HostFacade>) -> Box<dyn Extension>;

/// Signature of the constructor symbol a module exports under
/// [`CREATE_SYMBOL`].
///
/// Crossing the library boundary with Rust types is sound only between
/// binaries built against the same SDK; [`ABI_VERSION`] is the guard.
pub type ExtensionCreateFn =
    unsafe extern "Rust" fn(OpaqueState, Arc<dyn HostFacade>) -> Box<dyn Extension>;

/// A loaded extension instance. One per session, owned by that session,
/// dropped with it.
pub trait Extension: Send + Sync {
    /// Called after each completed handshake, with the negotiated protocol
    /// version and the platform identifier.
    ///
    /// Runs synchronously on the transport's event-delivery context: a
    /// blocking implementation blocks event processing. Called at most once
    /// per handshake, in event order.
    fn on_connect(&self, version: u32, platform: &str);
}

/// Capabilities the host exposes to the extension instance it constructs.
///
/// Both operations are best-effort: failures are logged by the host and
/// never reported back, and nothing is retried. Both may be called from any
/// thread the extension owns.
pub trait HostFacade: Send + Sync {
    /// Inject a raw application-layer payload into the live session.
    ///
    /// The payload is framed into a fixed telemetry envelope and dispatched
    /// without waiting for an acknowledgment.
    fn send_raw(&self, payload: &[u8]);

    /// Replace the persisted opaque state wholesale and write it through to
    /// durable storage. `None` clears the state.
    fn save_state(&self, state: OpaqueState);
}
