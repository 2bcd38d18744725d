//! Runtime extension point for the Wirebird client.
//!
//! One externally built module per process may observe connection-lifecycle
//! events and talk back to the host through a narrow capability facade:
//! raw-message injection and opaque-state persistence. The host never
//! interprets the state it round-trips.
//!
//! # Architecture
//!
//! ```text
//! startup      loader::init ──▶ process-wide ExtensionFactory (or absent)
//!                                        │
//! session      Session::attach_extension │ construct(state, facade)
//! setup                                  ▼
//!                               Box<dyn Extension>  (or NoopExtension)
//!                                        ▲
//! runtime      handshake ──▶ on_connect ─┘    facade ──▶ transport / store
//! ```
//!
//! Misconfiguration (bad module path, missing symbol, ABI mismatch) aborts
//! client startup. Runtime facade failures are logged and swallowed: the
//! extension is auxiliary instrumentation and must never fail the session.

pub mod facade;
pub mod loader;
pub mod noop;

pub use facade::SessionFacade;
pub use loader::{global, init, ExtensionFactory, ExtensionHostError};
pub use noop::{noop_extension, NoopExtension};

// The contract itself, re-exported so host-side code has one import path.
pub use wirebird_extension_sdk::{Extension, HostFacade, OpaqueState, ABI_VERSION};
