//! Wirebird Extension SDK
//!
//! The ABI contract between the Wirebird client and externally built
//! extension modules. A module is a `cdylib` compiled against this crate; it
//! exports two fixed symbols (emitted by [`export_extension!`]) and the host
//! resolves them once at startup:
//!
//! - `wirebird_extension_abi_version() -> u32` - checked against
//!   [`ABI_VERSION`] before anything else runs; a mismatch aborts client
//!   startup.
//! - `wirebird_extension_create(OpaqueState, Arc<dyn HostFacade>) ->
//!   Box<dyn Extension>` - the constructor the host calls once per session.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wirebird_extension_sdk::prelude::*;
//!
//! struct MyExtension {
//!     facade: Arc<dyn HostFacade>,
//! }
//!
//! impl MyExtension {
//!     fn create(_state: OpaqueState, facade: Arc<dyn HostFacade>) -> Box<dyn Extension> {
//!         Box::new(Self { facade })
//!     }
//! }
//!
//! impl Extension for MyExtension {
//!     fn on_connect(&self, version: u32, platform: &str) {
//!         self.facade.send_raw(format!("{platform}/{version}").as_bytes());
//!     }
//! }
//!
//! export_extension!(MyExtension::create);
//! ```

#[macro_use]
pub mod macros;
pub mod types;

pub use types::{
    ABI_VERSION, ABI_VERSION_SYMBOL, CREATE_SYMBOL, Extension, ExtensionCreateFn, ExtensionCtor,
    HostFacade, OpaqueState,
};

/// Prelude module with common imports for extension authors.
pub mod prelude {
    pub use crate::types::{ABI_VERSION, Extension, HostFacade, OpaqueState};

    // The export_extension! macro is available at the crate root due to
    // #[macro_use].
}
