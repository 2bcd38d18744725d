//! Core of the Wirebird messaging client.
//!
//! This crate holds the session-facing fragment of the client: the
//! login-session model and its persisted metadata, the wire envelope types
//! and the transport seam, the durable metadata store, and the runtime
//! extension host that lets one externally built module observe the
//! connection and talk back through a narrow capability facade.
//!
//! The full wire implementation (framing, crypto, login) lives outside this
//! crate and plugs in through the [`transport::Transport`] trait.

pub mod config;
pub mod extension;
pub mod logging;
pub mod session;
pub mod store;
pub mod transport;
pub mod wire;

pub use config::ClientConfig;
pub use session::{LoginMetadata, Session, SessionId};

/// Re-exports commonly used types.
pub mod prelude {
    pub use crate::config::{env_vars, ClientConfig};
    pub use crate::extension::{
        noop_extension, ExtensionFactory, ExtensionHostError, SessionFacade,
    };
    pub use crate::session::{LoginMetadata, Session, SessionId};
    pub use crate::store::{MemoryMetadataStore, MetadataStore, RedbMetadataStore, StoreError};
    pub use crate::transport::{Transport, TransportError, TransportEvent};
    pub use crate::wire::{AttrValue, InfoQuery, IqType, Node, NodeContent, SERVER_ADDR};

    // Extension contract, re-exported so host-side code has one import path.
    pub use wirebird_extension_sdk::{Extension, HostFacade, OpaqueState};
}
