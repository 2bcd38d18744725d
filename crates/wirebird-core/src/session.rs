//! Login sessions and their persisted metadata.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use wirebird_extension_sdk::{Extension, OpaqueState};

use crate::extension::{noop_extension, ExtensionFactory, SessionFacade};
use crate::store::{self, MetadataStore};
use crate::transport::{Transport, TransportEvent};

/// Unique identifier for a login session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Create a new random session ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Persisted per-login metadata record.
///
/// `extension_state` is owned by the loaded extension; the host stores and
/// returns it without ever looking inside.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginMetadata {
    /// Device identifier assigned at pairing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,

    /// Opaque extension-owned state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension_state: OpaqueState,
}

/// A live login session: transport and store handles, the metadata record,
/// and the attached extension instance.
pub struct Session {
    id: SessionId,
    transport: Arc<dyn Transport>,
    store: Arc<dyn MetadataStore>,
    metadata: Arc<Mutex<LoginMetadata>>,
    extension: Arc<dyn Extension>,
}

impl Session {
    /// Open a session, loading its persisted metadata.
    ///
    /// The extension reference starts at the no-op default; call
    /// [`attach_extension`](Self::attach_extension) during setup to replace
    /// it. It is never unset, so no caller checks for extension presence.
    pub fn open(
        id: SessionId,
        transport: Arc<dyn Transport>,
        store: Arc<dyn MetadataStore>,
    ) -> store::Result<Self> {
        let metadata = store.load(&id)?.unwrap_or_default();
        Ok(Self {
            id,
            transport,
            store,
            metadata: Arc::new(Mutex::new(metadata)),
            extension: noop_extension(),
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Snapshot of the current metadata record.
    pub fn metadata(&self) -> LoginMetadata {
        self.metadata.lock().clone()
    }

    /// Construct and attach the session's extension instance.
    ///
    /// With a factory present, the constructor receives the session's
    /// persisted opaque state and a facade bound to this session. Without
    /// one, the no-op default stays in place. Called once during session
    /// setup.
    pub fn attach_extension(&mut self, factory: Option<&ExtensionFactory>) {
        let Some(factory) = factory else {
            return;
        };

        let state = self.metadata.lock().extension_state.clone();
        let facade = Arc::new(SessionFacade::new(
            self.id.clone(),
            Arc::clone(&self.transport),
            Arc::clone(&self.store),
            Arc::clone(&self.metadata),
        ));
        self.extension = Arc::from(factory.construct(state, facade));
        debug!(session = %self.id, "extension attached");
    }

    /// Dispatch one transport event.
    ///
    /// Connect notifications go to the extension synchronously, on the
    /// caller's execution context: no queuing, no retry, no timeout. An
    /// extension that blocks here blocks event processing.
    pub fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::Connected { version, platform } => {
                debug!(session = %self.id, version, platform = %platform, "handshake complete");
                self.extension.on_connect(version, &platform);
            }
            TransportEvent::Disconnected => {
                debug!(session = %self.id, "connection lost");
            }
        }
    }

    /// Drain transport events until the channel closes, dispatching each in
    /// arrival order.
    pub async fn run(&self, mut events: mpsc::UnboundedReceiver<TransportEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
    }
}
