//! Session-bound capability facade handed to the extension.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use wirebird_extension_sdk::{HostFacade, OpaqueState};

use crate::session::{LoginMetadata, SessionId};
use crate::store::MetadataStore;
use crate::transport::Transport;
use crate::wire::InfoQuery;

/// The capability set the host exposes to exactly the extension instance it
/// constructs for a session: raw-message injection and opaque-state
/// persistence.
///
/// Both operations are best-effort. Errors are logged against the session
/// and swallowed; nothing is retried or surfaced to the extension, so this
/// path can never destabilize the session it serves.
pub struct SessionFacade {
    session: SessionId,
    transport: Arc<dyn Transport>,
    store: Arc<dyn MetadataStore>,
    metadata: Arc<Mutex<LoginMetadata>>,
}

impl SessionFacade {
    pub fn new(
        session: SessionId,
        transport: Arc<dyn Transport>,
        store: Arc<dyn MetadataStore>,
        metadata: Arc<Mutex<LoginMetadata>>,
    ) -> Self {
        Self {
            session,
            transport,
            store,
            metadata,
        }
    }
}

impl HostFacade for SessionFacade {
    fn send_raw(&self, payload: &[u8]) {
        let query = InfoQuery::telemetry_report(payload);
        if let Err(err) = self.transport.send_query(query) {
            warn!(session = %self.session, error = %err, "failed to send telemetry report");
        }
    }

    fn save_state(&self, state: OpaqueState) {
        // Overwrite and write-through under one lock acquisition so
        // concurrent saves linearize to a single final record.
        let mut metadata = self.metadata.lock();
        metadata.extension_state = state;
        if let Err(err) = self.store.save(&self.session, &metadata) {
            warn!(session = %self.session, error = %err, "failed to persist extension state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryMetadataStore;
    use crate::transport::{self, TransportError};
    use crate::wire::{AttrValue, IqType, SERVER_ADDR};

    #[derive(Default)]
    struct RecordingTransport {
        queries: Mutex<Vec<InfoQuery>>,
    }

    impl Transport for RecordingTransport {
        fn send_query(&self, query: InfoQuery) -> transport::Result<()> {
            self.queries.lock().push(query);
            Ok(())
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn send_query(&self, _query: InfoQuery) -> transport::Result<()> {
            Err(TransportError::NotConnected)
        }
    }

    fn facade_with(
        transport: Arc<dyn Transport>,
        store: Arc<dyn MetadataStore>,
    ) -> (SessionFacade, Arc<Mutex<LoginMetadata>>) {
        let metadata = Arc::new(Mutex::new(LoginMetadata::default()));
        let facade = SessionFacade::new(
            SessionId::from("login-1"),
            transport,
            store,
            Arc::clone(&metadata),
        );
        (facade, metadata)
    }

    #[test]
    fn test_send_frames_payload_verbatim() {
        let transport = Arc::new(RecordingTransport::default());
        let (facade, _) = facade_with(transport.clone(), Arc::new(MemoryMetadataStore::new()));

        facade.send_raw(b"\x00binary\xffpayload");

        let queries = transport.queries.lock();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].query_type, IqType::Set);
        assert_eq!(queries[0].to, SERVER_ADDR);
        assert_eq!(
            queries[0].content[0].bytes(),
            Some(b"\x00binary\xffpayload".as_slice())
        );
        let stamp = queries[0].content[0]
            .attr("t")
            .and_then(AttrValue::as_int)
            .unwrap();
        assert!((chrono::Utc::now().timestamp() - stamp).abs() <= 5);
    }

    #[test]
    fn test_send_failure_is_swallowed_and_state_untouched() {
        let store = Arc::new(MemoryMetadataStore::new());
        let (facade, metadata) = facade_with(Arc::new(FailingTransport), store.clone());

        facade.send_raw(b"report");

        assert!(metadata.lock().extension_state.is_none());
        assert!(store.load(&SessionId::from("login-1")).unwrap().is_none());
    }

    #[test]
    fn test_save_writes_through_to_store() {
        let store = Arc::new(MemoryMetadataStore::new());
        let (facade, metadata) =
            facade_with(Arc::new(RecordingTransport::default()), store.clone());

        let raw = serde_json::value::RawValue::from_string(r#"{"seq":7}"#.into()).unwrap();
        facade.save_state(Some(raw));

        assert_eq!(
            metadata.lock().extension_state.as_ref().unwrap().get(),
            r#"{"seq":7}"#
        );
        let loaded = store.load(&SessionId::from("login-1")).unwrap().unwrap();
        assert_eq!(loaded.extension_state.unwrap().get(), r#"{"seq":7}"#);
    }

    #[test]
    fn test_save_none_clears_state() {
        let store = Arc::new(MemoryMetadataStore::new());
        let (facade, metadata) =
            facade_with(Arc::new(RecordingTransport::default()), store.clone());

        let raw = serde_json::value::RawValue::from_string("1".into()).unwrap();
        facade.save_state(Some(raw));
        facade.save_state(None);

        assert!(metadata.lock().extension_state.is_none());
        let loaded = store.load(&SessionId::from("login-1")).unwrap().unwrap();
        assert!(loaded.extension_state.is_none());
    }
}
