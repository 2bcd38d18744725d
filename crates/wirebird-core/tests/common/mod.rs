//! Shared test doubles for the integration suites.

#![allow(dead_code)]

use std::sync::Mutex;

use wirebird_core::transport::{self, Transport, TransportError};
use wirebird_core::wire::InfoQuery;
use wirebird_extension_sdk::OpaqueState;

/// Transport that records every dispatched query.
#[derive(Default)]
pub struct RecordingTransport {
    pub queries: Mutex<Vec<InfoQuery>>,
}

impl Transport for RecordingTransport {
    fn send_query(&self, query: InfoQuery) -> transport::Result<()> {
        self.queries.lock().unwrap().push(query);
        Ok(())
    }
}

/// Transport that rejects every dispatch.
pub struct FailingTransport;

impl Transport for FailingTransport {
    fn send_query(&self, _query: InfoQuery) -> transport::Result<()> {
        Err(TransportError::Dispatch("socket closed".to_string()))
    }
}

/// Opaque state from literal JSON text.
pub fn raw(text: &str) -> OpaqueState {
    Some(serde_json::value::RawValue::from_string(text.to_string()).unwrap())
}
