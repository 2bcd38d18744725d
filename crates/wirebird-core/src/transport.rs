//! Transport seam between the session core and the wire implementation.

use crate::wire::InfoQuery;

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Transport error types.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// There is no live connection to enqueue onto.
    #[error("transport is not connected")]
    NotConnected,

    /// The outbound frame could not be queued.
    #[error("failed to queue outbound frame: {0}")]
    Dispatch(String),
}

/// Outbound half of the wire connection.
///
/// Implementations enqueue the frame and return: `send_query` never waits
/// for the server's reply, and an `Ok` only means the frame was accepted
/// for dispatch.
pub trait Transport: Send + Sync {
    fn send_query(&self, query: InfoQuery) -> Result<()>;
}

/// Connection-lifecycle events reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Protocol negotiation completed.
    Connected {
        /// Negotiated protocol version.
        version: u32,
        /// Platform identifier of the peer.
        platform: String,
    },
    /// The connection was lost.
    Disconnected,
}
