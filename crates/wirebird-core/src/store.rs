//! Durable login-metadata storage.
//!
//! The session core only needs load/save of one record per session; the
//! trait keeps the backend swappable. `RedbMetadataStore` is the persistent
//! implementation, `MemoryMetadataStore` backs tests and ephemeral runs.

use std::collections::HashMap;
use std::path::Path;

use parking_lot::RwLock;
use redb::{Database, ReadableTable, TableDefinition};

use crate::session::{LoginMetadata, SessionId};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store error types.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend error.
    #[error("backend error: {0}")]
    Backend(String),

    /// Other error.
    #[error("store error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Durable store for per-session login metadata.
pub trait MetadataStore: Send + Sync {
    /// Load the metadata record for a session, if one exists.
    fn load(&self, session: &SessionId) -> Result<Option<LoginMetadata>>;

    /// Persist the metadata record for a session, replacing any previous
    /// one. The write is durable when this returns.
    fn save(&self, session: &SessionId, metadata: &LoginMetadata) -> Result<()>;
}

const LOGIN_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("login_metadata");

/// redb-backed persistent metadata store. Records are stored as JSON.
pub struct RedbMetadataStore {
    db: Database,
}

impl RedbMetadataStore {
    /// Open or create the database at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = if path.exists() {
            Database::open(path).map_err(|e| StoreError::Backend(e.to_string()))?
        } else {
            Database::create(path).map_err(|e| StoreError::Backend(e.to_string()))?
        };

        // Create the table up front so loads on a fresh database succeed.
        let txn = db
            .begin_write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        txn.open_table(LOGIN_TABLE)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        txn.commit().map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { db })
    }
}

impl MetadataStore for RedbMetadataStore {
    fn load(&self, session: &SessionId) -> Result<Option<LoginMetadata>> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let table = txn
            .open_table(LOGIN_TABLE)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let value = table
            .get(session.as_str())
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match value {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    fn save(&self, session: &SessionId, metadata: &LoginMetadata) -> Result<()> {
        let bytes = serde_json::to_vec(metadata)?;
        let txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        {
            let mut table = txn
                .open_table(LOGIN_TABLE)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            table
                .insert(session.as_str(), bytes.as_slice())
                .map_err(|e| StoreError::Backend(e.to_string()))?;
        }
        txn.commit().map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}

/// In-memory metadata store.
///
/// Records pass through the same JSON serialization as the durable backend
/// so tests exercise the real persisted format.
#[derive(Default)]
pub struct MemoryMetadataStore {
    records: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn load(&self, session: &SessionId) -> Result<Option<LoginMetadata>> {
        let records = self.records.read();
        match records.get(session.as_str()) {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
            None => Ok(None),
        }
    }

    fn save(&self, session: &SessionId, metadata: &LoginMetadata) -> Result<()> {
        let bytes = serde_json::to_vec(metadata)?;
        self.records
            .write()
            .insert(session.as_str().to_string(), bytes);
        Ok(())
    }
}
