//! Structured error types shared by every layer.
//!
//! All errors are `Clone` because a single in-flight synchronization result
//! is handed to every caller that joined it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Domain;

/// Reason a single record was refused at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum RecordError {
    #[error("record has an empty identifier")]
    EmptyId,
}

/// A record rejected during `upsert_all`, with its position in the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub index: usize,
    pub id: String,
    pub reason: RecordError,
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("I/O error on table {table}: {message}")]
    Io { table: String, message: String },

    #[error("Serialization error on table {table}: {message}")]
    Serialization { table: String, message: String },

    #[error("Table {table} has unsupported format version {found} (supported up to {supported})")]
    UnsupportedVersion {
        table: String,
        found: u32,
        supported: u32,
    },
}

#[derive(Debug, Clone, Error)]
pub enum PreferenceError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Preferences have unsupported format version {found} (supported up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

#[derive(Debug, Clone, Error)]
pub enum RemoteError {
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("HTTP {status} from {url}: {message}")]
    Http {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("No remote data available for {domain}")]
    Unavailable { domain: Domain },
}

#[derive(Debug, Clone, Error)]
pub enum SyncError {
    #[error("Remote fetch failed: {0}")]
    Remote(#[from] RemoteError),

    #[error("Record {index} could not be parsed: {message}")]
    Parse { index: usize, message: String },

    #[error("Store write failed: {0}")]
    Store(#[from] StoreError),

    #[error("Sync task aborted: {0}")]
    Aborted(String),
}
