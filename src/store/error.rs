//! Error types for the persistence backends.

use thiserror::Error;

use crate::timestamp::Timestamp;

/// Errors raised by a [`SnapshotStore`](super::SnapshotStore).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Host not found: {0}")]
    HostNotFound(String),

    #[error("No snapshot for host {host} at {timestamp}")]
    EntryNotFound { host: String, timestamp: Timestamp },

    #[error("Invalid host name: {0:?}")]
    InvalidHost(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "kv")]
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("Corrupt snapshot for host {host} at {timestamp}: {reason}")]
    Corrupt {
        host: String,
        timestamp: Timestamp,
        reason: String,
    },

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Store not initialized at {0}")]
    NotInitialized(String),

    #[error("Store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Returns `true` for the two "absent" variants, which callers classify
    /// separately from genuine storage failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HostNotFound(_) | Self::EntryNotFound { .. })
    }
}
