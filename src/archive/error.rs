//! Error types for archive queries.

use thiserror::Error;

use crate::store::StoreError;
use crate::timestamp::{MalformedTimestamp, Timestamp};

/// Failure classes, used by callers to pick a user-facing representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller supplied unusable input.
    InvalidInput,
    /// The requested host or snapshot does not exist.
    NotFound,
    /// The caller's deadline expired before the query finished.
    Timeout,
    /// The persistence layer failed; retrying later may help.
    Unavailable,
}

/// Errors that can occur while querying the archive.
///
/// The archive never substitutes a default answer: every miss is reported
/// with its own variant.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error(transparent)]
    MalformedTimestamp(#[from] MalformedTimestamp),

    #[error("Host not found: {0}")]
    HostNotFound(String),

    #[error("No snapshot for host {host} at {timestamp}")]
    SnapshotNotFound { host: String, timestamp: Timestamp },

    #[error("Host {0} has no snapshots")]
    NoSnapshots(String),

    #[error("No snapshot for host {host} at or before {timestamp}")]
    NoSnapshotBeforeDate { host: String, timestamp: Timestamp },

    #[error("Deadline exceeded while querying host {0}")]
    DeadlineExceeded(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[source] StoreError),
}

impl ArchiveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedTimestamp(_) => ErrorKind::InvalidInput,
            Self::HostNotFound(_)
            | Self::SnapshotNotFound { .. }
            | Self::NoSnapshots(_)
            | Self::NoSnapshotBeforeDate { .. } => ErrorKind::NotFound,
            Self::DeadlineExceeded(_) => ErrorKind::Timeout,
            Self::StorageUnavailable(_) => ErrorKind::Unavailable,
        }
    }

    /// Returns `true` if the requested host or snapshot does not exist.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<StoreError> for ArchiveError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::HostNotFound(host) => Self::HostNotFound(host),
            StoreError::EntryNotFound { host, timestamp } => {
                Self::SnapshotNotFound { host, timestamp }
            }
            other => Self::StorageUnavailable(other),
        }
    }
}
