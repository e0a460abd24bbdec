//! Persistence port and its backends.
//!
//! The archive never touches storage directly. It consumes a
//! [`SnapshotStore`], which only has to enumerate hosts, enumerate the
//! timestamps of one host (in any order), and return the raw content stored
//! under a `(host, timestamp)` pair.
//!
//! Backends:
//! - [`FileStore`]: one directory per host, one file per timestamp
//! - [`FjallStore`]: an LSM key-value store (requires `kv` feature)
//! - [`MemoryStore`]: in-process map, for tests and embedding
//!
//! Writing snapshots is the job of an external collector. The concrete
//! backends expose a `put` for it, but the port itself is read-only.

mod error;
mod file;
#[cfg(feature = "kv")]
mod format;
#[cfg(feature = "kv")]
mod kv;
mod memory;

use std::sync::Arc;

pub use error::StoreError;
pub use file::FileStore;
#[cfg(feature = "kv")]
pub use kv::FjallStore;
pub use memory::MemoryStore;

use crate::timestamp::Timestamp;

/// Read access to durably stored snapshots.
///
/// Implementations report an unknown host as [`StoreError::HostNotFound`]
/// and a missing snapshot of a known host as [`StoreError::EntryNotFound`].
/// Any other error is treated by callers as the store being unavailable.
pub trait SnapshotStore {
    /// All host identifiers, in no particular order.
    fn names(&self) -> Result<Vec<String>, StoreError>;

    /// All timestamps recorded for `host`, in no particular order.
    fn dates(&self, host: &str) -> Result<Vec<Timestamp>, StoreError>;

    /// The content stored for `host` at exactly `timestamp`.
    fn get(&self, host: &str, timestamp: Timestamp) -> Result<String, StoreError>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for &S {
    fn names(&self) -> Result<Vec<String>, StoreError> {
        (**self).names()
    }

    fn dates(&self, host: &str) -> Result<Vec<Timestamp>, StoreError> {
        (**self).dates(host)
    }

    fn get(&self, host: &str, timestamp: Timestamp) -> Result<String, StoreError> {
        (**self).get(host, timestamp)
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn names(&self) -> Result<Vec<String>, StoreError> {
        (**self).names()
    }

    fn dates(&self, host: &str) -> Result<Vec<Timestamp>, StoreError> {
        (**self).dates(host)
    }

    fn get(&self, host: &str, timestamp: Timestamp) -> Result<String, StoreError> {
        (**self).get(host, timestamp)
    }
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Arc<S> {
    fn names(&self) -> Result<Vec<String>, StoreError> {
        (**self).names()
    }

    fn dates(&self, host: &str) -> Result<Vec<Timestamp>, StoreError> {
        (**self).dates(host)
    }

    fn get(&self, host: &str, timestamp: Timestamp) -> Result<String, StoreError> {
        (**self).get(host, timestamp)
    }
}

/// Check that a host name can be used as a directory name and key prefix.
pub fn validate_host(host: &str) -> Result<(), StoreError> {
    let valid = !host.is_empty()
        && host != "."
        && host != ".."
        && !host.contains(['/', '\\', '\0']);
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidHost(host.to_string()))
    }
}
