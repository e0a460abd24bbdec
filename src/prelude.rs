//! Convenient re-exports for common usage patterns.
//!
//! # Example
//!
//! ```
//! use conftrail::prelude::*;
//!
//! let archive = Archive::new(MemoryStore::new());
//! assert!(archive.list_hosts()?.is_empty());
//! # Ok::<(), Error>(())
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Queries
pub use crate::archive::{Archive, ArchiveError, ErrorKind, HostSummary, Snapshot, SnapshotDiff};
pub use crate::diff::{DiffOp, DiffResult, DiffTag};
pub use crate::timestamp::{MalformedTimestamp, Timestamp};

// Storage backends
#[cfg(feature = "kv")]
pub use crate::store::FjallStore;
pub use crate::store::{FileStore, MemoryStore, SnapshotStore, StoreError};
