//! Versioned archive of per-host configuration snapshots.
//!
//! An external collector stores the full configuration text of each host at
//! successive instants. This library answers temporal questions about that
//! history: which hosts exist, when each was captured, what a host looked
//! like at (or just before) a given instant, and what changed between two
//! captures.
//!
//! # Quick Start
//!
//! ```
//! use conftrail::prelude::*;
//!
//! let store = MemoryStore::new();
//! store.put("web01", "2024-03-01T00:00:00Z".parse()?, "line1\nline2\n")?;
//! store.put("web01", "2024-03-10T00:00:00Z".parse()?, "line1\nline3\n")?;
//!
//! let archive = Archive::new(store);
//! assert_eq!(archive.list_hosts()?, ["web01"]);
//!
//! let changes = archive.diff(
//!     "web01",
//!     "2024-03-01T00:00:00Z".parse()?,
//!     "2024-03-10T00:00:00Z".parse()?,
//! )?;
//! assert_eq!(changes.ops.line_counts(), (1, 1));
//! # Ok::<(), conftrail::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`archive`] - Temporal queries and diffs over a snapshot store
//! - [`store`] - The persistence port and its file, fjall and in-memory backends
//! - [`diff`] - Line-oriented diff engine
//! - [`timestamp`] - Canonical UTC timestamps
//! - [`freshness`] - Recency classification for dashboards
//! - [`server`] - HTTP front end (requires `server` feature)
//!
//! # Feature Flags
//!
//! - `kv` - Enable the fjall-backed store (enabled by default)
//! - `logging` - Enable library-level tracing (consumers provide their own subscriber)
//! - `server` - Enable the HTTP server and its binary
//! - `full` - Enable all features

pub mod archive;
pub mod diff;
pub mod freshness;
mod logging;
pub mod prelude;
#[cfg(feature = "server")]
pub mod server;
pub mod store;
pub mod timestamp;

mod error;

// Re-export the unified error type
pub use error::{Error, Result};

pub use archive::{Archive, ArchiveError, ErrorKind, HostSummary, Snapshot, SnapshotDiff};
pub use diff::{DiffOp, DiffResult, DiffTag, diff};
pub use freshness::{Freshness, FreshnessStatus, Thresholds};
pub use store::{SnapshotStore, StoreError};
pub use timestamp::{MalformedTimestamp, Timestamp};
