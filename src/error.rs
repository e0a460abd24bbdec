//! Unified error type for the conftrail library.
//!
//! Module-specific errors convert into [`Error`] with `?`, so application
//! code can use a single result type.

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::store::StoreError;
use crate::timestamp::MalformedTimestamp;

/// Unified error type for all conftrail operations.
///
/// # Example
///
/// ```
/// use conftrail::{Archive, Result};
/// use conftrail::store::MemoryStore;
///
/// fn newest(archive: &Archive<MemoryStore>, host: &str) -> Result<String> {
///     Ok(archive.latest(host)?.content)
/// }
///
/// let store = MemoryStore::new();
/// store.put("web01", "2024-03-01T00:00:00Z".parse()?, "hostname web01\n")?;
/// assert_eq!(newest(&Archive::new(store), "web01")?, "hostname web01\n");
/// # Ok::<(), conftrail::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an archive query.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Error from a snapshot store.
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Timestamp(#[from] MalformedTimestamp),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if the error means the requested host or snapshot
    /// does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Archive(e) => e.is_not_found(),
            Self::Store(e) => e.is_not_found(),
            Self::Timestamp(_) | Self::Io(_) => false,
        }
    }

    /// Returns `true` if this is an archive query error.
    pub fn is_archive(&self) -> bool {
        matches!(self, Self::Archive(_))
    }

    /// Returns `true` if this is a storage error.
    pub fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
