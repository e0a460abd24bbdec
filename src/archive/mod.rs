//! The snapshot archive: temporal queries over a persistence port.
//!
//! [`Archive`] wraps any [`SnapshotStore`] handed to its constructor and adds
//! what the raw store does not guarantee: newest-first ordering of each
//! host's timestamps, nearest-date selection, consistent classification of
//! misses, and diffs between two dated snapshots.
//!
//! # Hosts without snapshots
//!
//! A host the store has never seen is reported as
//! [`ArchiveError::HostNotFound`] by every query. A host the store knows but
//! which has no snapshot yet lists an empty timestamp sequence, has no latest
//! timestamp, and fails nearest-date queries with
//! [`ArchiveError::NoSnapshotBeforeDate`].
//!
//! # Example
//!
//! ```
//! use conftrail::{Archive, Timestamp};
//! use conftrail::store::MemoryStore;
//!
//! let store = MemoryStore::new();
//! store.put("web01", "2024-03-01T00:00:00Z".parse()?, "ntp server a\n")?;
//! store.put("web01", "2024-03-10T00:00:00Z".parse()?, "ntp server b\n")?;
//!
//! let archive = Archive::new(store);
//! let snapshot = archive.get_nearest_at_or_before("web01", "2024-03-05T00:00:00Z".parse()?)?;
//! assert_eq!(snapshot.content, "ntp server a\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod types;

use std::time::Instant;

pub use error::{ArchiveError, ErrorKind};
pub use types::{HostSummary, Snapshot, SnapshotDiff};

use crate::diff;
use crate::logging::{debug, trace, warn};
use crate::store::SnapshotStore;
use crate::timestamp::Timestamp;

/// Read-only view over a snapshot store.
///
/// The archive keeps no state besides the store handle, so concurrent
/// queries never contend at this layer. Storage failures are returned as
/// [`ArchiveError::StorageUnavailable`] without retrying.
#[derive(Debug, Clone)]
pub struct Archive<S> {
    store: S,
}

impl<S: SnapshotStore> Archive<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// All hosts, sorted by name.
    pub fn list_hosts(&self) -> Result<Vec<String>, ArchiveError> {
        let mut hosts = self.store.names()?;
        hosts.sort();
        hosts.dedup();
        debug!(count = hosts.len(), "listed hosts");
        Ok(hosts)
    }

    /// Every timestamp recorded for `host`, newest first.
    pub fn list_timestamps(&self, host: &str) -> Result<Vec<Timestamp>, ArchiveError> {
        let mut timestamps = self.store.dates(host)?;
        timestamps.sort_unstable_by(|a, b| b.cmp(a));
        timestamps.dedup();
        trace!(host = host, count = timestamps.len(), "listed timestamps");
        Ok(timestamps)
    }

    /// The most recent timestamp of `host`, or `None` if it has no snapshot.
    pub fn latest_timestamp(&self, host: &str) -> Result<Option<Timestamp>, ArchiveError> {
        Ok(self.list_timestamps(host)?.first().copied())
    }

    /// The most recent snapshot of `host`.
    pub fn latest(&self, host: &str) -> Result<Snapshot, ArchiveError> {
        let timestamp = self
            .latest_timestamp(host)?
            .ok_or_else(|| ArchiveError::NoSnapshots(host.to_string()))?;
        self.fetch(host, timestamp)
    }

    /// The snapshot stored at exactly `timestamp`.
    pub fn get_exact(&self, host: &str, timestamp: Timestamp) -> Result<Snapshot, ArchiveError> {
        debug!(host = host, timestamp = %timestamp, "getting exact snapshot");
        self.fetch(host, timestamp)
    }

    /// The latest snapshot taken at or before `timestamp`.
    ///
    /// Fails with [`ArchiveError::NoSnapshotBeforeDate`] when every snapshot
    /// is newer than `timestamp`.
    pub fn get_nearest_at_or_before(
        &self,
        host: &str,
        timestamp: Timestamp,
    ) -> Result<Snapshot, ArchiveError> {
        self.get_nearest_at_or_before_until(host, timestamp, None)
    }

    /// Like [`get_nearest_at_or_before`](Self::get_nearest_at_or_before),
    /// giving up with [`ArchiveError::DeadlineExceeded`] if `deadline` has
    /// passed once the index is loaded and scanned.
    pub fn get_nearest_at_or_before_until(
        &self,
        host: &str,
        timestamp: Timestamp,
        deadline: Option<Instant>,
    ) -> Result<Snapshot, ArchiveError> {
        debug!(host = host, timestamp = %timestamp, "getting nearest snapshot");

        let timestamps = self.list_timestamps(host)?;
        let chosen = select_at_or_before(&timestamps, timestamp).ok_or_else(|| {
            debug!(host = host, timestamp = %timestamp, "no snapshot at or before date");
            ArchiveError::NoSnapshotBeforeDate {
                host: host.to_string(),
                timestamp,
            }
        })?;

        if let Some(deadline) = deadline
            && Instant::now() >= deadline
        {
            warn!(host = host, "deadline exceeded before fetching snapshot");
            return Err(ArchiveError::DeadlineExceeded(host.to_string()));
        }

        trace!(host = host, requested = %timestamp, chosen = %chosen, "selected snapshot");
        self.fetch(host, chosen)
    }

    /// Diff the snapshots of `host` at `from` and `to`.
    ///
    /// Both timestamps must match stored snapshots exactly. Each distinct
    /// snapshot is fetched once.
    pub fn diff(
        &self,
        host: &str,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<SnapshotDiff, ArchiveError> {
        debug!(host = host, from = %from, to = %to, "diffing snapshots");

        let old = self.fetch(host, from)?;
        let ops = if from == to {
            diff::diff(&old.content, &old.content)
        } else {
            let new = self.fetch(host, to)?;
            diff::diff(&old.content, &new.content)
        };

        Ok(SnapshotDiff {
            host: host.to_string(),
            from,
            to,
            ops,
        })
    }

    /// Every host with its latest timestamp.
    ///
    /// Hosts whose index cannot be read are left out and logged; a failure
    /// to enumerate hosts is returned.
    pub fn summaries(&self) -> Result<Vec<HostSummary>, ArchiveError> {
        let hosts = self.list_hosts()?;
        let mut summaries = Vec::with_capacity(hosts.len());

        for host in hosts {
            match self.latest_timestamp(&host) {
                Ok(latest) => summaries.push(HostSummary { host, latest }),
                Err(_e) => {
                    warn!(host = %host, error = %_e, "skipping host in summary");
                }
            }
        }

        Ok(summaries)
    }

    fn fetch(&self, host: &str, timestamp: Timestamp) -> Result<Snapshot, ArchiveError> {
        let content = self.store.get(host, timestamp)?;
        Ok(Snapshot {
            host: host.to_string(),
            timestamp,
            content,
        })
    }
}

/// Pick the latest timestamp that is not after `target`.
///
/// `newest_first` must be sorted in descending order, as returned by
/// [`Archive::list_timestamps`]. Returns `None` when every entry is newer
/// than `target`, including when the slice is empty.
pub fn select_at_or_before(newest_first: &[Timestamp], target: Timestamp) -> Option<Timestamp> {
    let idx = newest_first.partition_point(|t| *t > target);
    newest_first.get(idx).copied()
}

/// Parse a timestamp supplied by a caller.
pub fn parse_timestamp(text: &str) -> Result<Timestamp, ArchiveError> {
    Ok(Timestamp::parse(text)?)
}
