//! Values returned by archive queries.

use serde::Serialize;

use crate::diff::DiffResult;
use crate::timestamp::Timestamp;

/// One immutable capture of a host's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub host: String,
    pub timestamp: Timestamp,
    pub content: String,
}

/// A host and the instant of its most recent snapshot, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostSummary {
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<Timestamp>,
}

/// Line diff between two snapshots of the same host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotDiff {
    pub host: String,
    pub from: Timestamp,
    pub to: Timestamp,
    pub ops: DiffResult,
}
