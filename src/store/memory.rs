//! In-process snapshot store.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::timestamp::Timestamp;

use super::error::StoreError;
use super::{SnapshotStore, validate_host};

/// A [`SnapshotStore`] held entirely in memory.
///
/// Timestamps are kept in insertion order and returned that way from
/// [`dates`](SnapshotStore::dates), like a backend with no ordering
/// guarantee.
///
/// # Example
///
/// ```
/// use conftrail::store::{MemoryStore, SnapshotStore};
/// use conftrail::Timestamp;
///
/// let store = MemoryStore::new();
/// let t: Timestamp = "2024-03-01T00:00:00Z".parse()?;
/// store.put("web01", t, "hostname web01\n")?;
///
/// assert_eq!(store.get("web01", t)?, "hostname web01\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    hosts: RwLock<HashMap<String, Vec<(Timestamp, String)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a host without any snapshot.
    pub fn add_host(&self, host: &str) -> Result<(), StoreError> {
        validate_host(host)?;
        let mut hosts = self.hosts.write().map_err(|_| StoreError::Poisoned)?;
        hosts.entry(host.to_string()).or_default();
        Ok(())
    }

    /// Store a snapshot, replacing any previous content at the same instant.
    pub fn put(
        &self,
        host: &str,
        timestamp: Timestamp,
        content: impl Into<String>,
    ) -> Result<(), StoreError> {
        validate_host(host)?;
        let content = content.into();
        let mut hosts = self.hosts.write().map_err(|_| StoreError::Poisoned)?;
        let entries = hosts.entry(host.to_string()).or_default();

        match entries.iter_mut().find(|(t, _)| *t == timestamp) {
            Some((_, existing)) => *existing = content,
            None => entries.push((timestamp, content)),
        }
        Ok(())
    }
}

impl SnapshotStore for MemoryStore {
    fn names(&self) -> Result<Vec<String>, StoreError> {
        let hosts = self.hosts.read().map_err(|_| StoreError::Poisoned)?;
        Ok(hosts.keys().cloned().collect())
    }

    fn dates(&self, host: &str) -> Result<Vec<Timestamp>, StoreError> {
        let hosts = self.hosts.read().map_err(|_| StoreError::Poisoned)?;
        let entries = hosts
            .get(host)
            .ok_or_else(|| StoreError::HostNotFound(host.to_string()))?;
        Ok(entries.iter().map(|(t, _)| *t).collect())
    }

    fn get(&self, host: &str, timestamp: Timestamp) -> Result<String, StoreError> {
        let hosts = self.hosts.read().map_err(|_| StoreError::Poisoned)?;
        let entries = hosts
            .get(host)
            .ok_or_else(|| StoreError::HostNotFound(host.to_string()))?;
        entries
            .iter()
            .find(|(t, _)| *t == timestamp)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| StoreError::EntryNotFound {
                host: host.to_string(),
                timestamp,
            })
    }
}
