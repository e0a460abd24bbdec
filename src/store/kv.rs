//! Snapshot store backed by fjall.

use std::path::Path;

use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};

use crate::logging::{debug, error, info, trace, warn};
use crate::timestamp::Timestamp;

use super::error::StoreError;
use super::format;
use super::{SnapshotStore, validate_host};

const META_CONFIG_KEY: &str = "config";

/// Current on-disk layout version.
/// Opening a database written with a different version is refused.
const STORE_VERSION: u32 = 1;

/// Separates the host from the timestamp in snapshot keys.
const KEY_SEPARATOR: char = '/';

/// A [`SnapshotStore`] persisted in a fjall database.
///
/// Three keyspaces are used:
/// - `_meta`: the layout version
/// - `hosts`: one empty value per known host
/// - `snapshots`: `<host>/<timestamp>` mapped to the checksummed content
///
/// Because canonical timestamps sort lexicographically, a prefix scan over
/// `<host>/` yields a host's snapshots oldest first.
///
/// # Example
///
/// ```ignore
/// use conftrail::store::{FjallStore, SnapshotStore};
///
/// let store = FjallStore::init("/var/lib/conftrail")?;
/// store.put("web01", "2024-03-01T00:00:00Z".parse()?, "hostname web01\n")?;
/// let hosts = store.names()?;
/// ```
pub struct FjallStore {
    db: fjall::Database,
    hosts: Keyspace,
    snapshots: Keyspace,
}

impl FjallStore {
    /// Open an existing store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening fjall store");

        if !path.exists() {
            error!(path = %path.display(), "store path does not exist");
            return Err(StoreError::NotInitialized(path.display().to_string()));
        }

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace("_meta", KeyspaceCreateOptions::default)?;

        let Some(config) = meta.get(META_CONFIG_KEY)? else {
            error!(path = %path.display(), "store not initialized - no config found");
            return Err(StoreError::NotInitialized(path.display().to_string()));
        };
        let version = u32::from_le_bytes(
            config
                .as_ref()
                .try_into()
                .map_err(|_| StoreError::InvalidFormat("Invalid config format".to_string()))?,
        );
        if version != STORE_VERSION {
            error!(
                stored_version = version,
                expected_version = STORE_VERSION,
                "store version mismatch"
            );
            return Err(StoreError::InvalidFormat(format!(
                "Store version mismatch: expected {}, got {}",
                STORE_VERSION, version
            )));
        }

        let store = Self::with_keyspaces(db)?;
        info!(path = %path.display(), "fjall store opened");
        Ok(store)
    }

    /// Create a new store at `path`, or reinitialize the version marker of
    /// an existing one.
    pub fn init(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "initializing fjall store");

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace("_meta", KeyspaceCreateOptions::default)?;
        meta.insert(META_CONFIG_KEY, STORE_VERSION.to_le_bytes())?;
        db.persist(PersistMode::SyncAll)?;

        let store = Self::with_keyspaces(db)?;
        info!(path = %path.display(), version = STORE_VERSION, "fjall store initialized");
        Ok(store)
    }

    /// Open the store at `path`, initializing it when the path is missing.
    pub fn open_or_init(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::init(path)
        }
    }

    fn with_keyspaces(db: fjall::Database) -> Result<Self, StoreError> {
        let hosts = db.keyspace("hosts", KeyspaceCreateOptions::default)?;
        let snapshots = db.keyspace("snapshots", KeyspaceCreateOptions::default)?;
        Ok(Self {
            db,
            hosts,
            snapshots,
        })
    }

    /// Register a host without storing a snapshot.
    pub fn add_host(&self, host: &str) -> Result<(), StoreError> {
        validate_host(host)?;
        self.hosts.insert(host, b"".as_slice())?;
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    /// Store a snapshot, replacing any content at the same instant.
    pub fn put(&self, host: &str, timestamp: Timestamp, content: &str) -> Result<(), StoreError> {
        validate_host(host)?;
        debug!(host = host, timestamp = %timestamp, bytes = content.len(), "storing snapshot");

        self.hosts.insert(host, b"".as_slice())?;
        let key = snapshot_key(host, timestamp);
        let value = format::encode(content);
        self.snapshots.insert(&key, value.as_slice())?;
        self.db.persist(PersistMode::SyncAll)?;

        debug!(host = host, timestamp = %timestamp, "snapshot stored");
        Ok(())
    }

    fn ensure_host(&self, host: &str) -> Result<(), StoreError> {
        if validate_host(host).is_err() || self.hosts.get(host)?.is_none() {
            trace!(host = host, "host not found");
            return Err(StoreError::HostNotFound(host.to_string()));
        }
        Ok(())
    }
}

fn snapshot_key(host: &str, timestamp: Timestamp) -> String {
    format!("{}{}{}", host, KEY_SEPARATOR, timestamp)
}

/// Decode the keys of a `hosts` scan. A failed read aborts the listing.
fn host_names<K, E>(keys: impl Iterator<Item = Result<K, E>>) -> Result<Vec<String>, StoreError>
where
    K: AsRef<[u8]>,
    StoreError: From<E>,
{
    keys.map(|key| Ok(String::from_utf8_lossy(key?.as_ref()).into_owned()))
        .collect()
}

/// Decode the keys of a `snapshots` prefix scan into timestamps.
///
/// Keys whose suffix is not a canonical timestamp are skipped. A failed read
/// aborts the listing, since a partial index would make nearest-date
/// selection pick the wrong snapshot.
fn snapshot_dates<K, E>(
    prefix: &str,
    keys: impl Iterator<Item = Result<K, E>>,
) -> Result<Vec<Timestamp>, StoreError>
where
    K: AsRef<[u8]>,
    StoreError: From<E>,
{
    let mut dates = Vec::new();
    for key in keys {
        let key = key?;
        let key_str = String::from_utf8_lossy(key.as_ref());
        let Some(suffix) = key_str.strip_prefix(prefix) else {
            continue;
        };
        match Timestamp::parse(suffix) {
            Ok(t) => dates.push(t),
            Err(_e) => {
                warn!(key = %key_str, error = %_e, "skipping malformed key");
            }
        }
    }
    Ok(dates)
}

impl SnapshotStore for FjallStore {
    fn names(&self) -> Result<Vec<String>, StoreError> {
        let names = host_names(self.hosts.prefix("").map(|kv| kv.key()))?;
        trace!(count = names.len(), "listed hosts");
        Ok(names)
    }

    fn dates(&self, host: &str) -> Result<Vec<Timestamp>, StoreError> {
        self.ensure_host(host)?;

        let prefix = format!("{}{}", host, KEY_SEPARATOR);
        let dates = snapshot_dates(&prefix, self.snapshots.prefix(&prefix).map(|kv| kv.key()))?;

        trace!(host = host, count = dates.len(), "listed dates");
        Ok(dates)
    }

    fn get(&self, host: &str, timestamp: Timestamp) -> Result<String, StoreError> {
        self.ensure_host(host)?;

        let key = snapshot_key(host, timestamp);
        let Some(value) = self.snapshots.get(&key)? else {
            return Err(StoreError::EntryNotFound {
                host: host.to_string(),
                timestamp,
            });
        };

        format::decode(&value).map_err(|e| {
            error!(host = host, timestamp = %timestamp, error = %e, "corrupt snapshot");
            StoreError::Corrupt {
                host: host.to_string(),
                timestamp,
                reason: e.to_string(),
            }
        })
    }
}
