//! Application state management.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::archive::Archive;
use crate::freshness::Thresholds;
use crate::store::{FileStore, FjallStore, SnapshotStore, StoreError};

use super::config::{Config, StorageBackend};

/// Store handle shared by every request.
pub type DynStore = Box<dyn SnapshotStore + Send + Sync>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    archive: Arc<Archive<DynStore>>,
    thresholds: Thresholds,
    query_timeout: Option<Duration>,
}

impl AppState {
    /// Wrap an already opened store.
    pub fn new(store: impl SnapshotStore + Send + Sync + 'static) -> Self {
        Self {
            archive: Arc::new(Archive::new(Box::new(store))),
            thresholds: Thresholds::default(),
            query_timeout: None,
        }
    }

    /// Open the configured backend.
    pub fn from_config(config: &Config) -> Result<Self, StateError> {
        let store = Self::open_store(config.storage.backend, &config.storage.path)?;
        Ok(Self {
            archive: Arc::new(Archive::new(store)),
            thresholds: config.freshness,
            query_timeout: config.server.query_timeout(),
        })
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    pub fn archive(&self) -> &Archive<DynStore> {
        &self.archive
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Deadline for a query starting now, if a timeout is configured.
    pub fn deadline(&self) -> Option<Instant> {
        self.query_timeout
            .and_then(|timeout| Instant::now().checked_add(timeout))
    }

    fn open_store(backend: StorageBackend, path: &str) -> Result<DynStore, StateError> {
        let opened = match backend {
            StorageBackend::Files => FileStore::open(Path::new(path)).map(|s| Box::new(s) as DynStore),
            StorageBackend::Fjall => {
                FjallStore::open_or_init(Path::new(path)).map(|s| Box::new(s) as DynStore)
            }
        };

        opened.map_err(|source| StateError::OpenStore {
            backend,
            path: path.to_string(),
            source,
        })
    }
}

/// Errors that can occur when setting up application state.
#[derive(Debug)]
pub enum StateError {
    /// Failed to open the snapshot store.
    OpenStore {
        backend: StorageBackend,
        path: String,
        source: StoreError,
    },
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::OpenStore {
                backend,
                path,
                source,
            } => {
                write!(
                    f,
                    "Failed to open {:?} store at '{}': {}",
                    backend, path, source
                )
            }
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::OpenStore { source, .. } => Some(source),
        }
    }
}
