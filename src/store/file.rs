//! Directory-tree snapshot store.
//!
//! Layout on disk:
//!
//! ```text
//! <root>/
//!   web01/
//!     2024-03-01T00:00:00Z
//!     2024-03-10T00:00:00Z
//!   core-sw1/
//!     ...
//! ```
//!
//! Each file holds one snapshot's content verbatim. Files whose names are not
//! canonical timestamps (editor backups, temporary files) are ignored.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::logging::{debug, error, info, trace, warn};
use crate::timestamp::Timestamp;

use super::error::StoreError;
use super::{SnapshotStore, validate_host};

/// A [`SnapshotStore`] reading one file per snapshot.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open an existing snapshot directory.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref();
        debug!(path = %root.display(), "opening file store");

        if !existing_dir(root)? {
            return Err(StoreError::NotInitialized(root.display().to_string()));
        }

        info!(path = %root.display(), "file store opened");
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Create the snapshot directory if needed and open it.
    pub fn init(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        fs::create_dir_all(root.as_ref())?;
        Self::open(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a snapshot file.
    ///
    /// Content goes to a hidden temporary file first and is renamed into
    /// place, so readers never observe a partially written snapshot.
    pub fn put(&self, host: &str, timestamp: Timestamp, content: &str) -> Result<(), StoreError> {
        validate_host(host)?;
        let dir = self.root.join(host);
        fs::create_dir_all(&dir)?;

        let name = timestamp.format();
        let tmp = dir.join(format!(".{name}.tmp"));
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, dir.join(&name))?;

        debug!(host = host, timestamp = %timestamp, bytes = content.len(), "snapshot written");
        Ok(())
    }

    fn host_dir(&self, host: &str) -> Result<PathBuf, StoreError> {
        validate_host(host).map_err(|_| StoreError::HostNotFound(host.to_string()))?;
        let dir = self.root.join(host);
        if existing_dir(&dir)? {
            Ok(dir)
        } else {
            Err(StoreError::HostNotFound(host.to_string()))
        }
    }
}

/// Whether `path` is a directory. Absence is `Ok(false)`; any other failure
/// to stat the path is a storage error, not a missing entry.
fn existing_dir(path: &Path) -> Result<bool, StoreError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_dir()),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Ok(false)
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "cannot stat snapshot directory");
            Err(e.into())
        }
    }
}

impl SnapshotStore for FileStore {
    fn names(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                warn!(path = %entry.path().display(), "skipping non UTF-8 host directory");
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }
        trace!(count = names.len(), "listed hosts");
        Ok(names)
    }

    fn dates(&self, host: &str) -> Result<Vec<Timestamp>, StoreError> {
        let dir = self.host_dir(host)?;
        let mut dates = Vec::new();

        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Ok(t) = Timestamp::parse(name) {
                dates.push(t);
            } else {
                trace!(host = host, file = name, "ignoring non-snapshot file");
            }
        }

        trace!(host = host, count = dates.len(), "listed dates");
        Ok(dates)
    }

    fn get(&self, host: &str, timestamp: Timestamp) -> Result<String, StoreError> {
        let path = self.host_dir(host)?.join(timestamp.format());

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::EntryNotFound {
                    host: host.to_string(),
                    timestamp,
                });
            }
            Err(e) => return Err(e.into()),
        };

        String::from_utf8(bytes).map_err(|e| StoreError::Corrupt {
            host: host.to_string(),
            timestamp,
            reason: e.to_string(),
        })
    }
}
