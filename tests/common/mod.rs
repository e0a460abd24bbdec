//! Common test utilities and fixtures.
//!
//! Every [`TestApp`] serves the same snapshot history from a fresh temporary
//! directory:
//!
//! | host    | snapshots                                     |
//! |---------|-----------------------------------------------|
//! | `web01` | [`WEB01_OLD`] and [`WEB01_NEW`], months ago   |
//! | `db01`  | one snapshot taken two hours before the test  |
//! | `empty` | none                                          |

#![cfg(feature = "server")]
#![allow(dead_code)]

use std::path::Path;

use axum::http::{HeaderValue, header};
use axum_test::{TestRequest, TestServer};
use chrono::{Duration, Utc};
use conftrail::Timestamp;
use conftrail::server::{AppState, Config, router};
use conftrail::store::{FileStore, FjallStore};
use tempfile::TempDir;

// =============================================================================
// Snapshot Fixtures
// =============================================================================

pub const WEB01_OLD_DATE: &str = "2024-03-01T00:00:00Z";
pub const WEB01_NEW_DATE: &str = "2024-03-10T00:00:00Z";

pub const WEB01_OLD: &str = "hostname web01\nntp server 10.0.0.1\nlogging on\n";
pub const WEB01_NEW: &str = "hostname web01\nntp server 10.0.0.2\nlogging on\n";

pub const DB01: &str = "hostname db01\n";

/// Storage backend a [`TestApp`] is configured with.
#[derive(Debug, Clone, Copy)]
pub enum Backend {
    Files,
    Fjall,
}

// =============================================================================
// Test Application
// =============================================================================

/// Test application wrapper that manages a temporary snapshot store.
pub struct TestApp {
    pub server: TestServer,
    /// Instant of the single `db01` snapshot.
    pub db01_date: Timestamp,
    _temp_dir: TempDir, // Keep alive for test duration
}

impl TestApp {
    /// Serve the fixture history from a snapshot directory.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_backend(Backend::Files)
    }

    /// Serve the fixture history from the given backend, going through
    /// [`AppState::from_config`] like the server binary does.
    pub fn with_backend(backend: Backend) -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let store_path = temp_dir.path().join("snapshots");
        let db01_date = two_hours_ago();

        let backend_name = match backend {
            Backend::Files => {
                seed_files(&store_path, db01_date)?;
                "files"
            }
            Backend::Fjall => {
                seed_fjall(&store_path, db01_date)?;
                "fjall"
            }
        };

        let config = Config::from_str(&format!(
            r#"
[server]
bind = "127.0.0.1"
port = 0

[storage]
backend = "{}"
path = '{}'
"#,
            backend_name,
            store_path.display()
        ))?;
        let state = AppState::from_config(&config)?;

        Ok(Self {
            server: TestServer::new(router(state))?,
            db01_date,
            _temp_dir: temp_dir,
        })
    }

    /// Serve an arbitrary state, for tests that tune timeouts or thresholds.
    pub fn from_state(state: AppState) -> anyhow::Result<Self> {
        Ok(Self {
            server: TestServer::new(router(state))?,
            db01_date: two_hours_ago(),
            _temp_dir: TempDir::new()?,
        })
    }

    /// GET `path` asking for JSON.
    pub fn get_json(&self, path: &str) -> TestRequest {
        self.server
            .get(path)
            .add_header(header::ACCEPT, HeaderValue::from_static("application/json"))
    }

    /// GET `path` asking for plain text.
    pub fn get_text(&self, path: &str) -> TestRequest {
        self.server
            .get(path)
            .add_header(header::ACCEPT, HeaderValue::from_static("text/plain"))
    }
}

fn two_hours_ago() -> Timestamp {
    Timestamp::from_datetime(Utc::now() - Duration::hours(2))
}

fn fixture_snapshots(db01_date: Timestamp) -> anyhow::Result<Vec<(&'static str, Timestamp, &'static str)>> {
    Ok(vec![
        ("web01", WEB01_NEW_DATE.parse()?, WEB01_NEW),
        ("web01", WEB01_OLD_DATE.parse()?, WEB01_OLD),
        ("db01", db01_date, DB01),
    ])
}

/// Write the fixture history as a snapshot directory.
pub fn seed_files(root: &Path, db01_date: Timestamp) -> anyhow::Result<FileStore> {
    let store = FileStore::init(root)?;
    for (host, timestamp, content) in fixture_snapshots(db01_date)? {
        store.put(host, timestamp, content)?;
    }
    std::fs::create_dir(root.join("empty"))?;
    Ok(store)
}

/// Write the fixture history into a fjall database. The handle is dropped
/// before returning so the server can reopen the path.
pub fn seed_fjall(path: &Path, db01_date: Timestamp) -> anyhow::Result<()> {
    let store = FjallStore::init(path)?;
    for (host, timestamp, content) in fixture_snapshots(db01_date)? {
        store.put(host, timestamp, content)?;
    }
    store.add_host("empty")?;
    Ok(())
}

// =============================================================================
// Assertion Helpers
// =============================================================================

/// Assert that an error body carries the expected code.
pub fn assert_error_code(body: &serde_json::Value, code: &str) {
    assert_eq!(
        body["error"]["code"].as_str(),
        Some(code),
        "unexpected error body: {}",
        body
    );
    assert!(
        body["error"]["message"].as_str().is_some_and(|m| !m.is_empty()),
        "error body without message: {}",
        body
    );
}
