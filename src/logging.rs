//! Log macros for the archive and its backends.
//!
//! With the `logging` feature each macro forwards to the `tracing` macro of
//! the same level; without it they expand to nothing and their arguments are
//! never evaluated. A binding only read by a log call is therefore written
//! `_e`, so default builds stay free of unused-variable warnings.
//!
//! Levels used across the crate:
//!
//! | level | events |
//! |-------|--------|
//! | `trace` | index sizes, the snapshot chosen for a nearest-date query |
//! | `debug` | each archive query with its host and timestamps |
//! | `info`  | a store being opened or initialized |
//! | `warn`  | undecodable keys skipped in a scan, hosts dropped from the dashboard, expired deadlines |
//! | `error` | corrupt snapshots and stat failures, just before they propagate |
//!
//! ```rust,ignore
//! use crate::logging::{debug, warn};
//!
//! debug!(host = host, timestamp = %timestamp, "getting exact snapshot");
//! warn!(host = %host, error = %_e, "skipping host in summary");
//! ```

#[cfg(feature = "logging")]
macro_rules! log_trace {
    ($($arg:tt)*) => { tracing::trace!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_trace {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_warn {
    ($($arg:tt)*) => { tracing::warn!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "logging")]
macro_rules! log_error {
    ($($arg:tt)*) => { tracing::error!($($arg)*) }
}

#[cfg(not(feature = "logging"))]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}

pub(crate) use log_debug as debug;
pub(crate) use log_error as error;
pub(crate) use log_info as info;
pub(crate) use log_trace as trace;
pub(crate) use log_warn as warn;
