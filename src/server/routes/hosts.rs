//! Per-host snapshot handlers.

use axum::{
    extract::{Path, State},
    response::Response,
};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::archive::{Snapshot, parse_timestamp};
use crate::timestamp::Timestamp;

use super::super::{content::AcceptFormat, error::ApiError, state::AppState};
use super::{lines, render};

#[derive(Debug, Serialize)]
struct HostList {
    hosts: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TimestampList {
    host: String,
    timestamps: Vec<Timestamp>,
}

/// List every host.
#[instrument(skip(state, format))]
pub async fn list_hosts(
    State(state): State<AppState>,
    AcceptFormat(format): AcceptFormat,
) -> Result<Response, ApiError> {
    let hosts = state.archive().list_hosts()?;
    info!(count = hosts.len(), "listed hosts");

    render(format, &HostList { hosts }, |list| lines(&list.hosts))
}

/// List the timestamps of one host, newest first.
#[instrument(skip(state, format), fields(host = %host))]
pub async fn list_timestamps(
    State(state): State<AppState>,
    Path(host): Path<String>,
    AcceptFormat(format): AcceptFormat,
) -> Result<Response, ApiError> {
    let timestamps = state.archive().list_timestamps(&host)?;
    info!(count = timestamps.len(), "listed timestamps");

    render(format, &TimestampList { host, timestamps }, |list| {
        lines(&list.timestamps)
    })
}

/// Most recent snapshot of a host.
#[instrument(skip(state, format), fields(host = %host))]
pub async fn latest(
    State(state): State<AppState>,
    Path(host): Path<String>,
    AcceptFormat(format): AcceptFormat,
) -> Result<Response, ApiError> {
    let snapshot = state.archive().latest(&host)?;
    info!(timestamp = %snapshot.timestamp, "retrieved latest snapshot");

    render(format, &snapshot, snapshot_text)
}

/// Snapshot stored at exactly the given date.
#[instrument(skip(state, format), fields(host = %host, date = %date))]
pub async fn get_exact(
    State(state): State<AppState>,
    Path((host, date)): Path<(String, String)>,
    AcceptFormat(format): AcceptFormat,
) -> Result<Response, ApiError> {
    let timestamp = parse_timestamp(&date)?;
    let snapshot = state.archive().get_exact(&host, timestamp)?;
    info!("retrieved snapshot");

    render(format, &snapshot, snapshot_text)
}

/// Latest snapshot taken at or before the given date.
#[instrument(skip(state, format), fields(host = %host, date = %date))]
pub async fn get_nearest(
    State(state): State<AppState>,
    Path((host, date)): Path<(String, String)>,
    AcceptFormat(format): AcceptFormat,
) -> Result<Response, ApiError> {
    let timestamp = parse_timestamp(&date)?;
    let snapshot =
        state
            .archive()
            .get_nearest_at_or_before_until(&host, timestamp, state.deadline())?;
    info!(chosen = %snapshot.timestamp, "retrieved nearest snapshot");

    render(format, &snapshot, snapshot_text)
}

/// Line diff between two dated snapshots.
#[instrument(skip(state, format), fields(host = %host, from = %from, to = %to))]
pub async fn diff(
    State(state): State<AppState>,
    Path((host, from, to)): Path<(String, String, String)>,
    AcceptFormat(format): AcceptFormat,
) -> Result<Response, ApiError> {
    let from = parse_timestamp(&from)?;
    let to = parse_timestamp(&to)?;
    let result = state.archive().diff(&host, from, to)?;

    let (inserted, deleted) = result.ops.line_counts();
    debug!(ops = result.ops.ops().len(), "diff computed");
    info!(inserted, deleted, "diffed snapshots");

    render(format, &result, |d| d.ops.unified())
}

fn snapshot_text(snapshot: &Snapshot) -> String {
    snapshot.content.clone()
}
