//! Dashboard: every host with the age of its last snapshot.

use axum::{extract::State, response::Response};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument};

use crate::freshness::{self, FreshnessStatus};
use crate::timestamp::Timestamp;

use super::super::{content::AcceptFormat, error::ApiError, state::AppState};
use super::render;

#[derive(Debug, Serialize)]
struct DashboardEntry {
    host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest: Option<Timestamp>,
    ago: String,
    status: FreshnessStatus,
}

#[instrument(skip(state, format))]
pub async fn dashboard(
    State(state): State<AppState>,
    AcceptFormat(format): AcceptFormat,
) -> Result<Response, ApiError> {
    let now = Utc::now();
    let thresholds = state.thresholds();

    let entries: Vec<DashboardEntry> = state
        .archive()
        .summaries()?
        .into_iter()
        .map(|summary| {
            let freshness = freshness::classify(summary.latest, now, thresholds);
            DashboardEntry {
                host: summary.host,
                latest: summary.latest,
                ago: freshness.ago,
                status: freshness.status,
            }
        })
        .collect();

    let stale = entries
        .iter()
        .filter(|e| matches!(e.status, FreshnessStatus::Danger | FreshnessStatus::Default))
        .count();
    info!(hosts = entries.len(), stale, "rendered dashboard");

    render(format, &entries, |entries| table(entries))
}

fn table(entries: &[DashboardEntry]) -> String {
    let width = entries
        .iter()
        .map(|e| e.host.len())
        .max()
        .unwrap_or(0)
        .max("HOST".len());

    let mut out = format!("{:<width$}  {:<20}  {:<8}  {}\n", "HOST", "LAST BACKUP", "STATUS", "AGE");
    for entry in entries {
        let latest = entry
            .latest
            .map(|t| t.format())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<width$}  {:<20}  {:<8}  {}\n",
            entry.host,
            latest,
            status_label(entry.status),
            entry.ago
        ));
    }
    out
}

fn status_label(status: FreshnessStatus) -> &'static str {
    match status {
        FreshnessStatus::Default => "default",
        FreshnessStatus::Success => "success",
        FreshnessStatus::Warning => "warning",
        FreshnessStatus::Danger => "danger",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_aligns_columns() -> Result<(), crate::MalformedTimestamp> {
        let entries = [
            DashboardEntry {
                host: "core-switch-01".into(),
                latest: Some("2024-03-10T00:00:00Z".parse()?),
                ago: "3 hours ago".into(),
                status: FreshnessStatus::Success,
            },
            DashboardEntry {
                host: "db01".into(),
                latest: None,
                ago: "No backup".into(),
                status: FreshnessStatus::Default,
            },
        ];

        let text = table(&entries);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.get(1).copied(),
            Some("core-switch-01  2024-03-10T00:00:00Z  success   3 hours ago")
        );
        assert_eq!(
            rows.get(2).copied(),
            Some("db01            -                     default   No backup")
        );
        Ok(())
    }
}
