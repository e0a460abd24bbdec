//! Recency labels for the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp::Timestamp;

/// Age limits, in hours, past which a backup is flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub warning_hours: u32,
    pub danger_hours: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning_hours: 24,
            danger_hours: 72,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FreshnessStatus {
    /// No snapshot at all.
    Default,
    Success,
    Warning,
    Danger,
}

/// Human readable age plus a status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Freshness {
    pub ago: String,
    pub status: FreshnessStatus,
}

/// Classify the age of `latest` relative to `now`.
///
/// Ages past the danger threshold are reported in days, anything younger in
/// hours. Timestamps in the future count as zero hours old.
pub fn classify(latest: Option<Timestamp>, now: DateTime<Utc>, thresholds: Thresholds) -> Freshness {
    let Some(latest) = latest else {
        return Freshness {
            ago: "No backup".to_string(),
            status: FreshnessStatus::Default,
        };
    };

    let hours = (now - latest.as_datetime()).num_hours().max(0);
    let danger = i64::from(thresholds.danger_hours);
    let warning = i64::from(thresholds.warning_hours);

    if hours > danger {
        Freshness {
            ago: format!("{} days ago", hours / 24),
            status: FreshnessStatus::Danger,
        }
    } else if hours > warning {
        Freshness {
            ago: format!("{} hours ago", hours),
            status: FreshnessStatus::Warning,
        }
    } else {
        Freshness {
            ago: format!("{} hours ago", hours),
            status: FreshnessStatus::Success,
        }
    }
}
