//! Read-side projections of ledger entries.

use chrono::{DateTime, Utc};

use super::point::{PointEntry, PointRequestDecision, PointRequestType, PointStatus};

/// Flattened view of a single entry, used in lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointSummary {
    pub id: String,
    pub user_id: String,
    pub points: i32,
    pub reason: String,
    pub request_type: PointRequestType,
    pub status: PointStatus,
    pub parent_notes: Option<String>,
    pub decided_by_user_id: Option<String>,
    pub decision: Option<PointRequestDecision>,
    pub updated_on: DateTime<Utc>,
}

impl From<&PointEntry> for PointSummary {
    fn from(entry: &PointEntry) -> Self {
        let settlement = entry.settlement();
        Self {
            id: entry.id.clone(),
            user_id: entry.user_id.clone(),
            points: entry.points,
            reason: entry.reason.clone(),
            request_type: entry.request_type,
            status: entry.status(),
            parent_notes: settlement.and_then(|s| s.parent_notes.clone()),
            decided_by_user_id: settlement.map(|s| s.decided_by_user_id.clone()),
            decision: entry.decision(),
            updated_on: entry.updated_on,
        }
    }
}

/// Rollup of a user's balance and recent activity
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPointsSummary {
    pub balance: i32,
    pub points_last_7_days: i32,
    pub points_lost_last_7_days: i32,
    pub recent_points: Vec<PointSummary>,
    pub recent_requests: Vec<PointSummary>,
    pub recent_cashouts: Vec<PointSummary>,
}
