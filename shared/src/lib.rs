use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PointStatus {
    /// Requested by the child, not yet decided
    Waiting,
    /// Decided by a parent; terminal
    Settled,
}

/// What kind of balance movement a request represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PointRequestType {
    Add,
    Subtract,
    Cashout,
}

/// A parent's decision on a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PointRequestDecision {
    Approve,
    Deny,
}

/// The request part of a ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRequest {
    #[serde(rename = "type")]
    pub request_type: PointRequestType,
    pub reason: String,
    pub decision: Option<PointRequestDecision>,
    pub decided_by_user_id: Option<String>,
    pub decided_on: Option<DateTime<Utc>>,
    pub parent_notes: Option<String>,
}

/// One ledger record as it travels over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    /// The child whose balance this entry affects
    pub user_id: String,
    pub status: PointStatus,
    /// Magnitude of the entry; subtract-style types lower the balance by this amount
    pub points: i32,
    /// Running balance as of this entry, only set on approved settlements
    pub balance: Option<i32>,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub request: PointRequest,
}

/// Flattened projection of a ledger entry used in lists and responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSummary {
    pub id: String,
    pub user_id: String,
    pub points: i32,
    pub reason: String,
    #[serde(rename = "type")]
    pub request_type: PointRequestType,
    pub status: PointStatus,
    pub parent_notes: Option<String>,
    pub decided_by_user_id: Option<String>,
    pub decision: Option<PointRequestDecision>,
    pub updated_on: DateTime<Utc>,
}

/// Rollup of a user's recent points activity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserPointsSummary {
    pub balance: i32,
    pub points_last_7_days: i32,
    /// Sum of negative movements in the last 7 days (never positive)
    pub points_lost_last_7_days: i32,
    pub recent_points: Vec<PointSummary>,
    pub recent_requests: Vec<PointSummary>,
    pub recent_cashouts: Vec<PointSummary>,
}

/// Body of `POST /api/points`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestPointsRequest {
    pub points: i32,
    pub reason: String,
}

/// Body of `POST /api/points/:point_id/approve`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovePointsRequest {
    /// The child that owns the point entry
    pub user_id: String,
    /// Kept as a plain string so unknown decisions surface as validation errors
    pub decision: String,
    #[serde(default)]
    pub parent_notes: Option<String>,
}

/// Response for both submitting and settling a request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointResponse {
    pub point: Point,
    pub point_summary: PointSummary,
}

/// Response of `GET /api/users/:user_id/points`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPointsResponse {
    pub points: Vec<Point>,
}

/// Query parameters of `GET /api/users/:user_id/points/summary`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointsSummaryQuery {
    /// End of the summary window (RFC 3339); defaults to now
    pub as_of: Option<DateTime<Utc>>,
}

/// Role of a member within a family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FamilyRole {
    Parent,
    Child,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub user_id: String,
    pub role: FamilyRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub family_id: String,
    /// Parents first
    pub members: Vec<FamilyMember>,
}

/// Response of `GET /api/families/:family_id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyResponse {
    pub family: Family,
}

/// Error body returned by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    pub code: String,
}
