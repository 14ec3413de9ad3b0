//! # REST API for Points
//!
//! Endpoints for requesting points, settling requests, and reading a user's
//! ledger and summary.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use tracing::info;

use super::auth::AuthContext;
use super::mappers::{PointMapper, SummaryMapper};
use crate::domain::commands::points::{
    ApprovePointRequestCommand, PointEntryResult, SubmitPointRequestCommand,
};
use crate::domain::errors::PointsError;
use crate::AppState;
use shared::{
    ApprovePointsRequest, PointResponse, PointsSummaryQuery, RequestPointsRequest,
    UserPointsResponse,
};

fn to_point_response(result: &PointEntryResult) -> PointResponse {
    PointResponse {
        point: PointMapper::to_dto(&result.point),
        point_summary: SummaryMapper::to_dto(&result.summary),
    }
}

/// Request points for the calling user
pub async fn request_points(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<RequestPointsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PointsError> {
    let Json(request) = payload?;
    info!("POST /api/points - user: {}, points: {}", auth.user_id, request.points);

    let command = SubmitPointRequestCommand {
        user_id: auth.user_id,
        points: request.points,
        reason: request.reason,
    };
    let result = state.point_request_service.submit_point_request(command).await?;

    Ok((StatusCode::CREATED, Json(to_point_response(&result))))
}

/// Approve or deny a pending request; the caller must be a parent
pub async fn approve_points(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(point_id): Path<String>,
    payload: Result<Json<ApprovePointsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PointsError> {
    let Json(request) = payload?;
    info!(
        "POST /api/points/{}/approve - parent: {}, child: {}, decision: {}",
        point_id, auth.user_id, request.user_id, request.decision
    );

    if !auth.is_parent() {
        return Err(PointsError::AccessDenied(
            "only parents may approve point requests".to_string(),
        ));
    }

    let command = ApprovePointRequestCommand {
        parent_id: auth.user_id,
        child_id: request.user_id,
        point_id,
        decision: request.decision,
        parent_notes: request.parent_notes,
    };
    let result = state.approval_service.approve_point_request(command).await?;

    Ok((StatusCode::OK, Json(to_point_response(&result))))
}

/// Summary of a user's points, for the user or one of their parents
pub async fn get_points_summary(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<String>,
    query: Result<Query<PointsSummaryQuery>, QueryRejection>,
) -> Result<impl IntoResponse, PointsError> {
    let Query(query) = query?;
    info!("GET /api/users/{}/points/summary - caller: {}, query: {:?}", user_id, auth.user_id, query);

    let as_of = query.as_of.unwrap_or_else(Utc::now);
    let summary = state
        .summary_service
        .get_points_summary_for(&auth.user_id, &user_id, as_of)
        .await?;

    Ok((StatusCode::OK, Json(SummaryMapper::to_user_summary_dto(summary))))
}

/// All of a user's points, newest first
pub async fn list_user_points(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, PointsError> {
    info!("GET /api/users/{}/points - caller: {}", user_id, auth.user_id);

    let points = state.summary_service.list_user_points(&auth.user_id, &user_id).await?;
    let response = UserPointsResponse {
        points: points.iter().map(PointMapper::to_dto).collect(),
    };

    Ok((StatusCode::OK, Json(response)))
}
