//! # REST API for Families

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use super::auth::AuthContext;
use super::mappers::FamilyMapper;
use crate::domain::errors::PointsError;
use crate::AppState;
use shared::FamilyResponse;

/// Members of a family, for members of that family
pub async fn get_family(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(family_id): Path<String>,
) -> Result<impl IntoResponse, PointsError> {
    info!("GET /api/families/{} - caller: {}", family_id, auth.user_id);

    let family = state.family_service.get_family(&auth.user_id, &family_id).await?;
    let response = FamilyResponse {
        family: FamilyMapper::to_dto(&family),
    };

    Ok((StatusCode::OK, Json(response)))
}
