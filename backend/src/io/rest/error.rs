//! Rendering of [`PointsError`] as an HTTP response.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::{error, warn};

use crate::domain::errors::PointsError;

impl PointsError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PointsError::InvalidInput(_) | PointsError::BadRequest(_) => StatusCode::BAD_REQUEST,
            PointsError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            PointsError::AccessDenied(_) => StatusCode::FORBIDDEN,
            PointsError::NotFound(_) => StatusCode::NOT_FOUND,
            PointsError::Conflict(_) => StatusCode::CONFLICT,
            PointsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for PointsError {
    fn from(rejection: JsonRejection) -> Self {
        PointsError::InvalidInput(vec![rejection.body_text()])
    }
}

impl From<QueryRejection> for PointsError {
    fn from(rejection: QueryRejection) -> Self {
        PointsError::InvalidInput(vec![rejection.body_text()])
    }
}

impl IntoResponse for PointsError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal details stay in the log
        let message = match &self {
            PointsError::Internal(e) => {
                error!("Internal error: {:#}", e);
                "internal server error".to_string()
            }
            other => {
                warn!("Request failed with {}: {}", other.code(), other);
                other.to_string()
            }
        };

        let body = ErrorResponse {
            error: message,
            errors: self.field_errors().to_vec(),
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (PointsError::InvalidInput(vec![]), StatusCode::BAD_REQUEST),
            (PointsError::Unauthenticated("x".into()), StatusCode::UNAUTHORIZED),
            (PointsError::AccessDenied("x".into()), StatusCode::FORBIDDEN),
            (PointsError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (PointsError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (PointsError::Conflict("x".into()), StatusCode::CONFLICT),
            (PointsError::Internal(anyhow!("x")), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status, "{}", err.code());
        }
    }

    #[tokio::test]
    async fn test_invalid_input_lists_field_errors() {
        let response = PointsError::InvalidInput(vec![
            "points must be a positive integer".to_string(),
            "reason for requesting points must not be empty".to_string(),
        ])
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_of(response).await;
        assert_eq!(body.code, "INVALID_INPUT");
        assert_eq!(body.errors.len(), 2);
        assert!(body.error.contains("points must be a positive integer"));
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let response = PointsError::Internal(anyhow!("disk on fire").context("failed to save point")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body.error, "internal server error");
        assert_eq!(body.code, "INTERNAL");
        assert!(body.errors.is_empty());
    }
}
