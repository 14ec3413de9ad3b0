//! Request workflow: a child asks for points and a WAITING entry is appended.
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::points::{PointEntryResult, SubmitPointRequestCommand};
use crate::domain::errors::PointsResult;
use crate::domain::models::PointEntry;
use crate::domain::validation::validate_point_request;
use crate::storage::{Connection, PointStorage};

#[derive(Clone)]
pub struct PointRequestService<C: Connection> {
    point_repository: C::PointRepository,
}

impl<C: Connection> PointRequestService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        let point_repository = connection.create_point_repository();
        Self { point_repository }
    }

    /// Create a pending ADD entry for the caller.
    ///
    /// Not idempotent: identical commands produce distinct entries.
    pub async fn submit_point_request(
        &self,
        command: SubmitPointRequestCommand,
    ) -> PointsResult<PointEntryResult> {
        info!("Submitting point request for user {}: {} points", command.user_id, command.points);

        if let Err(e) = validate_point_request(&command.user_id, command.points, &command.reason) {
            warn!("Rejected point request from user {}: {}", command.user_id, e);
            return Err(e);
        }

        let entry = PointEntry::new_request(&command.user_id, command.points, command.reason.trim(), Utc::now());

        self.point_repository
            .save_point(&entry)
            .await
            .context("failed to save point")?;

        info!("Created point request {} for user {}", entry.id, entry.user_id);
        Ok(PointEntryResult::from(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::PointsError;
    use crate::domain::models::{PointRequestType, PointStatus};
    use crate::storage::test_utils::{FaultyConnection, Faults};
    use crate::storage::{DbConnection, PointQuery};

    async fn setup_test() -> (PointRequestService<DbConnection>, DbConnection) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        (PointRequestService::new(Arc::new(db.clone())), db)
    }

    fn command(user_id: &str, points: i32, reason: &str) -> SubmitPointRequestCommand {
        SubmitPointRequestCommand {
            user_id: user_id.to_string(),
            points,
            reason: reason.to_string(),
        }
    }

    #[tokio::test]
    async fn test_submit_creates_waiting_add_entry() {
        let (service, db) = setup_test().await;

        let result = service
            .submit_point_request(command("u1", 5, "cleaned my room"))
            .await
            .unwrap();

        let point = &result.point;
        assert_eq!(point.user_id, "u1");
        assert_eq!(point.points, 5);
        assert_eq!(point.status(), PointStatus::Waiting);
        assert_eq!(point.request_type, PointRequestType::Add);
        assert_eq!(point.reason, "cleaned my room");
        assert_eq!(point.balance(), None);
        assert_eq!(point.decision(), None);
        assert_eq!(point.created_on, point.updated_on);
        assert!(!point.id.is_empty());

        assert_eq!(result.summary.id, point.id);
        assert_eq!(result.summary.status, PointStatus::Waiting);

        let stored = db.create_point_repository().get_point("u1", &point.id).await.unwrap();
        assert_eq!(stored.as_ref(), Some(point));
    }

    #[tokio::test]
    async fn test_reason_is_trimmed() {
        let (service, _db) = setup_test().await;
        let result = service
            .submit_point_request(command("u1", 5, "   cleaned my room  "))
            .await
            .unwrap();
        assert_eq!(result.point.reason, "cleaned my room");
    }

    #[tokio::test]
    async fn test_identical_requests_create_distinct_entries() {
        let (service, db) = setup_test().await;

        let first = service.submit_point_request(command("u1", 5, "cleaned my room")).await.unwrap();
        let second = service.submit_point_request(command("u1", 5, "cleaned my room")).await.unwrap();
        assert_ne!(first.point.id, second.point.id);

        let all = db.create_point_repository().query_points("u1", &PointQuery::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_request_writes_nothing() {
        let connection = FaultyConnection::init_test().await.unwrap();
        let faults = connection.faults.clone();
        let service = PointRequestService::new(Arc::new(connection));

        let err = service.submit_point_request(command("u1", -5, "hi")).await.unwrap_err();
        assert_eq!(
            err.field_errors(),
            [
                "points must be a positive integer".to_string(),
                "reason for requesting points must not be empty".to_string(),
            ]
        );
        assert_eq!(faults.writes(), 0);

        let err = service.submit_point_request(command("", 5, "cleaned my room")).await.unwrap_err();
        assert!(matches!(err, PointsError::Unauthenticated(_)));
        assert_eq!(faults.writes(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_is_internal() {
        let connection = FaultyConnection::init_test().await.unwrap();
        Faults::set(&connection.faults.fail_save);
        let service = PointRequestService::new(Arc::new(connection));

        let err = service
            .submit_point_request(command("u1", 5, "cleaned my room"))
            .await
            .unwrap_err();
        assert!(matches!(err, PointsError::Internal(_)));
        assert!(err.to_string().starts_with("failed to save point"));
    }
}
