//! Read side of the ledger: the windowed summary and the points listing.
use anyhow::Context;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::errors::{PointsError, PointsResult};
use crate::domain::models::{PointEntry, PointRequestType, PointStatus, UserPointsSummary};
use crate::domain::summary::{aggregate_points_summary, SummaryWindow};
use crate::storage::{Connection, GuardianStorage, PointQuery, PointStorage};

#[derive(Clone)]
pub struct SummaryService<C: Connection> {
    point_repository: C::PointRepository,
    family_repository: C::FamilyRepository,
}

impl<C: Connection> SummaryService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            point_repository: connection.create_point_repository(),
            family_repository: connection.create_family_repository(),
        }
    }

    /// Summary of `user_id`'s ledger as of `as_of`. No access check.
    pub async fn get_points_summary(&self, user_id: &str, as_of: DateTime<Utc>) -> PointsResult<UserPointsSummary> {
        if user_id.is_empty() {
            return Err(PointsError::AccessDenied("missing user id".to_string()));
        }

        let window = SummaryWindow::ending_at(as_of);
        info!("Computing points summary for user {} as of {}", user_id, as_of);

        let requests = self
            .fetch(user_id, vec![PointStatus::Waiting], vec![], &window)
            .await?;
        let settled = self
            .fetch(
                user_id,
                vec![PointStatus::Settled],
                vec![PointRequestType::Add, PointRequestType::Subtract],
                &window,
            )
            .await?;
        let cashouts = self
            .fetch(user_id, vec![PointStatus::Settled], vec![PointRequestType::Cashout], &window)
            .await?;

        let snapshot = self
            .point_repository
            .latest_balance(user_id, as_of)
            .await
            .context("failed to get points")?;

        Ok(aggregate_points_summary(&window, snapshot.balance, requests, settled, cashouts))
    }

    /// Summary on behalf of `requesting_user_id`, who must be the user or one of their parents
    pub async fn get_points_summary_for(
        &self,
        requesting_user_id: &str,
        user_id: &str,
        as_of: DateTime<Utc>,
    ) -> PointsResult<UserPointsSummary> {
        self.ensure_access(requesting_user_id, user_id).await?;
        self.get_points_summary(user_id, as_of).await
    }

    /// All of a user's points, newest first
    pub async fn list_user_points(&self, requesting_user_id: &str, user_id: &str) -> PointsResult<Vec<PointEntry>> {
        self.ensure_access(requesting_user_id, user_id).await?;

        let points = self
            .point_repository
            .query_points(user_id, &PointQuery::default())
            .await
            .context("failed to get points")?;
        info!("Listed {} points for user {}", points.len(), user_id);
        Ok(points)
    }

    async fn ensure_access(&self, requesting_user_id: &str, user_id: &str) -> PointsResult<()> {
        if user_id.is_empty() {
            return Err(PointsError::AccessDenied("missing user id".to_string()));
        }
        if requesting_user_id.is_empty() {
            return Err(PointsError::Unauthenticated("missing user id".to_string()));
        }

        let has_access = self
            .family_repository
            .user_has_access(requesting_user_id, user_id)
            .await
            .context("failed to check user access permissions")?;
        if !has_access {
            warn!("User {} has no access to records of {}", requesting_user_id, user_id);
            return Err(PointsError::AccessDenied(
                "requesting user does not have permission to user's records".to_string(),
            ));
        }
        Ok(())
    }

    async fn fetch(
        &self,
        user_id: &str,
        statuses: Vec<PointStatus>,
        types: Vec<PointRequestType>,
        window: &SummaryWindow,
    ) -> PointsResult<Vec<PointEntry>> {
        let query = PointQuery {
            statuses,
            types,
            updated_on: window.month,
            limit: None,
        };
        Ok(self
            .point_repository
            .query_points(user_id, &query)
            .await
            .context("failed to get points")?)
    }
}
