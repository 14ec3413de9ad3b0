//! Approval workflow: a parent settles a WAITING entry.
//!
//! Gates run in a fixed order and the first failure wins: shape, guardian
//! access, lookup, state consistency. Only then is the balance at the head of
//! the child's settlement chain read and the settled entry written, conditional on the entry still waiting and,
//! for approvals, on no other approval for the same child having landed since
//! the snapshot.

use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::points::{ApprovePointRequestCommand, PointEntryResult};
use crate::domain::errors::{PointsError, PointsResult};
use crate::domain::models::{PointRequestDecision, PointStatus};
use crate::domain::validation::validate_approval;
use crate::storage::{Connection, GuardianStorage, PointStorage};

#[derive(Clone)]
pub struct ApprovalService<C: Connection> {
    point_repository: C::PointRepository,
    family_repository: C::FamilyRepository,
}

impl<C: Connection> ApprovalService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            point_repository: connection.create_point_repository(),
            family_repository: connection.create_family_repository(),
        }
    }

    pub async fn approve_point_request(
        &self,
        command: ApprovePointRequestCommand,
    ) -> PointsResult<PointEntryResult> {
        info!(
            "Parent {} deciding point {} of user {}: {}",
            command.parent_id, command.point_id, command.child_id, command.decision
        );

        let decision = validate_approval(&command)?;

        // Nobody settles their own entries, parent or not
        let has_access = command.parent_id != command.child_id
            && self
                .family_repository
                .parent_has_access_to_child(&command.parent_id, &command.child_id)
                .await
                .context("failed to check user access permissions")?;
        if !has_access {
            warn!("Parent {} has no access to user {}", command.parent_id, command.child_id);
            return Err(PointsError::AccessDenied(
                "requesting user does not have permission to user's records".to_string(),
            ));
        }

        let mut entry = self
            .point_repository
            .get_point(&command.child_id, &command.point_id)
            .await
            .with_context(|| format!("failed to get point {}", command.point_id))?
            .ok_or_else(|| PointsError::NotFound(format!("point (id={})", command.point_id)))?;

        if entry.user_id != command.child_id {
            return Err(PointsError::BadRequest(format!(
                "point user id {} does not match request {}",
                entry.user_id, command.child_id
            )));
        }
        if entry.status() != PointStatus::Waiting {
            return Err(PointsError::BadRequest(format!(
                "invalid point status {}",
                entry.status().as_str()
            )));
        }

        let now = Utc::now();
        let snapshot = self
            .point_repository
            .current_balance(&command.child_id)
            .await
            .with_context(|| format!("failed to get balance of user {}", command.child_id))?;

        entry.settle(decision, &command.parent_id, command.parent_notes, snapshot.balance, now)?;

        // Denials leave the balance alone, so only approvals pin the version
        let expected_version = match decision {
            PointRequestDecision::Approve => Some(snapshot.version),
            PointRequestDecision::Deny => None,
        };
        let written = self
            .point_repository
            .settle_point(&entry, expected_version)
            .await
            .context("failed to approve point request")?;
        if !written {
            warn!("Settlement of point {} lost a concurrent update", entry.id);
            return Err(PointsError::Conflict(format!(
                "point {} or the balance of user {} changed concurrently",
                entry.id, entry.user_id
            )));
        }

        info!(
            "Point {} settled with {} by {}, balance {:?}",
            entry.id,
            decision.as_str(),
            command.parent_id,
            entry.balance()
        );
        Ok(PointEntryResult::from(entry))
    }
}
