//! Shape checks for incoming requests.
//!
//! These functions are pure: they never touch storage. Field errors are
//! collected rather than short-circuited so a caller sees every problem at
//! once in a single `InvalidInput`.

use crate::domain::commands::points::ApprovePointRequestCommand;
use crate::domain::errors::{PointsError, PointsResult};
use crate::domain::models::PointRequestDecision;

pub const MIN_REASON_LENGTH: usize = 5;
pub const MAX_PARENT_NOTES_LENGTH: usize = 500;

/// Validate a child's request for points.
pub fn validate_point_request(user_id: &str, points: i32, reason: &str) -> PointsResult<()> {
    if user_id.is_empty() {
        return Err(PointsError::Unauthenticated("missing user id".to_string()));
    }

    let mut errors = Vec::new();

    if points <= 0 {
        errors.push("points must be a positive integer".to_string());
    }

    if reason.trim().chars().count() <= MIN_REASON_LENGTH {
        errors.push("reason for requesting points must not be empty".to_string());
    }

    into_result(errors)
}

/// Validate a parent's decision on a request, returning the parsed decision.
pub fn validate_approval(command: &ApprovePointRequestCommand) -> PointsResult<PointRequestDecision> {
    let mut errors = Vec::new();

    if command.parent_id.is_empty() {
        errors.push("missing parent id".to_string());
    }
    if command.child_id.is_empty() {
        errors.push("missing child id".to_string());
    }
    if command.point_id.is_empty() {
        errors.push("missing point id".to_string());
    }

    let decision = PointRequestDecision::from_string(&command.decision)
        .map_err(|e| errors.push(e))
        .ok();

    let notes_length = command
        .parent_notes
        .as_deref()
        .map(|notes| notes.chars().count())
        .unwrap_or(0);
    if notes_length > MAX_PARENT_NOTES_LENGTH {
        errors.push(format!(
            "parent notes should be no longer than {} characters",
            MAX_PARENT_NOTES_LENGTH
        ));
    }

    into_result(errors)?;
    decision.ok_or_else(|| PointsError::InvalidInput(vec![format!("invalid decision {}", command.decision)]))
}

fn into_result(errors: Vec<String>) -> PointsResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(PointsError::InvalidInput(errors))
    }
}
