//! Family reads, visible to members of the family only.
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::errors::{PointsError, PointsResult};
use crate::domain::models::Family;
use crate::storage::{Connection, GuardianStorage};

#[derive(Clone)]
pub struct FamilyService<C: Connection> {
    family_repository: C::FamilyRepository,
}

impl<C: Connection> FamilyService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            family_repository: connection.create_family_repository(),
        }
    }

    pub async fn get_family(&self, requesting_user_id: &str, family_id: &str) -> PointsResult<Family> {
        if family_id.is_empty() {
            return Err(PointsError::InvalidInput(vec!["family_id is required".to_string()]));
        }
        if requesting_user_id.is_empty() {
            return Err(PointsError::Unauthenticated("missing user id".to_string()));
        }

        let members = self
            .family_repository
            .family_members(family_id)
            .await
            .context("failed to get family users")?;
        let family = Family {
            family_id: family_id.to_string(),
            members,
        };

        // An unknown family has no members, so it is denied the same way
        if !family.has_member(requesting_user_id) {
            warn!("User {} is not part of family {}", requesting_user_id, family_id);
            return Err(PointsError::AccessDenied("user is not part of family".to_string()));
        }

        info!("Read family {} with {} members", family_id, family.members.len());
        Ok(family)
    }
}
