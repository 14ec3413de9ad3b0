use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::Row;
use tracing::debug;

use super::connection::DbConnection;
use crate::storage::traits::{FamilyMember, FamilyRole, GuardianStorage};

/// SQLite-backed family membership lookups
#[derive(Clone)]
pub struct FamilyRepository {
    db: DbConnection,
}

impl FamilyRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GuardianStorage for FamilyRepository {
    async fn parent_has_access_to_child(&self, parent_id: &str, child_id: &str) -> Result<bool> {
        if parent_id.is_empty() || child_id.is_empty() {
            return Err(anyhow!("parent id and child id are required"));
        }

        let row = sqlx::query(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM family_members parent
                JOIN family_members child ON child.family_id = parent.family_id
                WHERE parent.user_id = ?1
                  AND parent.role = 'PARENT'
                  AND child.user_id = ?2
                  AND child.role = 'CHILD'
            ) AS has_access
            "#,
        )
        .bind(parent_id)
        .bind(child_id)
        .fetch_one(self.db.pool())
        .await?;

        let has_access = row.try_get::<i64, _>("has_access")? != 0;
        debug!("Guardian lookup parent={} child={} -> {}", parent_id, child_id, has_access);
        Ok(has_access)
    }

    async fn family_members(&self, family_id: &str) -> Result<Vec<FamilyMember>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, role
            FROM family_members
            WHERE family_id = ?1
            ORDER BY CASE role WHEN 'PARENT' THEN 0 ELSE 1 END, user_id
            "#,
        )
        .bind(family_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| {
                Ok(FamilyMember {
                    user_id: row.try_get("user_id")?,
                    role: FamilyRole::from_string(&row.try_get::<String, _>("role")?).map_err(anyhow::Error::msg)?,
                })
            })
            .collect()
    }

    async fn add_family_member(&self, family_id: &str, user_id: &str, role: FamilyRole) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO family_members (family_id, user_id, role)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(family_id, user_id) DO UPDATE SET role = excluded.role
            "#,
        )
        .bind(family_id)
        .bind(user_id)
        .bind(role.as_str())
        .execute(self.db.pool())
        .await?;

        Ok(())
    }
}
