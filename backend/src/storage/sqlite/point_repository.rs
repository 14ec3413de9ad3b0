use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use super::connection::DbConnection;
use crate::domain::models::{
    EntryState, PointEntry, PointRequestDecision, PointRequestType, PointStatus, Settlement,
    SettlementOutcome,
};
use crate::storage::traits::{BalanceSnapshot, PointQuery, PointStorage};

const POINT_COLUMNS: &str = "id, user_id, status, points, balance, request_type, reason, decision, \
                             decided_by_user_id, decided_on, parent_notes, created_on, updated_on";

/// SQLite-backed ledger repository
#[derive(Clone)]
pub struct PointRepository {
    db: DbConnection,
}

impl PointRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Fixed-width UTC form so that text order equals time order
    pub fn format_timestamp(instant: DateTime<Utc>) -> String {
        instant.to_rfc3339_opts(SecondsFormat::Nanos, true)
    }

    fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
        Ok(DateTime::parse_from_rfc3339(value)
            .with_context(|| format!("invalid stored timestamp {}", value))?
            .with_timezone(&Utc))
    }

    fn point_from_row(row: &SqliteRow) -> Result<PointEntry> {
        let id: String = row.try_get("id")?;
        let status = PointStatus::from_string(&row.try_get::<String, _>("status")?).map_err(anyhow::Error::msg)?;
        let request_type =
            PointRequestType::from_string(&row.try_get::<String, _>("request_type")?).map_err(anyhow::Error::msg)?;
        let updated_on = Self::parse_timestamp(&row.try_get::<String, _>("updated_on")?)?;

        let state = match status {
            PointStatus::Waiting => EntryState::Waiting,
            PointStatus::Settled => {
                let decision: String = row
                    .try_get::<Option<String>, _>("decision")?
                    .ok_or_else(|| anyhow!("settled point {} has no decision", id))?;
                let outcome = match PointRequestDecision::from_string(&decision).map_err(anyhow::Error::msg)? {
                    PointRequestDecision::Approve => SettlementOutcome::Approved {
                        balance: row
                            .try_get::<Option<i32>, _>("balance")?
                            .ok_or_else(|| anyhow!("approved point {} has no balance", id))?,
                    },
                    PointRequestDecision::Deny => SettlementOutcome::Denied,
                };
                let decided_on = match row.try_get::<Option<String>, _>("decided_on")? {
                    Some(value) => Self::parse_timestamp(&value)?,
                    None => updated_on,
                };

                EntryState::Settled(Settlement {
                    decided_by_user_id: row.try_get::<Option<String>, _>("decided_by_user_id")?.unwrap_or_default(),
                    decided_on,
                    parent_notes: row.try_get("parent_notes")?,
                    outcome,
                })
            }
        };

        Ok(PointEntry::from_parts(
            id,
            row.try_get("user_id")?,
            row.try_get("points")?,
            request_type,
            row.try_get("reason")?,
            Self::parse_timestamp(&row.try_get::<String, _>("created_on")?)?,
            updated_on,
            state,
        ))
    }

    fn settlement_columns(point: &PointEntry) -> (Option<&'static str>, Option<String>, Option<String>, Option<String>) {
        match point.settlement() {
            Some(settlement) => (
                Some(settlement.outcome.decision().as_str()),
                Some(settlement.decided_by_user_id.clone()),
                Some(Self::format_timestamp(settlement.decided_on)),
                settlement.parent_notes.clone(),
            ),
            None => (None, None, None, None),
        }
    }
}

#[async_trait]
impl PointStorage for PointRepository {
    async fn get_point(&self, user_id: &str, point_id: &str) -> Result<Option<PointEntry>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM points WHERE user_id = ?1 AND id = ?2",
            POINT_COLUMNS
        ))
        .bind(user_id)
        .bind(point_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::point_from_row).transpose()
    }

    async fn save_point(&self, point: &PointEntry) -> Result<()> {
        let (decision, decided_by, decided_on, parent_notes) = Self::settlement_columns(point);

        // Approved entries written here take the next balance version
        sqlx::query(
            r#"
            INSERT INTO points (
                id, user_id, status, points, balance, balance_seq, request_type, reason,
                decision, decided_by_user_id, decided_on, parent_notes, created_on, updated_on
            )
            VALUES (
                ?1, ?2, ?3, ?4, ?5,
                CASE WHEN ?5 IS NULL THEN NULL
                     ELSE (SELECT COALESCE(MAX(balance_seq), 0) + 1 FROM points WHERE user_id = ?2) END,
                ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13
            )
            ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                status = excluded.status,
                points = excluded.points,
                balance = excluded.balance,
                balance_seq = CASE WHEN excluded.balance IS NULL THEN NULL
                                   ELSE COALESCE(points.balance_seq, excluded.balance_seq) END,
                request_type = excluded.request_type,
                reason = excluded.reason,
                decision = excluded.decision,
                decided_by_user_id = excluded.decided_by_user_id,
                decided_on = excluded.decided_on,
                parent_notes = excluded.parent_notes,
                created_on = excluded.created_on,
                updated_on = excluded.updated_on
            "#,
        )
        .bind(&point.id)
        .bind(&point.user_id)
        .bind(point.status().as_str())
        .bind(point.points)
        .bind(point.balance())
        .bind(point.request_type.as_str())
        .bind(&point.reason)
        .bind(decision)
        .bind(decided_by)
        .bind(decided_on)
        .bind(parent_notes)
        .bind(Self::format_timestamp(point.created_on))
        .bind(Self::format_timestamp(point.updated_on))
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    async fn settle_point(&self, point: &PointEntry, expected_version: Option<i64>) -> Result<bool> {
        if point.status() != PointStatus::Settled {
            return Err(anyhow!("point {} is not settled", point.id));
        }
        let (decision, decided_by, decided_on, parent_notes) = Self::settlement_columns(point);

        let result = sqlx::query(
            r#"
            UPDATE points SET
                status = ?3,
                balance = ?4,
                balance_seq = CASE WHEN ?4 IS NULL THEN NULL
                                   ELSE (SELECT COALESCE(MAX(balance_seq), 0) + 1 FROM points WHERE user_id = ?2) END,
                decision = ?5,
                decided_by_user_id = ?6,
                decided_on = ?7,
                parent_notes = ?8,
                updated_on = ?9
            WHERE id = ?1
              AND user_id = ?2
              AND status = 'WAITING'
              AND (?10 IS NULL
                   OR (SELECT COALESCE(MAX(balance_seq), 0) FROM points WHERE user_id = ?2) = ?10)
            "#,
        )
        .bind(&point.id)
        .bind(&point.user_id)
        .bind(point.status().as_str())
        .bind(point.balance())
        .bind(decision)
        .bind(decided_by)
        .bind(decided_on)
        .bind(parent_notes)
        .bind(Self::format_timestamp(point.updated_on))
        .bind(expected_version)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn query_points(&self, user_id: &str, query: &PointQuery) -> Result<Vec<PointEntry>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM points WHERE user_id = ", POINT_COLUMNS));
        builder.push_bind(user_id.to_string());

        if !query.statuses.is_empty() {
            builder.push(" AND status IN (");
            let mut separated = builder.separated(", ");
            for status in &query.statuses {
                separated.push_bind(status.as_str());
            }
            separated.push_unseparated(")");
        }

        if !query.types.is_empty() {
            builder.push(" AND request_type IN (");
            let mut separated = builder.separated(", ");
            for request_type in &query.types {
                separated.push_bind(request_type.as_str());
            }
            separated.push_unseparated(")");
        }

        if let Some(from) = query.updated_on.from {
            builder.push(" AND updated_on >= ").push_bind(Self::format_timestamp(from));
        }
        if let Some(to) = query.updated_on.to {
            builder.push(" AND updated_on <= ").push_bind(Self::format_timestamp(to));
        }

        builder.push(" ORDER BY updated_on DESC, rowid DESC");

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(limit as i64);
        }

        let rows = builder.build().fetch_all(self.db.pool()).await?;
        rows.iter().map(Self::point_from_row).collect()
    }

    async fn latest_balance(&self, user_id: &str, until: DateTime<Utc>) -> Result<BalanceSnapshot> {
        // Single statement so balance and version come from the same snapshot
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT balance FROM points
                 WHERE user_id = ?1 AND balance IS NOT NULL AND updated_on <= ?2
                 ORDER BY updated_on DESC, balance_seq DESC
                 LIMIT 1) AS balance,
                (SELECT COALESCE(MAX(balance_seq), 0) FROM points WHERE user_id = ?1) AS version
            "#,
        )
        .bind(user_id)
        .bind(Self::format_timestamp(until))
        .fetch_one(self.db.pool())
        .await?;

        Ok(BalanceSnapshot {
            balance: row.try_get::<Option<i32>, _>("balance")?.unwrap_or(0),
            version: row.try_get("version")?,
        })
    }

    async fn current_balance(&self, user_id: &str) -> Result<BalanceSnapshot> {
        let row = sqlx::query(
            r#"
            SELECT balance, balance_seq AS version
            FROM points
            WHERE user_id = ?1 AND balance_seq IS NOT NULL
            ORDER BY balance_seq DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        match row {
            Some(row) => Ok(BalanceSnapshot {
                balance: row.try_get("balance")?,
                version: row.try_get("version")?,
            }),
            None => Ok(BalanceSnapshot::default()),
        }
    }
}
