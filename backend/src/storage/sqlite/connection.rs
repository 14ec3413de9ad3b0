use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use super::{FamilyRepository, PointRepository};
use crate::storage::traits::Connection;

/// DbConnection owns the SQLite pool and hands out repositories
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if missing) the database at `url` and set up the schema
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid database url {}", url))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open database {}", url))?;

        Self::setup_schema(&pool).await?;
        info!("Database ready at {}", url);

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a private in-memory database for a single test
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        // Every parse of ":memory:" yields a distinct shared-cache database;
        // a single long-lived connection keeps it alive for the whole test.
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;
        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Ledger entries; rowid doubles as insertion order
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS points (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                status TEXT NOT NULL,
                points INTEGER NOT NULL,
                balance INTEGER,
                balance_seq INTEGER,
                request_type TEXT NOT NULL,
                reason TEXT NOT NULL,
                decision TEXT,
                decided_by_user_id TEXT,
                decided_on TEXT,
                parent_notes TEXT,
                created_on TEXT NOT NULL,
                updated_on TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_points_user_updated_on
            ON points(user_id, updated_on DESC);
            "#,
        )
        .execute(pool)
        .await?;

        // One approved settlement per balance version and user
        sqlx::query(
            r#"
            CREATE UNIQUE INDEX IF NOT EXISTS idx_points_user_balance_seq
            ON points(user_id, balance_seq);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS family_members (
                family_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                role TEXT NOT NULL,
                created_on DATETIME DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (family_id, user_id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_family_members_user_id
            ON family_members(user_id);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type PointRepository = PointRepository;
    type FamilyRepository = FamilyRepository;

    fn create_point_repository(&self) -> Self::PointRepository {
        PointRepository::new(self.clone())
    }

    fn create_family_repository(&self) -> Self::FamilyRepository {
        FamilyRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_is_created() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");

        let rows = sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .fetch_all(db.pool())
            .await
            .unwrap();
        let tables: Vec<String> = rows.iter().map(|r| r.get("name")).collect();

        assert!(tables.contains(&"points".to_string()));
        assert!(tables.contains(&"family_members".to_string()));
    }

    #[tokio::test]
    async fn test_test_databases_are_isolated() {
        let first = DbConnection::init_test().await.unwrap();
        let second = DbConnection::init_test().await.unwrap();

        sqlx::query("INSERT INTO family_members (family_id, user_id, role) VALUES ('f1', 'u1', 'CHILD')")
            .execute(first.pool())
            .await
            .unwrap();

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM family_members")
            .fetch_one(second.pool())
            .await
            .unwrap()
            .get("n");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_file_database_is_created_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", dir.path().join("points.db").display());

        DbConnection::new(&url).await.unwrap();
        assert!(dir.path().join("points.db").exists());
    }
}
