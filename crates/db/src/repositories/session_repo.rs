//! Repository for the `shopify_sessions` table.

use sqlx::{QueryBuilder, Sqlite};

use crate::models::session::SessionRow;
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, shop, state, isOnline, scope, accessToken, expires, onlineAccessInfo";

/// Provides CRUD operations for platform auth sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Create the sessions table and its shop index if they do not exist.
    pub async fn create_table(pool: &DbPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS shopify_sessions (
                id TEXT PRIMARY KEY,
                shop TEXT NOT NULL,
                state TEXT,
                isOnline INTEGER,
                scope TEXT,
                accessToken TEXT,
                expires INTEGER,
                onlineAccessInfo TEXT
            )",
        )
        .execute(pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_shopify_sessions_shop ON shopify_sessions (shop)",
        )
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Insert a session or fully replace the row with the same id.
    pub async fn upsert(pool: &DbPool, row: &SessionRow) -> Result<(), sqlx::Error> {
        let query = format!(
            "INSERT OR REPLACE INTO shopify_sessions ({COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        );
        sqlx::query(&query)
            .bind(&row.id)
            .bind(&row.shop)
            .bind(&row.state)
            .bind(row.is_online)
            .bind(&row.scope)
            .bind(&row.access_token)
            .bind(row.expires)
            .bind(&row.online_access_info)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Find a session by its id.
    pub async fn find_by_id(pool: &DbPool, id: &str) -> Result<Option<SessionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shopify_sessions WHERE id = ?");
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All sessions for a shop, in storage order.
    pub async fn find_by_shop(pool: &DbPool, shop: &str) -> Result<Vec<SessionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shopify_sessions WHERE shop = ?");
        sqlx::query_as::<_, SessionRow>(&query)
            .bind(shop)
            .fetch_all(pool)
            .await
    }

    /// Delete a session by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &DbPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM shopify_sessions WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every session for a shop. Returns the number of rows removed.
    pub async fn delete_by_shop(pool: &DbPool, shop: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM shopify_sessions WHERE shop = ?")
            .bind(shop)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete every session whose id is in `ids` with a single statement.
    ///
    /// An empty slice issues no query. Returns the number of rows removed.
    pub async fn delete_many(pool: &DbPool, ids: &[String]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<Sqlite>::new("DELETE FROM shopify_sessions WHERE id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let result = builder.build().execute(pool).await?;
        Ok(result.rows_affected())
    }
}
