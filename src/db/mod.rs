//! Persistence for the remembered user session.
//!
//! A single serialized `{name, email}` record under a fixed key. Absence or
//! corruption of the record is treated as "no session", never as an error.

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::warn;

use crate::models::UserSession;

/// SQLite-backed store for the single session record.
pub struct SessionStore {
    pool: SqlitePool,
}

impl SessionStore {
    /// Open (and migrate) the session database.
    pub async fn new(database_url: &str) -> Result<Self> {
        // Single-row store; one connection keeps in-memory databases coherent
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .context("Failed to connect to session database")?;

        let store = Self { pool };
        store.run_migrations().await?;

        Ok(store)
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_session (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                payload TEXT NOT NULL,
                saved_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Remember the session across restarts.
    pub async fn save(&self, session: &UserSession) -> Result<()> {
        let payload = serde_json::to_string(session)?;

        sqlx::query(
            r#"
            INSERT INTO user_session (id, payload, saved_at)
            VALUES (1, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(id) DO UPDATE SET
                payload = excluded.payload,
                saved_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(payload)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Restore the remembered session, if any. A record that fails to parse
    /// is discarded silently and read as "no session".
    pub async fn load(&self) -> Result<Option<UserSession>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM user_session WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        match serde_json::from_str::<UserSession>(&payload) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(error = %e, "Discarding corrupt session record");
                self.clear().await?;
                Ok(None)
            }
        }
    }

    /// Forget the remembered session.
    pub async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM user_session WHERE id = 1")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
