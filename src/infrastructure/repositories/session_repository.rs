//! Session Repository Implementation
//!
//! PostgreSQL implementation of the SessionRepository trait for usage
//! session rows.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{SessionRepository, UsageSession};
use crate::shared::error::AppError;

/// Internal row type for usage session queries.
#[derive(Debug, sqlx::FromRow)]
struct UsageSessionRow {
    id: i64,
    username: String,
    login_at: DateTime<Utc>,
    logout_at: Option<DateTime<Utc>>,
    duration_ms: Option<i64>,
}

impl UsageSessionRow {
    /// Convert database row to domain UsageSession entity.
    fn into_session(self) -> UsageSession {
        UsageSession {
            id: self.id,
            username: self.username,
            login_at: self.login_at,
            logout_at: self.logout_at,
            duration_ms: self.duration_ms,
        }
    }
}

/// PostgreSQL session repository implementation.
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Creates a new PgSessionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    /// Persist a newly opened session.
    async fn create(&self, session: &UsageSession) -> Result<UsageSession, AppError> {
        let row = sqlx::query_as::<_, UsageSessionRow>(
            r#"
            INSERT INTO usage_sessions (id, username, login_at, logout_at, duration_ms)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, login_at, logout_at, duration_ms
            "#,
        )
        .bind(session.id)
        .bind(&session.username)
        .bind(session.login_at)
        .bind(session.logout_at)
        .bind(session.duration_ms)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_session())
    }

    /// Find the most recent open session for a user, if any.
    async fn find_latest_open(&self, username: &str) -> Result<Option<UsageSession>, AppError> {
        let row = sqlx::query_as::<_, UsageSessionRow>(
            r#"
            SELECT id, username, login_at, logout_at, duration_ms
            FROM usage_sessions
            WHERE username = $1 AND logout_at IS NULL
            ORDER BY login_at DESC
            LIMIT 1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_session()))
    }

    /// Close a session: set `logout_at` and the computed duration.
    async fn close(
        &self,
        id: i64,
        logout_at: DateTime<Utc>,
        duration_ms: i64,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE usage_sessions
            SET logout_at = $2, duration_ms = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(logout_at)
        .bind(duration_ms)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Usage session with id {} not found",
                id
            )));
        }

        Ok(())
    }

    /// All sessions for a user, most recent first.
    async fn find_by_username(&self, username: &str) -> Result<Vec<UsageSession>, AppError> {
        let rows = sqlx::query_as::<_, UsageSessionRow>(
            r#"
            SELECT id, username, login_at, logout_at, duration_ms
            FROM usage_sessions
            WHERE username = $1
            ORDER BY login_at DESC
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_session()).collect())
    }
}
