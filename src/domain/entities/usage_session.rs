//! Usage session entity and repository trait.
//!
//! Maps to the `usage_sessions` table in the database schema. A usage
//! session is one continuous interval of user connectivity, opened on
//! connect and closed by the disconnect debounce.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents one interval of user connectivity.
///
/// Maps to the `usage_sessions` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - username: VARCHAR(32) NOT NULL
/// - login_at: TIMESTAMPTZ NOT NULL
/// - logout_at: TIMESTAMPTZ NULL
/// - duration_ms: BIGINT NULL
///
/// `logout_at` and `duration_ms` stay NULL while the session is open. The
/// tracker keeps at most one open row per user; a process restart with a
/// pending debounce leaves the row open indefinitely (known failure mode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSession {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Username the session belongs to
    pub username: String,

    /// When the user connected
    pub login_at: DateTime<Utc>,

    /// When the session was closed (None while open)
    pub logout_at: Option<DateTime<Utc>>,

    /// Session length in milliseconds, `logout_at - login_at` (None while open)
    pub duration_ms: Option<i64>,
}

impl UsageSession {
    /// Open a new session starting at `login_at`.
    pub fn open(id: i64, username: impl Into<String>, login_at: DateTime<Utc>) -> Self {
        Self {
            id,
            username: username.into(),
            login_at,
            logout_at: None,
            duration_ms: None,
        }
    }

    /// Check whether the session is still open.
    pub fn is_open(&self) -> bool {
        self.logout_at.is_none()
    }

    /// Close the session at `logout_at`, computing the duration.
    pub fn closed_at(mut self, logout_at: DateTime<Utc>) -> Self {
        self.duration_ms = Some((logout_at - self.login_at).num_milliseconds());
        self.logout_at = Some(logout_at);
        self
    }
}

/// Repository trait for usage session data access operations.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a newly opened session.
    async fn create(&self, session: &UsageSession) -> Result<UsageSession, AppError>;

    /// Find the most recent open session for a user, if any.
    async fn find_latest_open(&self, username: &str) -> Result<Option<UsageSession>, AppError>;

    /// Close a session: set `logout_at` and the computed duration.
    async fn close(
        &self,
        id: i64,
        logout_at: DateTime<Utc>,
        duration_ms: i64,
    ) -> Result<(), AppError>;

    /// All sessions for a user, most recent first.
    async fn find_by_username(&self, username: &str) -> Result<Vec<UsageSession>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_open_session_has_no_logout() {
        let session = UsageSession::open(1, "alice", Utc::now());

        assert!(session.is_open());
        assert!(session.logout_at.is_none());
        assert!(session.duration_ms.is_none());
    }

    #[test]
    fn test_closed_at_computes_duration() {
        let login_at = Utc::now();
        let logout_at = login_at + Duration::milliseconds(5500);

        let session = UsageSession::open(1, "alice", login_at).closed_at(logout_at);

        assert!(!session.is_open());
        assert_eq!(session.logout_at, Some(logout_at));
        assert_eq!(session.duration_ms, Some(5500));
    }

    #[test]
    fn test_closed_at_zero_duration_for_instant_disconnect() {
        let login_at = Utc::now();

        let session = UsageSession::open(1, "alice", login_at).closed_at(login_at);

        assert_eq!(session.duration_ms, Some(0));
    }
}
