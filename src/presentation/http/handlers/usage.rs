//! Usage Session Handlers

use axum::{
    extract::{Extension, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{SessionRepository, UsageSession};
use crate::infrastructure::repositories::PgSessionRepository;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Daily usage response
#[derive(Debug, Serialize)]
pub struct DailyUsageResponse {
    pub sessions: Vec<UsageSessionResponse>,
}

/// One session record on the wire
#[derive(Debug, Serialize)]
pub struct UsageSessionResponse {
    pub username: String,
    #[serde(rename = "loginAt")]
    pub login_at: DateTime<Utc>,
    #[serde(rename = "logoutAt")]
    pub logout_at: Option<DateTime<Utc>>,
    #[serde(rename = "durationMs")]
    pub duration_ms: Option<i64>,
}

impl From<UsageSession> for UsageSessionResponse {
    fn from(session: UsageSession) -> Self {
        Self {
            username: session.username,
            login_at: session.login_at,
            logout_at: session.logout_at,
            duration_ms: session.duration_ms,
        }
    }
}

/// Get the caller's usage sessions.
///
/// Raw session records, most recent first; the client does its own
/// aggregation for the usage chart.
pub async fn daily_usage(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<DailyUsageResponse>, AppError> {
    let sessions = PgSessionRepository::new(state.db.clone())
        .find_by_username(&auth.username)
        .await?;

    Ok(Json(DailyUsageResponse {
        sessions: sessions
            .into_iter()
            .map(UsageSessionResponse::from)
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_open_session_serializes_null_logout() {
        let login_at: DateTime<Utc> = "2026-08-07T10:00:00Z".parse().unwrap();
        let session = UsageSession::open(1, "alice", login_at);

        let json = serde_json::to_value(UsageSessionResponse::from(session)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "username": "alice",
                "loginAt": "2026-08-07T10:00:00Z",
                "logoutAt": null,
                "durationMs": null
            })
        );
    }
}
