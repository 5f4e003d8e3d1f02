//! Session Tracker
//!
//! Tracks per-user online/offline transitions and writes usage sessions.
//! A disconnect arms a grace timer; reconnecting inside the window cancels
//! it and the original session keeps running. State lives in a keyed map
//! owned by the tracker instance — nothing is process-global, and a
//! process restart with pending timers leaves those sessions open in
//! storage (known failure mode).

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::domain::{SessionRepository, UsageSession};
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Per-user tracker state.
enum TrackedState {
    /// The user has at least one live connection and an open session row.
    Active,
    /// The user disconnected; the grace timer is armed.
    PendingLogout(JoinHandle<()>),
}

/// Transition decided under the map lock; I/O happens after release.
enum ConnectAction {
    OpenSession,
    Continue,
}

/// Presence-driven usage session bookkeeping.
pub struct SessionTracker<S: SessionRepository> {
    inner: Arc<TrackerInner<S>>,
}

struct TrackerInner<S> {
    sessions: Arc<S>,
    id_generator: Arc<SnowflakeGenerator>,
    grace: Duration,
    entries: Mutex<HashMap<String, TrackedState>>,
}

impl<S: SessionRepository + 'static> SessionTracker<S> {
    pub fn new(sessions: Arc<S>, id_generator: Arc<SnowflakeGenerator>, grace: Duration) -> Self {
        Self {
            inner: Arc::new(TrackerInner {
                sessions,
                id_generator,
                grace,
                entries: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Handle a connection for `username`.
    ///
    /// Opens a new session row unless the user is already active or inside
    /// the grace window — a rapid reconnect continues the running session,
    /// and a duplicate connection never opens a second row.
    pub async fn on_connect(&self, username: &str) -> Result<(), AppError> {
        let action = {
            let mut entries = self.inner.entries.lock();
            match entries.entry(username.to_string()) {
                Entry::Vacant(slot) => {
                    slot.insert(TrackedState::Active);
                    ConnectAction::OpenSession
                }
                Entry::Occupied(mut slot) => {
                    if let TrackedState::PendingLogout(timer) =
                        std::mem::replace(slot.get_mut(), TrackedState::Active)
                    {
                        timer.abort();
                        tracing::debug!(username = %username, "Reconnect within grace, session continues");
                    }
                    ConnectAction::Continue
                }
            }
        };

        if let ConnectAction::OpenSession = action {
            let session = UsageSession::open(
                self.inner.id_generator.generate(),
                username,
                Utc::now(),
            );
            self.inner.sessions.create(&session).await?;
            tracing::info!(username = %username, session_id = session.id, "Usage session opened");
        }

        Ok(())
    }

    /// Handle a disconnect for `username`: arm the grace timer.
    ///
    /// When the timer fires, the user's most recent open session is closed
    /// with `logout_at` and the computed duration. Arming again before
    /// expiry restarts the countdown.
    pub fn on_disconnect(&self, username: &str) {
        let inner = Arc::clone(&self.inner);
        let name = username.to_string();

        let timer = tokio::spawn(async move {
            tokio::time::sleep(inner.grace).await;
            inner.entries.lock().remove(&name);
            if let Err(e) = close_latest(&inner, &name).await {
                tracing::error!(username = %name, error = %e, "Failed to close usage session");
            }
        });

        let mut entries = self.inner.entries.lock();
        if let Some(TrackedState::PendingLogout(previous)) = entries.insert(
            username.to_string(),
            TrackedState::PendingLogout(timer),
        ) {
            previous.abort();
        }
    }
}

impl<S: SessionRepository> Clone for SessionTracker<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Close the user's most recent open session, if any.
async fn close_latest<S: SessionRepository>(
    inner: &TrackerInner<S>,
    username: &str,
) -> Result<(), AppError> {
    let Some(open) = inner.sessions.find_latest_open(username).await? else {
        tracing::warn!(username = %username, "No open session to close");
        return Ok(());
    };

    let closed = open.closed_at(Utc::now());
    if let (Some(logout_at), Some(duration_ms)) = (closed.logout_at, closed.duration_ms) {
        inner.sessions.close(closed.id, logout_at, duration_ms).await?;
        tracing::info!(
            username = %username,
            session_id = closed.id,
            duration_ms = duration_ms,
            "Usage session closed"
        );
    }

    Ok(())
}
