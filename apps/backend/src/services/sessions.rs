//! In-memory registry of live study sessions.
//!
//! Clients usually walk away from a session instead of ending it, so entries
//! carry a last-touched time and a background sweeper evicts idle ones.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use flashgenius_core::{SessionError, StudySession};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{ApiError, Result};

struct Entry {
    session: StudySession,
    touched: Instant,
}

/// Live sessions keyed by id. The lock is only held for synchronous
/// session calls, never across an await.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Entry>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Entry>>> {
        self.sessions
            .lock()
            .map_err(|_| ApiError::Internal("session registry lock poisoned".to_string()))
    }

    pub fn insert(&self, session: StudySession) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.lock()?.insert(
            id,
            Entry {
                session,
                touched: Instant::now(),
            },
        );
        tracing::debug!(session_id = %id, "session started");
        Ok(id)
    }

    /// Run `f` against a session while holding the registry lock.
    /// Any access, failed or not, counts as activity.
    pub fn with_session<T, F>(&self, id: Uuid, f: F) -> Result<T>
    where
        F: FnOnce(&mut StudySession) -> std::result::Result<T, SessionError>,
    {
        let mut sessions = self.lock()?;
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("session {}", id)))?;
        entry.touched = Instant::now();
        Ok(f(&mut entry.session)?)
    }

    /// Returns whether the session existed.
    pub fn remove(&self, id: Uuid) -> Result<bool> {
        let removed = self.lock()?.remove(&id).is_some();
        if removed {
            tracing::debug!(session_id = %id, "session ended");
        }
        Ok(removed)
    }

    /// Evict sessions untouched for at least `idle`.
    pub fn evict_idle(&self, idle: Duration) -> Result<usize> {
        match Instant::now().checked_sub(idle) {
            Some(cutoff) => self.evict_untouched_since(cutoff),
            None => Ok(0),
        }
    }

    /// Evict sessions last touched before `cutoff`. Sessions waiting on an
    /// adapter are kept; the answer handler still expects to find them.
    fn evict_untouched_since(&self, cutoff: Instant) -> Result<usize> {
        let mut sessions = self.lock()?;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let keep = entry.touched >= cutoff || entry.session.adaptation_in_flight();
            if !keep {
                tracing::debug!(session_id = %id, "evicting idle session");
            }
            keep
        });
        Ok(before - sessions.len())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Periodically evict sessions idle for longer than `idle`.
pub fn spawn_idle_sweeper(registry: Arc<SessionRegistry>, idle: Duration) -> JoinHandle<()> {
    let period = (idle / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match registry.evict_idle(idle) {
                Ok(0) => {}
                Ok(evicted) => tracing::info!(evicted, "evicted idle sessions"),
                Err(e) => tracing::warn!(error = %e, "session sweep failed"),
            }
        }
    })
}
