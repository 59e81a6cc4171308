//! In-memory session store with last-request-wins generation tickets.
//!
//! Every generate call takes the next ticket for its session and registers the
//! task's `AbortHandle`. Starting a newer generation aborts the older task, and
//! a result that arrives with an outdated ticket is dropped.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::session::models::SessionState;
use crate::session::SessionError;

struct SessionSlot {
    state: Arc<SessionState>,
    latest_ticket: u64,
    in_flight: Option<AbortHandle>,
    last_seen: Instant,
}

impl SessionSlot {
    fn new(state: SessionState) -> Self {
        Self {
            state: Arc::new(state),
            latest_ticket: 0,
            in_flight: None,
            last_seen: Instant::now(),
        }
    }
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionSlot>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Arc<SessionState> {
        let id = Uuid::new_v4();
        let slot = SessionSlot::new(SessionState::new(id));
        let state = slot.state.clone();
        self.inner.write().await.insert(id, slot);
        debug!("Created session {id}");
        state
    }

    pub async fn get(&self, id: Uuid) -> Result<Arc<SessionState>, SessionError> {
        let mut sessions = self.inner.write().await;
        let slot = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        slot.last_seen = Instant::now();
        Ok(slot.state.clone())
    }

    /// Replaces the session state with `update(current)`.
    pub async fn update<F>(&self, id: Uuid, update: F) -> Result<Arc<SessionState>, SessionError>
    where
        F: FnOnce(&SessionState) -> SessionState,
    {
        let mut sessions = self.inner.write().await;
        let slot = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        slot.state = Arc::new(update(&slot.state));
        slot.last_seen = Instant::now();
        Ok(slot.state.clone())
    }

    /// Drops a session, aborting any generation still running for it.
    pub async fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        let slot = self
            .inner
            .write()
            .await
            .remove(&id)
            .ok_or(SessionError::NotFound(id))?;
        if let Some(handle) = slot.in_flight {
            handle.abort();
        }
        debug!("Removed session {id}");
        Ok(())
    }

    /// Registers a new generation task and returns its ticket. The previously
    /// registered task, if any, is aborted.
    pub async fn begin_generation(&self, id: Uuid, handle: AbortHandle) -> Result<u64, SessionError> {
        let mut sessions = self.inner.write().await;
        let slot = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;

        if let Some(previous) = slot.in_flight.replace(handle) {
            info!("Session {id}: newer generation request supersedes ticket {}", slot.latest_ticket);
            previous.abort();
        }
        slot.latest_ticket += 1;
        slot.last_seen = Instant::now();
        Ok(slot.latest_ticket)
    }

    /// Stores the result of generation `ticket`.
    ///
    /// Returns `Ok(None)` without touching the session when a newer
    /// generation has started since.
    pub async fn finish_generation<F>(
        &self,
        id: Uuid,
        ticket: u64,
        update: F,
    ) -> Result<Option<Arc<SessionState>>, SessionError>
    where
        F: FnOnce(&SessionState) -> SessionState,
    {
        let mut sessions = self.inner.write().await;
        let slot = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;

        if slot.latest_ticket != ticket {
            debug!("Session {id}: discarding stale result for ticket {ticket}");
            return Ok(None);
        }
        slot.in_flight = None;
        slot.state = Arc::new(update(&slot.state));
        slot.last_seen = Instant::now();
        Ok(Some(slot.state.clone()))
    }

    /// Ends generation `ticket` without changing the state (the generation
    /// failed). Returns `false` if the ticket was already stale.
    pub async fn release_generation(&self, id: Uuid, ticket: u64) -> Result<bool, SessionError> {
        let mut sessions = self.inner.write().await;
        let slot = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;

        if slot.latest_ticket != ticket {
            return Ok(false);
        }
        slot.in_flight = None;
        Ok(true)
    }

    /// Removes sessions not touched within `ttl`. Returns how many were evicted.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, slot| {
            let keep = slot.last_seen.elapsed() < ttl;
            if !keep {
                if let Some(handle) = slot.in_flight.take() {
                    handle.abort();
                }
            }
            keep
        });
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// Spawns the background task that evicts idle sessions.
pub fn spawn_sweeper(store: SessionStore, ttl: Duration) -> JoinHandle<()> {
    let period = (ttl / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = store.evict_idle(ttl).await;
            if evicted > 0 {
                info!("Evicted {evicted} idle session(s)");
            }
        }
    })
}
