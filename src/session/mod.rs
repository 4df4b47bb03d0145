//! Server-side sessions keyed by a client-held cookie token.

pub mod cookie;

use std::collections::HashMap;

use rand::{distributions::Alphanumeric, Rng};
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Snapshot of the authenticated identity, taken at login time.
///
/// Deliberately a copy rather than a reference to the user record: later
/// profile edits do not retroactively change what a live session sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone)]
struct Slot {
    identity: Identity,
    expires_at: OffsetDateTime,
}

/// Token-keyed session store, held in `AppState` and shared by reference.
pub struct SessionStore {
    ttl: Duration,
    slots: RwLock<HashMap<String, Slot>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Store a full identity snapshot under a fresh random token.
    ///
    /// The insert is one atomic write of the whole slot — a concurrent reader
    /// sees either no session or the complete snapshot, never a partial one.
    /// Expired slots are swept here, while the write lock is already held.
    pub async fn establish(&self, identity: Identity) -> String {
        let token = new_token();
        let now = OffsetDateTime::now_utc();
        let slot = Slot {
            identity,
            expires_at: now + self.ttl,
        };
        let mut slots = self.slots.write().await;
        slots.retain(|_, s| s.expires_at > now);
        slots.insert(token.clone(), slot);
        debug!(live_sessions = slots.len(), "session established");
        token
    }

    /// Look up the identity a token stands for. A pure read: expired slots
    /// read as absent but are left for the next `establish` to sweep.
    pub async fn current(&self, token: &str) -> Option<Identity> {
        let slots = self.slots.read().await;
        let slot = slots.get(token)?;
        if slot.expires_at <= OffsetDateTime::now_utc() {
            return None;
        }
        Some(slot.identity.clone())
    }

    /// Drop a session. Terminating a token that is already gone is a no-op,
    /// not an error.
    pub async fn terminate(&self, token: &str) {
        if self.slots.write().await.remove(token).is_some() {
            debug!("session terminated");
        }
    }

    #[cfg(test)]
    async fn slot_count(&self) -> usize {
        self.slots.read().await.len()
    }
}

fn new_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}
