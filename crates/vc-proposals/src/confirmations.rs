//! Single-use confirmation tokens with opportunistic expiry.
//!
//! There is no background reaper: expired entries are swept on every
//! create, consume, and reject, which bounds the map size as long as the
//! store is being used at all.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// How long a pending confirmation stays answerable.
pub const DEFAULT_CONFIRMATION_TTL_MINUTES: i64 = 10;

struct Pending<T> {
    payload: T,
    expires_at: DateTime<Utc>,
}

/// In-memory store of pending confirmations keyed by single-use token.
pub struct ConfirmationStore<T> {
    ttl: Duration,
    pending: Mutex<HashMap<Uuid, Pending<T>>>,
}

impl<T> ConfirmationStore<T> {
    pub fn new() -> Self {
        Self::with_ttl(Duration::minutes(DEFAULT_CONFIRMATION_TTL_MINUTES))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self { ttl, pending: Mutex::new(HashMap::new()) }
    }

    /// Park a payload under a fresh token; returns the token and the
    /// instant it stops being answerable.
    pub fn create(&self, payload: T) -> (Uuid, DateTime<Utc>) {
        let token = Uuid::new_v4();
        let expires_at = Utc::now() + self.ttl;
        let mut pending = self.pending.lock().unwrap();
        sweep(&mut pending);
        pending.insert(token, Pending { payload, expires_at });
        (token, expires_at)
    }

    /// Remove and return the payload for a token. `None` when the token
    /// never existed, was already answered, or expired. Removal happens
    /// under the lock, so concurrent confirms resolve to exactly one
    /// winner.
    pub fn consume(&self, token: Uuid) -> Option<T> {
        let mut pending = self.pending.lock().unwrap();
        sweep(&mut pending);
        pending.remove(&token).map(|entry| entry.payload)
    }

    /// Drop a pending confirmation without reading it. Returns whether
    /// one was actually pending.
    pub fn reject(&self, token: Uuid) -> bool {
        let mut pending = self.pending.lock().unwrap();
        sweep(&mut pending);
        pending.remove(&token).is_some()
    }

    /// Live (unexpired, unanswered) confirmations.
    pub fn pending_count(&self) -> usize {
        let mut pending = self.pending.lock().unwrap();
        sweep(&mut pending);
        pending.len()
    }
}

impl<T> Default for ConfirmationStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn sweep<T>(pending: &mut HashMap<Uuid, Pending<T>>) {
    let now = Utc::now();
    let before = pending.len();
    pending.retain(|_, entry| entry.expires_at > now);
    let dropped = before - pending.len();
    if dropped > 0 {
        tracing::debug!(dropped, "swept expired confirmations");
    }
}
