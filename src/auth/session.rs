//! Per-browser session state for the authorization round trip.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

/// How long a pending authorization may take before its session is dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(15 * 60);
/// Upper bound on sessions kept at once; the oldest are evicted first.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Values remembered between the authorize redirect and the OAuth callback.
///
/// `name` is the caller-supplied display name and is trusted as-is to index
/// the token store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub name: Option<String>,
    pub oauth_state: Option<String>,
}

/// Storage abstraction for sessions, keyed by an opaque session id.
pub trait SessionStore: Send + Sync {
    fn get(&self, id: &str) -> Option<Session>;
    fn put(&self, id: &str, session: Session);
    fn remove(&self, id: &str);
}

#[derive(Debug)]
struct Entry {
    session: Session,
    touched: Instant,
    /// Write order, used to pick the eviction victim.
    seq: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    entries: HashMap<String, Entry>,
    next_seq: u64,
}

/// Sessions kept in process memory; lost on restart.
///
/// Entries expire `ttl` after their last write and the map never holds more
/// than `max_sessions` entries.
#[derive(Debug)]
pub struct MemorySessionStore {
    sessions: RwLock<Sessions>,
    ttl: Duration,
    max_sessions: usize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_SESSION_TTL, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_limits(ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(Sessions::default()),
            ttl,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Number of stored sessions, expired ones included until the next write.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_live(&self, entry: &Entry) -> bool {
        entry.touched.elapsed() < self.ttl
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, id: &str) -> Option<Session> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .get(id)
            .filter(|entry| self.is_live(entry))
            .map(|entry| entry.session.clone())
    }

    fn put(&self, id: &str, session: Session) {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let Sessions { entries, next_seq } = &mut *sessions;
        entries.retain(|_, entry| self.is_live(entry));
        if !entries.contains_key(id) && entries.len() >= self.max_sessions {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.seq)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                tracing::debug!("session store full, evicting oldest session");
                entries.remove(&oldest);
            }
        }
        *next_seq += 1;
        entries.insert(
            id.to_string(),
            Entry {
                session,
                touched: Instant::now(),
                seq: *next_seq,
            },
        );
    }

    fn remove(&self, id: &str) {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .remove(id);
    }
}

/// Generate a fresh opaque session id.
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
