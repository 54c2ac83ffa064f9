//! Server-side session state.
//!
//! Sessions are explicit values rather than ambient globals: a handler
//! loads a [`SessionData`] snapshot, the controller logic mutates it, and
//! the handler merges it back into the store before responding. The store
//! itself is an in-memory map keyed by the cookie token; expired entries
//! are swept whenever a new one is inserted.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

const SESSION_TOKEN_BYTES: usize = 32;

/// A user who passed the first sign-in factor but is not logged in yet.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PendingUser {
    pub id: Uuid,
}

/// Everything the front-end keeps for one browser session.
///
/// `placeholders` is the tour wizard's progress, keyed by normalised
/// placeholder name. The two `webauthn_*` values are opaque ceremony
/// state: present only between a `begin` and its matching `complete`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: Option<Uuid>,
    pub user_details: Option<PendingUser>,
    pub placeholders: Option<HashMap<String, String>>,
    pub webauthn_registration_state: Option<Value>,
    pub webauthn_authentication_state: Option<Value>,
}

struct SessionEntry {
    data: SessionData,
    created_at: Instant,
}

/// In-memory session store keyed by the cookie token.
pub struct SessionStore {
    ttl: Duration,
    entries: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Create a fresh, empty session and return its token.
    pub async fn create(&self) -> String {
        let token = generate_token();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.created_at.elapsed() < self.ttl);
        entries.insert(
            token.clone(),
            SessionEntry {
                data: SessionData::default(),
                created_at: Instant::now(),
            },
        );
        token
    }

    pub async fn get(&self, token: &str) -> Option<SessionData> {
        let entries = self.entries.lock().await;
        entries
            .get(token)
            .filter(|entry| entry.created_at.elapsed() < self.ttl)
            .map(|entry| entry.data.clone())
    }

    /// Merge updated session data back under an existing token.
    ///
    /// The TTL runs from session creation; writing does not extend it.
    pub async fn put(&self, token: &str, data: SessionData) {
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.created_at.elapsed() < self.ttl);
        let created_at = entries
            .get(token)
            .map_or_else(Instant::now, |entry| entry.created_at);
        entries.insert(token.to_string(), SessionEntry { data, created_at });
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
