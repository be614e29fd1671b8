//! In-memory session registry.
//!
//! Maps opaque session tokens to user ids. Tokens live until they are
//! revoked at logout; nothing expires them and nothing survives a restart.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, i64>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token for `user_id`.
    ///
    /// A token that is already live is never handed out twice; on a
    /// collision a new one is drawn.
    pub fn create(&self, user_id: i64) -> String {
        loop {
            let token = Uuid::new_v4().simple().to_string();
            match self.sessions.entry(token.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(user_id);
                    tracing::debug!(user_id, "session created");
                    return token;
                }
                Entry::Occupied(_) => {
                    tracing::warn!("session token collision, drawing a new token");
                }
            }
        }
    }

    pub fn resolve(&self, token: &str) -> Option<i64> {
        self.sessions.get(token).map(|entry| *entry.value())
    }

    /// Remove a token. Unknown tokens are ignored. Returns whether a
    /// session was actually removed.
    pub fn revoke(&self, token: &str) -> bool {
        let removed = self.sessions.remove(token);
        if let Some((_, user_id)) = &removed {
            tracing::debug!(user_id, "session revoked");
        }
        removed.is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
