use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";

/// Maps opaque session ids (the cookie value) to the logged-in email.
/// Sessions live until logout or process exit.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, email: &str) -> Result<String> {
        let session_id = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .map_err(|e| Error::internal(format!("Session store lock poisoned: {e}")))?
            .insert(session_id.clone(), email.to_string());
        debug!("Created session for {}", email);
        Ok(session_id)
    }

    pub fn resolve(&self, session_id: &str) -> Result<Option<String>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|e| Error::internal(format!("Session store lock poisoned: {e}")))?;
        Ok(sessions.get(session_id).cloned())
    }

    /// Returns whether a session was actually removed.
    pub fn revoke(&self, session_id: &str) -> Result<bool> {
        let removed = self
            .sessions
            .write()
            .map_err(|e| Error::internal(format!("Session store lock poisoned: {e}")))?
            .remove(session_id);
        if let Some(email) = &removed {
            debug!("Revoked session for {}", email);
        }
        Ok(removed.is_some())
    }
}
