use std::collections::HashMap;

use chrono::{Duration, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::traits::{AuthError, Session};

/// Sessions issued by login, looked up by bearer token.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Session>>,
    ttl: Duration,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Stores `session`, first dropping every session whose TTL has passed.
    pub fn register(&self, session: Session) {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        sessions.retain(|_, s| now - s.issued_at <= self.ttl);
        sessions.insert(session.token, session);
    }

    /// # Errors
    ///
    /// Returns `AuthError::InvalidSession` for unknown tokens and
    /// `AuthError::SessionExpired` (dropping the session) once the TTL has passed.
    pub fn resolve(&self, token: Uuid) -> Result<Session, AuthError> {
        let session = self
            .sessions
            .read()
            .get(&token)
            .cloned()
            .ok_or(AuthError::InvalidSession)?;

        if Utc::now() - session.issued_at > self.ttl {
            self.sessions.write().remove(&token);
            return Err(AuthError::SessionExpired);
        }
        Ok(session)
    }

    pub fn revoke(&self, token: Uuid) -> bool {
        self.sessions.write().remove(&token).is_some()
    }
}
