use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("missing or invalid session token")]
    InvalidSession,

    #[error("session expired")]
    SessionExpired,
}

/// An authenticated admin session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub token: Uuid,
    #[serde(rename = "usuario")]
    pub username: String,
    #[serde(rename = "emitido_em")]
    pub issued_at: DateTime<Utc>,
}

impl Session {
    #[must_use]
    pub fn issue(username: &str) -> Self {
        Self {
            token: Uuid::new_v4(),
            username: username.to_string(),
            issued_at: Utc::now(),
        }
    }
}

/// Checks admin credentials and issues sessions.
///
/// Login handlers only depend on this trait, so hashing or an external
/// identity provider can replace the configured single admin.
pub trait CredentialVerifier: Send + Sync {
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the pair is not accepted.
    fn verify(&self, username: &str, secret: &str) -> Result<Session, AuthError>;
}
