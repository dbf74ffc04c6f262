use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use crate::Result;
use crate::providers::SessionRegistry;
use crate::traits::{CredentialVerifier, Session};

/// Login form body. Carries the password, so it has no `Debug` impl.
#[derive(Clone, Deserialize)]
pub struct LoginInput {
    #[serde(rename = "usuario")]
    pub username: String,
    #[serde(rename = "senha")]
    pub secret: String,
}

/// Exchanges admin credentials for a registered session.
pub struct LoginOperation<V: ?Sized> {
    verifier: Arc<V>,
    sessions: Arc<SessionRegistry>,
}

impl<V: CredentialVerifier + ?Sized> LoginOperation<V> {
    pub fn new(verifier: Arc<V>, sessions: Arc<SessionRegistry>) -> Self {
        Self { verifier, sessions }
    }

    /// # Errors
    ///
    /// Returns `OperationError::Auth` if the credentials are rejected.
    pub fn execute(&self, input: &LoginInput) -> Result<Session> {
        match self.verifier.verify(&input.username, &input.secret) {
            Ok(session) => {
                info!(usuario = %session.username, "admin logged in");
                self.sessions.register(session.clone());
                Ok(session)
            }
            Err(e) => {
                warn!(usuario = %input.username, "rejected admin login");
                Err(e.into())
            }
        }
    }
}
