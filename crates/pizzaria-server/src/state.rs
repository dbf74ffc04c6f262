use std::sync::Arc;

use pizzaria_operations::providers::{SessionRegistry, StaticCredentialVerifier};
use pizzaria_operations::traits::CredentialVerifier;
use pizzaria_store::{InMemoryStore, RecordStore};

use crate::config::AdminConfig;

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        verifier: Arc<dyn CredentialVerifier>,
        sessions: Arc<SessionRegistry>,
    ) -> Self {
        Self {
            store,
            verifier,
            sessions,
        }
    }

    /// In-memory store with the configured admin account.
    #[must_use]
    pub fn in_memory(admin: &AdminConfig) -> Self {
        Self::new(
            Arc::new(InMemoryStore::new()),
            Arc::new(StaticCredentialVerifier::new(
                admin.username.clone(),
                admin.secret.clone(),
            )),
            Arc::new(SessionRegistry::new(admin.session_ttl())),
        )
    }
}
