mod credentials;

pub use credentials::{AuthError, CredentialVerifier, Session};
