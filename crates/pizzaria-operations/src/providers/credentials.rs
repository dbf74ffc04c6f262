use crate::traits::{AuthError, CredentialVerifier, Session};

/// Accepts exactly one configured username and password.
pub struct StaticCredentialVerifier {
    username: String,
    secret: String,
}

impl StaticCredentialVerifier {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            secret: secret.into(),
        }
    }
}

impl CredentialVerifier for StaticCredentialVerifier {
    fn verify(&self, username: &str, secret: &str) -> Result<Session, AuthError> {
        // Evaluate both comparisons so timing does not reveal which one failed.
        let username_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
        let secret_ok = constant_time_eq(secret.as_bytes(), self.secret.as_bytes());
        if username_ok & secret_ok && !self.secret.is_empty() {
            Ok(Session::issue(username))
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
