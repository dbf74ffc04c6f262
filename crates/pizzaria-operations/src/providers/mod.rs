mod credentials;
mod sessions;

pub use credentials::StaticCredentialVerifier;
pub use sessions::SessionRegistry;
