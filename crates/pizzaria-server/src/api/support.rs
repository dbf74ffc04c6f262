use axum::body::Bytes;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ServerError;

/// Run a store-bound operation on the blocking pool.
pub(super) async fn run_blocking<T, F>(operation: F) -> Result<T, ServerError>
where
    F: FnOnce() -> pizzaria_operations::Result<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(operation).await??)
}

pub(super) fn json_body(body: &Bytes) -> Result<Value, ServerError> {
    serde_json::from_slice(body).map_err(|_| ServerError::malformed("", "valid JSON"))
}

pub(super) fn typed_body<T: DeserializeOwned>(
    body: &Bytes,
    expected: &'static str,
) -> Result<T, ServerError> {
    serde_json::from_slice(body).map_err(|_| ServerError::malformed("", expected))
}

pub(super) fn path_id(raw: &str) -> Result<Uuid, ServerError> {
    raw.parse()
        .map_err(|_| ServerError::malformed("id", "a UUID"))
}
