use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{FromRequestParts, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use pizzaria_operations::OperationError;
use pizzaria_operations::operations::{LoginInput, LoginOperation};
use pizzaria_operations::traits::{AuthError, Session};
use uuid::Uuid;

use super::support::typed_body;
use crate::error::ServerError;
use crate::state::AppState;

/// A request carrying `Authorization: Bearer <token>` for a live session.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

fn bearer_token(parts: &Parts) -> Option<Uuid> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    token.trim().parse().ok()
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(OperationError::Auth(AuthError::InvalidSession))?;
        let session = state.sessions.resolve(token).map_err(OperationError::from)?;
        Ok(Self(session))
    }
}

pub(super) async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Session>, ServerError> {
    let input: LoginInput = typed_body(&body, "an object with usuario and senha")?;
    let operation = LoginOperation::new(Arc::clone(&state.verifier), Arc::clone(&state.sessions));
    Ok(Json(operation.execute(&input)?))
}

pub(super) async fn logout(
    State(state): State<AppState>,
    AdminSession(session): AdminSession,
) -> StatusCode {
    state.sessions.revoke(session.token);
    tracing::info!(usuario = %session.username, "admin logged out");
    StatusCode::NO_CONTENT
}
