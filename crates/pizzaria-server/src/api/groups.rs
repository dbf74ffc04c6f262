use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use pizzaria_core::GroupWithItems;
use pizzaria_operations::operations::option_groups::{
    DeleteGroupOperation, GetGroupOperation, ListGroupsOperation, ProvisionGroupOperation,
    ReplaceGroupOperation,
};

use super::auth::AdminSession;
use super::support::{json_body, path_id, run_blocking};
use crate::error::ServerError;
use crate::state::AppState;

pub(super) async fn list_groups(
    State(state): State<AppState>,
) -> Result<Json<Vec<GroupWithItems>>, ServerError> {
    let store = Arc::clone(&state.store);
    let groups = run_blocking(move || ListGroupsOperation::new(store).execute()).await?;
    Ok(Json(groups))
}

#[tracing::instrument(skip_all, fields(usuario = %admin.0.username))]
pub(super) async fn create_group(
    State(state): State<AppState>,
    admin: AdminSession,
    body: Bytes,
) -> Result<(StatusCode, Json<GroupWithItems>), ServerError> {
    let payload = json_body(&body)?;
    let store = Arc::clone(&state.store);
    let created =
        run_blocking(move || ProvisionGroupOperation::new(store).execute(&payload)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub(super) async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GroupWithItems>, ServerError> {
    let group_id = path_id(&id)?;
    let store = Arc::clone(&state.store);
    let group = run_blocking(move || GetGroupOperation::new(store).execute(group_id)).await?;
    Ok(Json(group))
}

#[tracing::instrument(skip_all, fields(usuario = %admin.0.username, group_id = %id))]
pub(super) async fn replace_group(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<GroupWithItems>, ServerError> {
    let group_id = path_id(&id)?;
    let payload = json_body(&body)?;
    let store = Arc::clone(&state.store);
    let replaced =
        run_blocking(move || ReplaceGroupOperation::new(store).execute(group_id, &payload))
            .await?;
    Ok(Json(replaced))
}

#[tracing::instrument(skip_all, fields(usuario = %admin.0.username, group_id = %id))]
pub(super) async fn delete_group(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let group_id = path_id(&id)?;
    let store = Arc::clone(&state.store);
    run_blocking(move || DeleteGroupOperation::new(store).execute(group_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
