use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use pizzaria_core::Product;
use pizzaria_operations::operations::{CreateProductOperation, ListProductsOperation};

use super::auth::AdminSession;
use super::support::{json_body, run_blocking};
use crate::error::ServerError;
use crate::state::AppState;

pub(super) async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ServerError> {
    let store = Arc::clone(&state.store);
    let products = run_blocking(move || ListProductsOperation::new(store).execute()).await?;
    Ok(Json(products))
}

pub(super) async fn create_product(
    State(state): State<AppState>,
    _admin: AdminSession,
    body: Bytes,
) -> Result<(StatusCode, Json<Product>), ServerError> {
    let payload = json_body(&body)?;
    let store = Arc::clone(&state.store);
    let product =
        run_blocking(move || CreateProductOperation::new(store).execute(&payload)).await?;
    Ok((StatusCode::CREATED, Json(product)))
}
