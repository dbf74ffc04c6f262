use axum::Router;
use axum::response::Json;
use axum::routing::get;
use serde_json::{Value, json};

pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<Value> {
    tracing::trace!("health check requested");
    Json(json!({
        "status": "ok",
        "service": "pizzaria-server"
    }))
}
