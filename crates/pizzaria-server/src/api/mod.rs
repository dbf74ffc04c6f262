use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod auth;
mod groups;
mod health;
mod products;
mod support;

pub use auth::AdminSession;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route(
            "/api/grupos-opcionais",
            get(groups::list_groups).post(groups::create_group),
        )
        .route(
            "/api/grupos-opcionais/{id}",
            get(groups::get_group)
                .put(groups::replace_group)
                .delete(groups::delete_group),
        )
        .route(
            "/api/produtos",
            get(products::list_products).post(products::create_product),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .merge(health::router())
}
