//! Route definitions.

use axum::{Router, middleware as axum_middleware, routing::get, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with every route and layer, bound to `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", Router::new().merge(auth_routes()))
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Auth RPCs
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/verify", post(handlers::auth::verify))
        .route("/auth/logout", post(handlers::auth::logout))
}
