//! Route definitions for the Paragliding Alerts evaluation service

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/sites", site_routes())
        .nest("/evaluate", evaluation_routes())
}

/// Site registry routes
fn site_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sites))
        .route("/:site_id", get(handlers::get_site))
        .route("/:site_id/evaluate", post(handlers::evaluate_site))
}

/// Ad-hoc and batch evaluation routes
fn evaluation_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::evaluate_ad_hoc))
        .route("/batch", post(handlers::evaluate_batch))
}
