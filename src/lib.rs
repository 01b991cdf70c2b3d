//! Event Registration Server
//!
//! A REST JSON API for creating capacity-limited events, registering and
//! cancelling user attendance, listing upcoming events and reporting
//! utilization.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        // Events
        .route("/events", post(api::events::create_event))
        .route("/events/upcoming", get(api::events::list_upcoming))
        .route("/events/register", post(api::events::register))
        .route("/events/cancel", post(api::events::cancel))
        .route("/events/:id", get(api::events::get_event))
        .route("/events/:id/stats", get(api::events::event_stats))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .route("/", get(api::health::root))
        .nest("/api", api_routes)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
