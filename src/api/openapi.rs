//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{events, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Event Registration API",
        version = "0.1.0",
        description = "Capacity-limited events with user registration"
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        // Events
        events::create_event,
        events::get_event,
        events::register,
        events::cancel,
        events::list_upcoming,
        events::event_stats,
    ),
    components(
        schemas(
            // Events
            crate::models::event::Event,
            crate::models::event::EventDetails,
            crate::models::event::CreateEvent,
            crate::models::event::CreatedEvent,
            crate::models::event::RegistrationRequest,
            crate::models::event::EventStats,
            crate::models::user::User,
            events::MessageResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "events", description = "Event creation and registration")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
