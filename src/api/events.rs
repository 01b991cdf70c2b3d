//! Events API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::event::{CreateEvent, CreatedEvent, Event, EventDetails, EventStats, RegistrationRequest},
    AppState,
};

/// Confirmation message for register / cancel
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Create an event
#[utoipa::path(
    post,
    path = "/events",
    tag = "events",
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created", body = CreatedEvent),
        (status = 400, description = "Capacity out of range or malformed body", body = ErrorResponse)
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    WithRejection(Json(data), _): WithRejection<Json<CreateEvent>, AppError>,
) -> AppResult<(StatusCode, Json<CreatedEvent>)> {
    let event_id = state.services.events.create(&data).await?;
    Ok((StatusCode::CREATED, Json(CreatedEvent { event_id })))
}

/// Get event by ID, with registered users expanded
#[utoipa::path(
    get,
    path = "/events/{id}",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = EventDetails),
        (status = 404, description = "Event not found", body = ErrorResponse)
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> AppResult<Json<EventDetails>> {
    let event = state.services.events.get_details(id).await?;
    Ok(Json(event))
}

/// Register a user for an event
#[utoipa::path(
    post,
    path = "/events/register",
    tag = "events",
    request_body = RegistrationRequest,
    responses(
        (status = 200, description = "Registration successful", body = MessageResponse),
        (status = 400, description = "Already registered, event full or event in the past", body = ErrorResponse),
        (status = 404, description = "Event or user not found", body = ErrorResponse),
        (status = 409, description = "Event modified concurrently, retry", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<RegistrationRequest>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .events
        .register(request.event_id, request.user_id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Registration successful.".to_string(),
    }))
}

/// Cancel a registration
#[utoipa::path(
    post,
    path = "/events/cancel",
    tag = "events",
    request_body = RegistrationRequest,
    responses(
        (status = 200, description = "Registration cancelled", body = MessageResponse),
        (status = 400, description = "User not registered", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "Event modified concurrently, retry", body = ErrorResponse)
    )
)]
pub async fn cancel(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<RegistrationRequest>, AppError>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .events
        .cancel(request.event_id, request.user_id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Registration cancelled.".to_string(),
    }))
}

/// List upcoming events, soonest first
#[utoipa::path(
    get,
    path = "/events/upcoming",
    tag = "events",
    responses(
        (status = 200, description = "Upcoming events", body = Vec<Event>)
    )
)]
pub async fn list_upcoming(State(state): State<AppState>) -> AppResult<Json<Vec<Event>>> {
    let events = state.services.events.list_upcoming().await?;
    Ok(Json(events))
}

/// Registration statistics for an event
#[utoipa::path(
    get,
    path = "/events/{id}/stats",
    tag = "events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event statistics", body = EventStats),
        (status = 404, description = "Event not found", body = ErrorResponse)
    )
)]
pub async fn event_stats(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, AppError>,
) -> AppResult<Json<EventStats>> {
    let stats = state.services.events.stats(id).await?;
    Ok(Json(stats))
}
