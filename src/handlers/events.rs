//! `/api/event` endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;

use crate::models::{redacted, EventId};
use crate::scheduling::{
    self, AvailabilitySubmission, CreateEventRequest, ParticipantLookupRequest,
    SubmitAvailabilityRequest,
};
use crate::state::AppState;
use crate::store::EventStore;
use crate::utils::error::AppError;
use crate::utils::response::{created, ok, success};

/// POST /api/event
pub async fn create_event<S: EventStore>(
    State(state): State<AppState<S>>,
    body: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = body?;
    let event = scheduling::create_event(&state.store, request).await?;
    Ok(created(event))
}

/// GET /api/event/:id
pub async fn get_event<S: EventStore>(
    State(state): State<AppState<S>>,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let id: EventId = event_id.parse()?;
    let event = scheduling::fetch_event(&state.store, id).await?;
    Ok(ok(redacted(&event)))
}

/// POST /api/event/:id/participant
pub async fn get_participant<S: EventStore>(
    State(state): State<AppState<S>>,
    Path(event_id): Path<String>,
    body: Result<Json<ParticipantLookupRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let id: EventId = event_id.parse()?;
    let Json(request) = body?;
    let view = scheduling::lookup_participant(&state.store, id, request).await?;
    Ok(ok(view))
}

/// POST /api/event/:id/availability
pub async fn submit_availability<S: EventStore>(
    State(state): State<AppState<S>>,
    Path(event_id): Path<String>,
    body: Result<Json<SubmitAvailabilityRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let id: EventId = event_id.parse()?;
    let Json(request) = body?;
    let submission = AvailabilitySubmission::try_from(request)?;
    scheduling::submit_availability(&state.store, id, submission).await?;
    Ok(success())
}
