use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::models::event::{DEFAULT_TIME_STEP_MINUTES, DEFAULT_TITLE};
use crate::models::{DateRange, Event, EventDraft, EventSettings, TimeRange};
use crate::store::EventStore;
use crate::utils::error::AppError;

/// Organizer input for a new event. Only the two ranges are required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date_range: Option<DateRange>,
    pub time_range: Option<TimeRange>,
    pub time_step_minutes: Option<NonZeroU32>,
    pub settings: Option<EventSettings>,
}

/// Largest step any store can hold (a Postgres `INTEGER`).
pub const MAX_TIME_STEP_MINUTES: u32 = i32::MAX as u32;

/// Applies defaults to `request`. Range ordering is not checked.
pub fn build_draft(request: CreateEventRequest, now: DateTime<Utc>) -> Result<EventDraft, AppError> {
    let date_range = request.date_range.ok_or(AppError::MissingField("date_range"))?;
    let time_range = request.time_range.ok_or(AppError::MissingField("time_range"))?;
    let time_step_minutes = request.time_step_minutes.unwrap_or(DEFAULT_TIME_STEP_MINUTES);
    if time_step_minutes.get() > MAX_TIME_STEP_MINUTES {
        return Err(AppError::InvalidRequest(format!(
            "time_step_minutes must not exceed {MAX_TIME_STEP_MINUTES}"
        )));
    }

    Ok(EventDraft {
        title: request.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: request.description.unwrap_or_default(),
        date_range,
        time_range,
        time_step_minutes,
        settings: request.settings.unwrap_or_default(),
        created_at: now,
    })
}

pub async fn create_event<S: EventStore>(store: &S, request: CreateEventRequest) -> Result<Event, AppError> {
    let draft = build_draft(request, Utc::now())?;
    let event = store.insert(draft).await?;

    info!(event_id = %event.id, title = %event.title, "Event created");
    Ok(event)
}
