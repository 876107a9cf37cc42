use serde::Deserialize;
use tracing::warn;

use crate::models::{Event, EventId, Participant, ParticipantView, Participants};
use crate::scheduling::{authorize, required_name};
use crate::store::EventStore;
use crate::utils::error::AppError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParticipantLookupRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Finds the participant called `name`, ignoring case and surrounding
/// whitespace.
pub fn resolve<'a>(participants: &'a Participants, name: &str) -> Result<&'a Participant, AppError> {
    participants.find(name).ok_or(AppError::NotFound("Participant"))
}

pub async fn fetch_event<S: EventStore>(store: &S, id: EventId) -> Result<Event, AppError> {
    store.get(id).await?.ok_or(AppError::NotFound("Event"))
}

/// Returns a participant's own availability once the password gate passes.
///
/// A miss is reported as `NotFound`; clients treat that as "new participant".
pub async fn lookup_participant<S: EventStore>(
    store: &S,
    id: EventId,
    request: ParticipantLookupRequest,
) -> Result<ParticipantView, AppError> {
    let name = required_name(request.name)?;
    let event = fetch_event(store, id).await?;
    let participant = resolve(&event.participants, &name)?;

    if let Err(e) = authorize(participant, request.password.as_deref().unwrap_or_default()) {
        warn!(event_id = %id, participant = %participant.name, "Participant lookup denied");
        return Err(e);
    }

    Ok(ParticipantView::from(participant))
}
