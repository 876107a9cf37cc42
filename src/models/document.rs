//! Conversion between `Event` and its stored/wire JSON document.
//!
//! The document form carries the identifier as a plain string under `_id` and
//! keeps participant passwords. Anything handed back to a caller goes through
//! [`redacted`] or [`ParticipantView`] first.

use serde::Serialize;
use serde_json::Value;

use crate::models::event::Event;
use crate::models::participant::Participant;
use crate::utils::error::AppError;

pub fn to_document(event: &Event) -> Result<Value, AppError> {
    Ok(serde_json::to_value(event)?)
}

pub fn from_document(document: Value) -> Result<Event, AppError> {
    Ok(serde_json::from_value(document)?)
}

/// Copy of `event` with every participant password removed.
pub fn redacted(event: &Event) -> Event {
    let mut public = event.clone();
    public.participants.clear_passwords();
    public
}

/// What a participant may see of their own record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantView {
    pub name: String,
    pub availability: Vec<String>,
}

impl From<&Participant> for ParticipantView {
    fn from(participant: &Participant) -> Self {
        Self {
            name: participant.name.clone(),
            availability: participant.availability.clone(),
        }
    }
}
