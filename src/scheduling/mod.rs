//! Event creation, participant identity and availability merging.

use crate::utils::error::AppError;

pub mod factory;
pub mod gate;
pub mod merger;
pub mod resolver;

pub use factory::{build_draft, create_event, CreateEventRequest};
pub use gate::authorize;
pub use merger::{
    merge, submit_availability, AvailabilitySubmission, MergeOutcome, SubmitAvailabilityRequest,
};
pub use resolver::{fetch_event, lookup_participant, resolve, ParticipantLookupRequest};

/// Trims a caller-supplied participant name, rejecting blank ones.
pub(crate) fn required_name(name: Option<String>) -> Result<String, AppError> {
    let name = name.map(|n| n.trim().to_string()).unwrap_or_default();
    if name.is_empty() {
        return Err(AppError::MissingField("name"));
    }
    Ok(name)
}
