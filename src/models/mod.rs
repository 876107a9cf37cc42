pub mod document;
pub mod event;
pub mod participant;

pub use document::{from_document, redacted, to_document, ParticipantView};
pub use event::{DateRange, Event, EventDraft, EventId, EventSettings, TimeRange};
pub use participant::{normalize_name, Participant, Participants};
