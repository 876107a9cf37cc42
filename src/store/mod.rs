//! Persistence for event documents.
//!
//! The store is the only shared mutable state in the server. Participant
//! writes go through [`EventStore::modify_participants`], which applies the
//! caller's change atomically per event so that two submissions for
//! different participants cannot overwrite each other.

use std::future::Future;

use crate::models::{Event, EventDraft, EventId, Participants};
use crate::utils::error::AppError;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryEventStore;
pub use postgres::PostgresEventStore;

pub trait EventStore: Clone + Send + Sync + 'static {
    /// Persists a new event and returns it with its store-assigned id.
    fn insert(&self, draft: EventDraft) -> impl Future<Output = Result<Event, AppError>> + Send;

    /// Fetches an event by id. `Ok(None)` when no such event exists.
    fn get(&self, id: EventId) -> impl Future<Output = Result<Option<Event>, AppError>> + Send;

    /// Runs `apply` against the current participant list of event `id` and
    /// persists the result, refreshing the event's `updated_at`.
    ///
    /// No other writer can modify the same event between the read and the
    /// write. If `apply` fails nothing is written and its error is returned.
    /// Fails with [`AppError::NotFound`] when the event does not exist.
    fn modify_participants<F, T>(
        &self,
        id: EventId,
        apply: F,
    ) -> impl Future<Output = Result<T, AppError>> + Send
    where
        F: FnOnce(&mut Participants) -> Result<T, AppError> + Send,
        T: Send;
}
