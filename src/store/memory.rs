use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::models::{from_document, to_document, Event, EventDraft, EventId, Participants};
use crate::store::EventStore;
use crate::utils::error::AppError;

/// Process-local store holding events as JSON documents.
///
/// Used with `EVENT_STORE=memory` and throughout the test suite. Data is lost
/// when the process exits.
#[derive(Clone, Debug, Default)]
pub struct InMemoryEventStore {
    documents: Arc<RwLock<HashMap<EventId, Value>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl EventStore for InMemoryEventStore {
    async fn insert(&self, draft: EventDraft) -> Result<Event, AppError> {
        let mut documents = self.documents.write().await;
        let mut id = EventId::new();
        while documents.contains_key(&id) {
            id = EventId::new();
        }

        let event = Event::from_draft(id, draft);
        documents.insert(id, to_document(&event)?);
        Ok(event)
    }

    async fn get(&self, id: EventId) -> Result<Option<Event>, AppError> {
        let documents = self.documents.read().await;
        documents.get(&id).cloned().map(from_document).transpose()
    }

    async fn modify_participants<F, T>(&self, id: EventId, apply: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Participants) -> Result<T, AppError> + Send,
        T: Send,
    {
        let mut documents = self.documents.write().await;
        let document = documents.get_mut(&id).ok_or(AppError::NotFound("Event"))?;

        let mut event = from_document(document.clone())?;
        let outcome = apply(&mut event.participants)?;
        event.updated_at = Utc::now();
        *document = to_document(&event)?;

        Ok(outcome)
    }
}
