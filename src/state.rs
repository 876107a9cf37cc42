use crate::store::EventStore;

/// Shared handler state. The store is constructed at startup and injected.
#[derive(Clone)]
pub struct AppState<S> {
    pub store: S,
}

impl<S: EventStore> AppState<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}
