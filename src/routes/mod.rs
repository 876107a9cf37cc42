use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{create_event, get_event, get_participant, health_check, submit_availability};
use crate::state::AppState;
use crate::store::EventStore;

pub fn create_routes<S: EventStore>(state: AppState<S>) -> Router {
    let events = Router::new()
        .route("/", post(create_event::<S>))
        .route("/:event_id", get(get_event::<S>))
        .route("/:event_id/participant", post(get_participant::<S>))
        .route("/:event_id/availability", post(submit_availability::<S>));

    Router::new()
        .route("/api/hello", get(health_check))
        .nest("/api/event", events)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
}
