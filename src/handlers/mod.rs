use axum::response::Response;
use serde::Serialize;

use crate::utils::response::ok;

pub mod events;

pub use events::{create_event, get_event, get_participant, submit_availability};

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    message: &'static str,
}

pub async fn health_check() -> Response {
    ok(HealthPayload {
        status: "ok",
        message: "Hello from Plan2Meet backend!",
    })
}
