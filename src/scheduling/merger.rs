use serde::Deserialize;
use tracing::{info, warn};

use crate::models::{EventId, Participant, Participants};
use crate::scheduling::{authorize, required_name};
use crate::store::EventStore;
use crate::utils::error::AppError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitAvailabilityRequest {
    pub name: Option<String>,
    pub password: Option<String>,
    /// Absent means an empty submission, which clears availability.
    #[serde(default)]
    pub slots: Vec<String>,
}

/// A validated availability submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilitySubmission {
    pub name: String,
    pub password: String,
    pub slots: Vec<String>,
}

impl TryFrom<SubmitAvailabilityRequest> for AvailabilitySubmission {
    type Error = AppError;

    fn try_from(request: SubmitAvailabilityRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: required_name(request.name)?,
            password: request.password.unwrap_or_default(),
            slots: request.slots,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Created,
    Replaced,
}

/// Applies one submission to an event's participant list.
///
/// An existing participant has their slots replaced wholesale once the
/// password gate passes; their name, password and position stay put. A new
/// name is appended, and the password it came with guards it from then on.
pub fn merge(participants: &mut Participants, submission: AvailabilitySubmission) -> Result<MergeOutcome, AppError> {
    if let Some(existing) = participants.find(&submission.name) {
        authorize(existing, &submission.password)?;
        participants.set_availability(&submission.name, submission.slots);
        return Ok(MergeOutcome::Replaced);
    }

    participants.insert(Participant::new(
        submission.name,
        submission.password,
        submission.slots,
    ));
    Ok(MergeOutcome::Created)
}

pub async fn submit_availability<S: EventStore>(
    store: &S,
    id: EventId,
    submission: AvailabilitySubmission,
) -> Result<MergeOutcome, AppError> {
    let name = submission.name.clone();
    let slots = submission.slots.len();

    let result = store
        .modify_participants(id, move |participants| merge(participants, submission))
        .await;

    match &result {
        Ok(MergeOutcome::Created) => {
            info!(event_id = %id, participant = %name, slots, "Participant added");
        }
        Ok(MergeOutcome::Replaced) => {
            info!(event_id = %id, participant = %name, slots, "Availability replaced");
        }
        Err(AppError::IncorrectPassword) => {
            warn!(event_id = %id, participant = %name, "Availability submission denied");
        }
        Err(_) => {}
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::{create_event, fetch_event, CreateEventRequest};
    use crate::store::InMemoryEventStore;
    use serde_json::json;

    fn slots(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn submission(name: &str, password: &str, values: &[&str]) -> AvailabilitySubmission {
        AvailabilitySubmission {
            name: name.to_string(),
            password: password.to_string(),
            slots: slots(values),
        }
    }

    async fn new_event(store: &InMemoryEventStore) -> EventId {
        let request: CreateEventRequest = serde_json::from_value(json!({
            "date_range": {"start": "2024-01-01", "end": "2024-01-03"},
            "time_range": {"from": "09:00", "to": "17:00"}
        }))
        .unwrap();
        create_event(store, request).await.unwrap().id
    }

    #[test]
    fn test_new_name_is_appended() {
        let mut participants = Participants::from(vec![
            Participant::new("Alice", "", vec![]),
            Participant::new("Bob", "pw", vec![]),
        ]);
        let outcome = merge(&mut participants, submission("Carol", "c", &["s1"])).unwrap();

        assert_eq!(outcome, MergeOutcome::Created);
        assert_eq!(participants.len(), 3);
        let carol = &participants.as_slice()[2];
        assert_eq!(carol.name, "Carol");
        assert_eq!(carol.password, "c");
        assert_eq!(carol.availability, slots(&["s1"]));
    }

    #[test]
    fn test_resubmission_replaces_slots_in_place() {
        let mut participants = Participants::from(vec![
            Participant::new("Alice", "pw", slots(&["old-1", "old-2"])),
            Participant::new("Bob", "", vec![]),
        ]);
        let outcome = merge(&mut participants, submission(" ALICE", "pw", &["new"])).unwrap();

        assert_eq!(outcome, MergeOutcome::Replaced);
        assert_eq!(participants.len(), 2);
        let alice = &participants.as_slice()[0];
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.password, "pw");
        assert_eq!(alice.availability, slots(&["new"]));
    }

    #[test]
    fn test_wrong_password_leaves_slots_untouched() {
        let mut participants = Participants::from(vec![Participant::new("Alice", "pw", slots(&["keep"]))]);
        let result = merge(&mut participants, submission("alice", "nope", &[]));

        assert!(matches!(result, Err(AppError::IncorrectPassword)));
        assert_eq!(participants.find("Alice").unwrap().availability, slots(&["keep"]));
    }

    #[test]
    fn test_password_is_ignored_when_none_was_set() {
        let mut participants = Participants::from(vec![Participant::new("Alice", "", slots(&["a"]))]);
        merge(&mut participants, submission("Alice", "x", &[])).unwrap();

        let alice = participants.find("Alice").unwrap();
        assert!(alice.availability.is_empty());
        assert!(!alice.has_password());
    }

    #[test]
    fn test_blank_name_is_missing_field() {
        let request = SubmitAvailabilityRequest {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            AvailabilitySubmission::try_from(request),
            Err(AppError::MissingField("name"))
        ));
    }

    #[test]
    fn test_request_defaults() {
        let request: SubmitAvailabilityRequest = serde_json::from_value(json!({"name": " Dana "})).unwrap();
        let submission = AvailabilitySubmission::try_from(request).unwrap();
        assert_eq!(submission.name, "Dana");
        assert_eq!(submission.password, "");
        assert!(submission.slots.is_empty());
    }

    #[test]
    fn test_non_list_slots_do_not_deserialize() {
        let result = serde_json::from_value::<SubmitAvailabilityRequest>(json!({"name": "A", "slots": "9am"}));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_submit_persists_and_keeps_others() {
        let store = InMemoryEventStore::new();
        let id = new_event(&store).await;

        submit_availability(&store, id, submission("Alice", "", &["a1"])).await.unwrap();
        submit_availability(&store, id, submission("Bob", "b", &["b1"])).await.unwrap();
        submit_availability(&store, id, submission("alice", "", &["a2"])).await.unwrap();

        let event = fetch_event(&store, id).await.unwrap();
        let stored: Vec<(&str, &[String])> = event
            .participants
            .iter()
            .map(|p| (p.name.as_str(), p.availability.as_slice()))
            .collect();
        assert_eq!(stored, vec![("Alice", &slots(&["a2"])[..]), ("Bob", &slots(&["b1"])[..])]);
    }

    #[tokio::test]
    async fn test_submit_refreshes_updated_at() {
        let store = InMemoryEventStore::new();
        let id = new_event(&store).await;
        let before = fetch_event(&store, id).await.unwrap();

        submit_availability(&store, id, submission("Alice", "", &["a1"])).await.unwrap();

        let after = fetch_event(&store, id).await.unwrap();
        assert!(after.updated_at >= before.updated_at);
        assert_eq!(after.created_at, before.created_at);
    }

    #[tokio::test]
    async fn test_denied_submit_does_not_touch_updated_at() {
        let store = InMemoryEventStore::new();
        let id = new_event(&store).await;
        submit_availability(&store, id, submission("Alice", "pw", &["a1"])).await.unwrap();
        let before = fetch_event(&store, id).await.unwrap();

        let result = submit_availability(&store, id, submission("Alice", "bad", &[])).await;
        assert!(matches!(result, Err(AppError::IncorrectPassword)));

        let after = fetch_event(&store, id).await.unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_submit_to_unknown_event_is_not_found() {
        let store = InMemoryEventStore::new();
        let result = submit_availability(&store, EventId::new(), submission("Alice", "", &[])).await;
        assert!(matches!(result, Err(AppError::NotFound("Event"))));
    }

    #[tokio::test]
    async fn test_concurrent_new_participants_are_all_kept() {
        let store = InMemoryEventStore::new();
        let id = new_event(&store).await;

        let mut handles = Vec::new();
        for n in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                submit_availability(&store, id, submission(&format!("guest {n}"), "", &["s"])).await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), MergeOutcome::Created);
        }

        assert_eq!(fetch_event(&store, id).await.unwrap().participants.len(), 16);
    }
}
