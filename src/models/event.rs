use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::participant::Participants;
use crate::utils::error::AppError;

pub const DEFAULT_TITLE: &str = "Untitled Event";
pub const DEFAULT_TIME_STEP_MINUTES: NonZeroU32 = match NonZeroU32::new(30) {
    Some(step) => step,
    None => panic!("default time step must be positive"),
};

/// Opaque event identifier. Travels as a plain string on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for EventId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for EventId {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| AppError::InvalidId(raw.to_string()))
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(with = "clock")]
    pub from: NaiveTime,
    #[serde(with = "clock")]
    pub to: NaiveTime,
}

/// Named per-event options. Only `hide_others_until_submit` is understood by
/// the server; anything else the client sends is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSettings {
    #[serde(default)]
    pub hide_others_until_submit: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An event before the store has given it an identity.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date_range: DateRange,
    pub time_range: TimeRange,
    pub time_step_minutes: NonZeroU32,
    pub settings: EventSettings,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date_range: DateRange,
    pub time_range: TimeRange,
    pub time_step_minutes: NonZeroU32,
    #[serde(default)]
    pub settings: EventSettings,
    #[serde(default)]
    pub participants: Participants,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn from_draft(id: EventId, draft: EventDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            date_range: draft.date_range,
            time_range: draft.time_range,
            time_step_minutes: draft.time_step_minutes,
            settings: draft.settings,
            participants: Participants::default(),
            created_at: draft.created_at,
            updated_at: draft.created_at,
        }
    }
}

/// `HH:MM` on output; `HH:MM` or `HH:MM:SS` accepted on input.
mod clock {
    use chrono::NaiveTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";
    const FORMAT_WITH_SECONDS: &str = "%H:%M:%S";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, FORMAT_WITH_SECONDS))
            .map_err(|e| D::Error::custom(format!("invalid time of day '{raw}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_id_parses_uuid_strings() {
        let id = EventId::new();
        let parsed: EventId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_malformed_event_id_is_invalid_id() {
        let err = "not-an-id".parse::<EventId>().unwrap_err();
        assert!(matches!(err, AppError::InvalidId(raw) if raw == "not-an-id"));
    }

    #[test]
    fn test_time_range_uses_hours_and_minutes() {
        let range: TimeRange = serde_json::from_value(json!({"from": "09:00", "to": "17:30:00"})).unwrap();
        assert_eq!(range.from, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(range.to, NaiveTime::from_hms_opt(17, 30, 0).unwrap());
        assert_eq!(
            serde_json::to_value(range).unwrap(),
            json!({"from": "09:00", "to": "17:30"})
        );
    }

    #[test]
    fn test_time_range_rejects_garbage() {
        let result = serde_json::from_value::<TimeRange>(json!({"from": "nine", "to": "17:00"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_keep_unknown_options() {
        let settings: EventSettings =
            serde_json::from_value(json!({"hide_others_until_submit": true, "theme": "dark"})).unwrap();
        assert!(settings.hide_others_until_submit);
        assert_eq!(settings.extra.get("theme"), Some(&json!("dark")));

        let back = serde_json::to_value(&settings).unwrap();
        assert_eq!(back, json!({"hide_others_until_submit": true, "theme": "dark"}));
    }

    #[test]
    fn test_settings_default_to_visible_others() {
        let settings: EventSettings = serde_json::from_value(json!({})).unwrap();
        assert!(!settings.hide_others_until_submit);
        assert!(settings.extra.is_empty());
    }
}
