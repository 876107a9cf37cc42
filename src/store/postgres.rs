use std::num::NonZeroU32;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::de::Error as _;
use serde_json::Value;
use sqlx::migrate::MigrateError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{
    DateRange, Event, EventDraft, EventId, EventSettings, Participant, Participants, TimeRange,
};
use crate::store::EventStore;
use crate::utils::error::AppError;

const EVENT_COLUMNS: &str = "id, title, description, date_start, date_end, time_from, time_to, \
     time_step_minutes, settings, participants, created_at, updated_at";

/// Events stored one row each, with settings and participants as JSONB.
#[derive(Clone)]
pub struct PostgresEventStore {
    pool: PgPool,
}

impl PostgresEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[derive(FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: String,
    date_start: NaiveDate,
    date_end: NaiveDate,
    time_from: NaiveTime,
    time_to: NaiveTime,
    time_step_minutes: i32,
    // Decoded in `TryFrom` so bad JSON reads as a corrupt document
    settings: Json<Value>,
    participants: Json<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn decode_participants(stored: Value) -> Result<Participants, AppError> {
    let entries: Vec<Participant> = serde_json::from_value(stored)?;
    Ok(Participants::from(entries))
}

impl TryFrom<EventRow> for Event {
    type Error = AppError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let time_step_minutes = u32::try_from(row.time_step_minutes)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                serde_json::Error::custom(format!(
                    "time_step_minutes must be positive, found {}",
                    row.time_step_minutes
                ))
            })?;

        Ok(Event {
            id: EventId::from(row.id),
            title: row.title,
            description: row.description,
            date_range: DateRange {
                start: row.date_start,
                end: row.date_end,
            },
            time_range: TimeRange {
                from: row.time_from,
                to: row.time_to,
            },
            time_step_minutes,
            settings: serde_json::from_value::<EventSettings>(row.settings.0)?,
            participants: decode_participants(row.participants.0)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl EventStore for PostgresEventStore {
    async fn insert(&self, draft: EventDraft) -> Result<Event, AppError> {
        let time_step = i32::try_from(draft.time_step_minutes.get()).map_err(|_| {
            AppError::InvalidRequest("time_step_minutes is too large".to_string())
        })?;

        let row: EventRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO events
                (title, description, date_start, date_end, time_from, time_to,
                 time_step_minutes, settings, participants, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, '[]'::jsonb, $9, $9)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.date_range.start)
        .bind(draft.date_range.end)
        .bind(draft.time_range.from)
        .bind(draft.time_range.to)
        .bind(time_step)
        .bind(Json(&draft.settings))
        .bind(draft.created_at)
        .fetch_one(&self.pool)
        .await?;

        Event::try_from(row)
    }

    async fn get(&self, id: EventId) -> Result<Option<Event>, AppError> {
        let row: Option<EventRow> =
            sqlx::query_as(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await?;

        row.map(Event::try_from).transpose()
    }

    async fn modify_participants<F, T>(&self, id: EventId, apply: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Participants) -> Result<T, AppError> + Send,
        T: Send,
    {
        let mut tx = self.pool.begin().await?;

        // Row lock serialises concurrent writers to the same event
        let row: Option<(Json<Value>,)> =
            sqlx::query_as("SELECT participants FROM events WHERE id = $1 FOR UPDATE")
                .bind(id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;

        let Some((Json(stored),)) = row else {
            return Err(AppError::NotFound("Event"));
        };

        let mut participants = decode_participants(stored)?;
        let outcome = apply(&mut participants)?;

        sqlx::query("UPDATE events SET participants = $2, updated_at = $3 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(Json(participants.as_slice()))
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(outcome)
    }
}
