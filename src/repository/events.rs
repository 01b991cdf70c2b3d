//! Events repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CreateEvent, Event},
};

use super::EventStore;

#[derive(Clone)]
pub struct EventsRepository {
    pool: Pool<Postgres>,
}

impl EventsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for EventsRepository {
    /// Create an event
    async fn insert(&self, data: &CreateEvent) -> AppResult<Event> {
        let row = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (id, title, date_time, location, capacity, registrations)
            VALUES ($1, $2, $3, $4, $5, '{}')
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.title)
        .bind(data.date_time)
        .bind(&data.location)
        .bind(data.capacity)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Get event by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>> {
        let row = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// List events that have not started yet
    async fn find_upcoming(&self, now: DateTime<Utc>) -> AppResult<Vec<Event>> {
        // "C" collation keeps the location tiebreak a plain byte-wise comparison
        let rows = sqlx::query_as::<_, Event>(
            r#"
            SELECT * FROM events
            WHERE date_time > $1
            ORDER BY date_time ASC, location COLLATE "C" ASC NULLS FIRST
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Compare-and-swap on the revision column
    async fn replace_registrations(
        &self,
        id: Uuid,
        expected_revision: i64,
        registrations: &[Uuid],
    ) -> AppResult<Option<Event>> {
        let row = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET registrations = $3, revision = revision + 1, updated_at = NOW()
            WHERE id = $1 AND revision = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(expected_revision)
        .bind(registrations)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
