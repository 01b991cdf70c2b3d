//! Events service
//!
//! Registration writes go through [`EventStore::replace_registrations`],
//! which only succeeds if the event revision read at the start of the
//! operation is still current. A rejected write re-reads the event and
//! re-runs every check, up to `max_attempts` times.
//!
//! [`EventStore::replace_registrations`]: crate::repository::EventStore::replace_registrations

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::RegistrationConfig,
    error::{AppError, AppResult},
    models::{CreateEvent, Event, EventDetails, EventStats, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct EventsService {
    repository: Repository,
    max_attempts: u32,
}

impl EventsService {
    pub fn new(repository: Repository, config: RegistrationConfig) -> Self {
        Self {
            repository,
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Create an event and return its id
    pub async fn create(&self, data: &CreateEvent) -> AppResult<Uuid> {
        data.validate()?;
        let event = self.repository.events.insert(data).await?;
        tracing::info!(event_id = %event.id, capacity = event.capacity, "Event created");
        Ok(event.id)
    }

    /// Get an event with its registrations resolved to users
    pub async fn get_details(&self, id: Uuid) -> AppResult<EventDetails> {
        let event = self.get_by_id(id).await?;

        let mut users: HashMap<Uuid, User> = self
            .repository
            .users
            .find_many(&event.registrations)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut registrations = Vec::with_capacity(event.registrations.len());
        for user_id in &event.registrations {
            match users.remove(user_id) {
                Some(user) => registrations.push(user),
                None => tracing::warn!(
                    event_id = %id,
                    user_id = %user_id,
                    "Registered user no longer exists, omitting from event details"
                ),
            }
        }

        Ok(EventDetails::new(event, registrations))
    }

    /// Register a user for an event
    pub async fn register(&self, event_id: Uuid, user_id: Uuid) -> AppResult<()> {
        for attempt in 1..=self.max_attempts {
            let (event, user) = tokio::try_join!(
                self.repository.events.find_by_id(event_id),
                self.repository.users.find_by_id(user_id),
            )?;
            let (Some(event), Some(_)) = (event, user) else {
                return Err(AppError::NotFound("Event or user not found.".to_string()));
            };

            if event.is_registered(user_id) {
                return Err(AppError::Conflict("User already registered.".to_string()));
            }
            if event.is_full() {
                return Err(AppError::CapacityExceeded("Event is full.".to_string()));
            }
            if event.is_past(Utc::now()) {
                return Err(AppError::PastEvent("Cannot register past events.".to_string()));
            }

            let mut registrations = event.registrations.clone();
            registrations.push(user_id);

            if self.write_registrations(&event, &registrations, attempt).await? {
                tracing::info!(event_id = %event_id, user_id = %user_id, "User registered");
                return Ok(());
            }
        }

        Err(self.retry_exhausted())
    }

    /// Cancel a user's registration
    pub async fn cancel(&self, event_id: Uuid, user_id: Uuid) -> AppResult<()> {
        for attempt in 1..=self.max_attempts {
            let event = self.get_by_id(event_id).await?;

            let Some(idx) = event.registrations.iter().position(|id| *id == user_id) else {
                return Err(AppError::NotRegistered("User not registered.".to_string()));
            };

            let mut registrations = event.registrations.clone();
            registrations.remove(idx);

            if self.write_registrations(&event, &registrations, attempt).await? {
                tracing::info!(event_id = %event_id, user_id = %user_id, "Registration cancelled");
                return Ok(());
            }
        }

        Err(self.retry_exhausted())
    }

    /// Events that have not started yet, soonest first
    pub async fn list_upcoming(&self) -> AppResult<Vec<Event>> {
        let events = self.repository.events.find_upcoming(Utc::now()).await?;
        tracing::debug!(count = events.len(), "Listed upcoming events");
        Ok(events)
    }

    /// Utilization statistics for an event
    pub async fn stats(&self, id: Uuid) -> AppResult<EventStats> {
        Ok(self.get_by_id(id).await?.stats())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Event> {
        self.repository
            .events
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found.".to_string()))
    }

    /// Returns `false` if the event changed since it was read
    async fn write_registrations(
        &self,
        event: &Event,
        registrations: &[Uuid],
        attempt: u32,
    ) -> AppResult<bool> {
        let written = self
            .repository
            .events
            .replace_registrations(event.id, event.revision, registrations)
            .await?;
        if written.is_none() {
            tracing::warn!(
                event_id = %event.id,
                revision = event.revision,
                attempt,
                max_attempts = self.max_attempts,
                "Event modified concurrently, registration write rejected"
            );
        }
        Ok(written.is_some())
    }

    fn retry_exhausted(&self) -> AppError {
        AppError::RetryableConflict(
            "Event was modified concurrently, please retry.".to_string(),
        )
    }
}
