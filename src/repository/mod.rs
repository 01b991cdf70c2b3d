//! Repository layer for event and user persistence
//!
//! Stores are expressed as traits so the services can run against
//! PostgreSQL in production and against in-memory stores in tests.

pub mod events;
pub mod memory;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CreateEvent, Event, User},
};

/// Persistence for event records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a new event with no registrations
    async fn insert(&self, data: &CreateEvent) -> AppResult<Event>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>>;

    /// Events starting strictly after `now`, ordered by start then location
    async fn find_upcoming(&self, now: DateTime<Utc>) -> AppResult<Vec<Event>>;

    /// Replace the registrations of an event if its revision is still
    /// `expected_revision`. Returns `None` when the event was modified (or
    /// removed) since it was read.
    async fn replace_registrations(
        &self,
        id: Uuid,
        expected_revision: i64,
        registrations: &[Uuid],
    ) -> AppResult<Option<Event>>;
}

/// Read-only access to user records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Users matching any of `ids`, in no particular order
    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<User>>;
}

/// Main repository struct holding the stores
#[derive(Clone)]
pub struct Repository {
    pub events: Arc<dyn EventStore>,
    pub users: Arc<dyn UserStore>,
}

impl Repository {
    /// Create a repository backed by the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            events: Arc::new(events::EventsRepository::new(pool.clone())),
            users: Arc::new(users::UsersRepository::new(pool)),
        }
    }

    /// Create a repository from arbitrary store implementations
    pub fn from_stores(events: Arc<dyn EventStore>, users: Arc<dyn UserStore>) -> Self {
        Self { events, users }
    }
}
