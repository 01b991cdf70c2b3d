//! In-memory stores
//!
//! Keep records in a `HashMap` behind a `RwLock`, for tests and local
//! experiments that should not need PostgreSQL.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{CreateEvent, Event, User},
};

use super::{EventStore, UserStore};

/// In-memory event store
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an event as-is (useful for testing)
    pub async fn seed(&self, event: Event) {
        self.events.write().await.insert(event.id, event);
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn insert(&self, data: &CreateEvent) -> AppResult<Event> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: data.title.clone(),
            date_time: data.date_time,
            location: data.location.clone(),
            capacity: data.capacity,
            registrations: Vec::new(),
            revision: 0,
            created_at: now,
            updated_at: now,
        };
        self.events.write().await.insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn find_upcoming(&self, now: DateTime<Utc>) -> AppResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .read()
            .await
            .values()
            .filter(|e| e.is_upcoming(now))
            .cloned()
            .collect();
        events.sort_by(|a, b| {
            a.date_time
                .cmp(&b.date_time)
                .then_with(|| a.location.cmp(&b.location))
        });
        Ok(events)
    }

    async fn replace_registrations(
        &self,
        id: Uuid,
        expected_revision: i64,
        registrations: &[Uuid],
    ) -> AppResult<Option<Event>> {
        let mut events = self.events.write().await;
        let Some(event) = events.get_mut(&id) else {
            return Ok(None);
        };
        if event.revision != expected_revision {
            return Ok(None);
        }
        event.registrations = registrations.to_vec();
        event.revision += 1;
        event.updated_at = Utc::now();
        Ok(Some(event.clone()))
    }
}

/// In-memory user store
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a user
    pub async fn seed(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn remove(&self, id: Uuid) {
        self.users.write().await.remove(&id);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }
}
