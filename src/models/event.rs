//! Event model (capacity-limited events with ordered registrations)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::user::User;

/// Event record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: Option<String>,
    /// Event start
    pub date_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    /// Maximum number of registrations (1..=1000)
    pub capacity: i32,
    /// Registered user ids, in registration order
    pub registrations: Vec<Uuid>,
    /// Incremented on every registrations write
    pub revision: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// An event without a start time is never in the past.
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        matches!(self.date_time, Some(start) if start < now)
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        matches!(self.date_time, Some(start) if start > now)
    }

    pub fn is_registered(&self, user_id: Uuid) -> bool {
        self.registrations.contains(&user_id)
    }

    pub fn is_full(&self) -> bool {
        self.registrations.len() as i64 >= i64::from(self.capacity)
    }

    /// Utilization summary
    pub fn stats(&self) -> EventStats {
        let total_registered = self.registrations.len() as i64;
        EventStats {
            total_registered,
            remaining: i64::from(self.capacity) - total_registered,
            percent_used: format_percent(total_registered, self.capacity),
        }
    }
}

/// Formats `registered / capacity` as a percentage with two decimals, e.g. `"50.00%"`.
///
/// Rounds half up on the exact value of the computed `f64`, so `1/32`
/// (exactly 3.125) gives `"3.13%"` rather than the half-to-even `"3.12%"`.
pub fn format_percent(registered: i64, capacity: i32) -> String {
    let percent = registered as f64 / f64::from(capacity) * 100.0;

    // 60 decimals expand every percentage reachable here exactly
    let exact = format!("{:.60}", percent);
    let thousandths = exact
        .split_once('.')
        .and_then(|(whole, fraction)| fraction.get(..3).map(|f| format!("{whole}{f}")))
        .and_then(|digits| digits.parse::<u64>().ok());

    match thousandths {
        Some(t) => {
            let hundredths = (t + 5) / 10;
            format!("{}.{:02}%", hundredths / 100, hundredths % 100)
        }
        None => format!("{:.2}%", percent),
    }
}

/// Event with registrations resolved to user records
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub id: Uuid,
    pub title: Option<String>,
    pub date_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub capacity: i32,
    /// Registered users, in registration order
    pub registrations: Vec<User>,
    pub revision: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventDetails {
    pub fn new(event: Event, registrations: Vec<User>) -> Self {
        Self {
            id: event.id,
            title: event.title,
            date_time: event.date_time,
            location: event.location,
            capacity: event.capacity,
            registrations,
            revision: event.revision,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// Create event request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvent {
    pub title: Option<String>,
    /// Event start (RFC 3339)
    pub date_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    #[validate(range(min = 1, max = 1000, message = "Capacity must be between 1 and 1000."))]
    pub capacity: i32,
}

/// Create event response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    pub event_id: Uuid,
}

/// Register / cancel request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub event_id: Uuid,
    pub user_id: Uuid,
}

/// Utilization statistics for one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub total_registered: i64,
    /// May only go negative if capacity was violated outside this service
    pub remaining: i64,
    /// Two-decimal percentage with a trailing `%`
    pub percent_used: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(capacity: i32, registered: usize, date_time: Option<DateTime<Utc>>) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            title: Some("Meetup".to_string()),
            date_time,
            location: Some("Hall A".to_string()),
            capacity,
            registrations: (0..registered).map(|_| Uuid::new_v4()).collect(),
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(1, 2), "50.00%");
        assert_eq!(format_percent(2, 2), "100.00%");
        assert_eq!(format_percent(0, 1000), "0.00%");
        assert_eq!(format_percent(1, 3), "33.33%");
        assert_eq!(format_percent(2, 3), "66.67%");
        assert_eq!(format_percent(999, 1000), "99.90%");
    }

    #[test]
    fn test_format_percent_rounds_ties_up() {
        assert_eq!(format_percent(1, 32), "3.13%");
        assert_eq!(format_percent(5, 32), "15.63%");
        assert_eq!(format_percent(1, 8), "12.50%");
    }

    #[test]
    fn test_stats() {
        let stats = event(4, 1, None).stats();
        assert_eq!(stats.total_registered, 1);
        assert_eq!(stats.remaining, 3);
        assert_eq!(stats.percent_used, "25.00%");
    }

    #[test]
    fn test_past_and_upcoming() {
        let now = Utc::now();
        let past = event(1, 0, Some(now - Duration::hours(1)));
        assert!(past.is_past(now));
        assert!(!past.is_upcoming(now));

        let future = event(1, 0, Some(now + Duration::hours(1)));
        assert!(!future.is_past(now));
        assert!(future.is_upcoming(now));

        let starting = event(1, 0, Some(now));
        assert!(!starting.is_past(now));
        assert!(!starting.is_upcoming(now));

        let undated = event(1, 0, None);
        assert!(!undated.is_past(now));
        assert!(!undated.is_upcoming(now));
    }

    #[test]
    fn test_is_full() {
        assert!(!event(2, 1, None).is_full());
        assert!(event(2, 2, None).is_full());
    }

    #[test]
    fn test_capacity_validation() {
        let request = |capacity| CreateEvent {
            title: None,
            date_time: None,
            location: None,
            capacity,
        };
        assert!(request(0).validate().is_err());
        assert!(request(1001).validate().is_err());
        assert!(request(1).validate().is_ok());
        assert!(request(1000).validate().is_ok());
    }

    #[test]
    fn test_create_event_accepts_missing_fields() {
        let data: CreateEvent = serde_json::from_str(r#"{"capacity": 10}"#).unwrap();
        assert!(data.title.is_none());
        assert!(data.date_time.is_none());

        let data: CreateEvent = serde_json::from_str(
            r#"{"title": "Talk", "dateTime": "2030-05-01T18:00:00Z", "location": "Room 1", "capacity": 10}"#,
        )
        .unwrap();
        assert_eq!(data.location.as_deref(), Some("Room 1"));
        assert!(data.date_time.is_some());
    }
}
