//! Data models for the event registration server

pub mod event;
pub mod user;

// Re-export commonly used types
pub use event::{CreateEvent, Event, EventDetails, EventStats, RegistrationRequest};
pub use user::User;
