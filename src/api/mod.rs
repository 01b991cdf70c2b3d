//! API handlers for the event registration REST endpoints

pub mod events;
pub mod health;
pub mod openapi;
