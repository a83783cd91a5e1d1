//! HTTP handlers for relay-service.

pub mod chat;
pub mod health;
pub mod lead;

pub use chat::chat;
pub use health::{health_check, index, metrics_endpoint};
pub use lead::lead;
