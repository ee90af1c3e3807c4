//! Domain layer for the City-Buzz client.
//!
//! Models, gateway traits and the shared error type. Nothing in this crate
//! performs I/O; transports live in `citybuzz-infrastructure` and the
//! reconciliation logic in `citybuzz-application`.

pub mod config;
pub mod confirm;
pub mod error;
pub mod event;
pub mod i18n;
pub mod news;
pub mod post;
pub mod session;
pub mod user;

// Re-export common types
pub use config::ClientConfig;
pub use error::{CityBuzzError, Result};
pub use i18n::{Locale, Message};
