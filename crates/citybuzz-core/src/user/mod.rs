//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: User identity and auth request models
//! - `gateway`: Backend contract for the auth endpoints

mod gateway;
mod model;

// Re-export public API
pub use gateway::AuthGateway;
pub use model::{Credentials, RegisterRequest, User, UserId};
