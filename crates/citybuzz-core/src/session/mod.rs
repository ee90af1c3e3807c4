//! Session domain module.
//!
//! Holds the client-side view of the authentication state. The state machine
//! that drives it lives in the application layer.

mod model;

pub use model::{Session, SessionPhase};
