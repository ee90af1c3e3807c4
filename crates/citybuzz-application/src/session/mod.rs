//! Session bootstrap and authentication state.

mod controller;

pub use controller::SessionController;
