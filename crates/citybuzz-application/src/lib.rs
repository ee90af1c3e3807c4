//! Application layer for the City-Buzz client.
//!
//! The session controller owns authentication state; the reconcilers keep
//! local collections consistent with the server under optimistic updates.

pub mod client;
pub mod events;
pub mod feed;
mod in_flight;
pub mod mutation;
pub mod news;
pub mod notice;
pub mod session;

pub use client::{CityBuzzClient, Gateways};
pub use events::{EventReconciler, EventsState};
pub use feed::{EditDraft, FeedReconciler, FeedState};
pub use mutation::MutationContext;
pub use news::{NewsReader, NewsState};
pub use notice::{Notice, NoticeBoard, NoticeKind};
pub use session::SessionController;
