//! Event domain module.
//!
//! # Module Structure
//!
//! - `model`: Events, RSVP records, attendee lists and create/update requests
//! - `gateway`: Backend contract for the event and RSVP endpoints

mod gateway;
mod model;

pub use gateway::EventGateway;
pub use model::{
    Attendee, Attendees, CreateEventRequest, Event, EventCategory, EventId, EventQuery,
    EventsPage, Rsvp, RsvpStatus, UpdateEventRequest,
};
