//! Backend contract for events and RSVPs.

use super::model::{
    Attendees, CreateEventRequest, Event, EventId, EventQuery, EventsPage, Rsvp, RsvpStatus,
    UpdateEventRequest,
};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait EventGateway: Send + Sync {
    /// `GET /events/:city` with category, language and paging filters.
    async fn list(&self, city: &str, query: &EventQuery) -> Result<EventsPage>;

    /// `GET /events/trending?city=&limit=`
    async fn trending(&self, city: &str, limit: u32) -> Result<Vec<Event>>;

    /// `POST /events`
    async fn create(&self, request: &CreateEventRequest) -> Result<Event>;

    /// `PUT /events/:id`. Returns the updated record.
    async fn update(&self, event_id: EventId, request: &UpdateEventRequest) -> Result<Event>;

    /// `DELETE /events/:id`
    async fn delete(&self, event_id: EventId) -> Result<()>;

    /// `POST /events/:id/rsvp` with `{status}`
    async fn rsvp(&self, event_id: EventId, status: RsvpStatus) -> Result<()>;

    /// `DELETE /events/:id/rsvp`
    async fn clear_rsvp(&self, event_id: EventId) -> Result<()>;

    /// `GET /events/my-rsvps`
    async fn my_rsvps(&self) -> Result<Vec<Rsvp>>;

    /// `GET /events/:id/attendees`
    async fn attendees(&self, event_id: EventId) -> Result<Attendees>;
}
