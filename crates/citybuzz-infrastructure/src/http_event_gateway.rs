//! `EventGateway` over the REST API.

use crate::api::{ApiClient, Endpoint};
use crate::dto::{AttendeesData, EventsData, TrendingData};
use async_trait::async_trait;
use citybuzz_core::error::Result;
use citybuzz_core::event::{
    Attendees, CreateEventRequest, Event, EventGateway, EventId, EventQuery, EventsPage, Rsvp,
    RsvpStatus, UpdateEventRequest,
};
use serde::Serialize;

#[derive(Serialize)]
struct RsvpBody {
    status: RsvpStatus,
}

#[derive(Clone)]
pub struct HttpEventGateway {
    api: ApiClient,
}

impl HttpEventGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl EventGateway for HttpEventGateway {
    async fn list(&self, city: &str, query: &EventQuery) -> Result<EventsPage> {
        let endpoint = Endpoint::get(format!("/events/{}", city.to_lowercase()))
            .public()
            .query(
                "category",
                query.category.map(|c| c.to_string()).unwrap_or_default(),
            )
            .query("language", query.language)
            .query("page", query.page)
            .query("pageSize", query.page_size);
        let data: EventsData = self.api.fetch(endpoint, "events").await?;
        Ok(data.into())
    }

    async fn trending(&self, city: &str, limit: u32) -> Result<Vec<Event>> {
        let endpoint = Endpoint::get("/events/trending")
            .public()
            .query("city", city)
            .query("limit", limit);
        let data: TrendingData = self.api.fetch(endpoint, "events").await?;
        Ok(data.events.unwrap_or_default())
    }

    async fn create(&self, request: &CreateEventRequest) -> Result<Event> {
        self.api
            .submit(Endpoint::post("/events"), request, "event")
            .await
    }

    async fn update(&self, event_id: EventId, request: &UpdateEventRequest) -> Result<Event> {
        self.api
            .submit(Endpoint::put(format!("/events/{event_id}")), request, "event")
            .await
    }

    async fn delete(&self, event_id: EventId) -> Result<()> {
        self.api
            .call(Endpoint::delete(format!("/events/{event_id}")), None::<&()>)
            .await
    }

    async fn rsvp(&self, event_id: EventId, status: RsvpStatus) -> Result<()> {
        self.api
            .call(
                Endpoint::post(format!("/events/{event_id}/rsvp")),
                Some(&RsvpBody { status }),
            )
            .await
    }

    async fn clear_rsvp(&self, event_id: EventId) -> Result<()> {
        self.api
            .call(Endpoint::delete(format!("/events/{event_id}/rsvp")), None::<&()>)
            .await
    }

    async fn my_rsvps(&self) -> Result<Vec<Rsvp>> {
        let rsvps: Option<Vec<Rsvp>> = self
            .api
            .fetch_optional(Endpoint::get("/events/my-rsvps"))
            .await?;
        Ok(rsvps.unwrap_or_default())
    }

    async fn attendees(&self, event_id: EventId) -> Result<Attendees> {
        let endpoint = Endpoint::get(format!("/events/{event_id}/attendees")).public();
        let data: AttendeesData = self.api.fetch(endpoint, "attendees").await?;
        Ok(data.into())
    }
}
