//! Event listings and RSVPs.

use crate::in_flight::InFlight;
use crate::mutation::MutationContext;
use citybuzz_core::confirm::Confirm;
use citybuzz_core::error::{CityBuzzError, Result};
use citybuzz_core::event::{
    Attendees, CreateEventRequest, Event, EventCategory, EventGateway, EventId, EventQuery,
    RsvpStatus, UpdateEventRequest,
};
use citybuzz_core::i18n::Message;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
pub struct EventsState {
    /// Events happening now
    pub current: Vec<Event>,
    pub upcoming: Vec<Event>,
    pub total: u32,
    pub trending: Vec<Event>,
    /// The current user's answers, keyed by event
    pub rsvps: HashMap<EventId, RsvpStatus>,
    pub query: EventQuery,
    pub open_menu: Option<EventId>,
    /// Bumped whenever server data replaces local state
    generation: u64,
}

impl EventsState {
    /// The same event can appear in several lists; every copy is updated.
    fn for_each_copy(&mut self, event_id: EventId, mut apply: impl FnMut(&mut Event)) {
        self.current
            .iter_mut()
            .chain(self.upcoming.iter_mut())
            .chain(self.trending.iter_mut())
            .filter(|e| e.id == event_id)
            .for_each(|e| apply(e));
    }

    fn find(&self, event_id: EventId) -> Option<&Event> {
        self.current
            .iter()
            .chain(self.upcoming.iter())
            .chain(self.trending.iter())
            .find(|e| e.id == event_id)
    }

    fn move_rsvp(&mut self, event_id: EventId, from: Option<RsvpStatus>, to: Option<RsvpStatus>) {
        self.for_each_copy(event_id, |e| e.apply_rsvp_change(from, to));
        match to {
            Some(status) => self.rsvps.insert(event_id, status),
            None => self.rsvps.remove(&event_id),
        };
    }

    fn remove(&mut self, event_id: EventId) {
        self.current.retain(|e| e.id != event_id);
        self.upcoming.retain(|e| e.id != event_id);
        self.trending.retain(|e| e.id != event_id);
        self.rsvps.remove(&event_id);
        if self.open_menu == Some(event_id) {
            self.open_menu = None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EventAction {
    Rsvp(EventId),
    Create,
    Update(EventId),
    Delete(EventId),
}

/// Keeps the city's event listings and the user's RSVPs in step with the
/// server.
///
/// RSVPs are toggles: answering with the status already held clears it.
/// Counters move before the server answers and move back on failure.
pub struct EventReconciler {
    gateway: Arc<dyn EventGateway>,
    ctx: MutationContext,
    city: String,
    state: RwLock<EventsState>,
    in_flight: InFlight<EventAction>,
}

impl EventReconciler {
    pub fn new(gateway: Arc<dyn EventGateway>, ctx: MutationContext, city: impl Into<String>) -> Self {
        Self {
            gateway,
            ctx,
            city: city.into(),
            state: RwLock::new(EventsState::default()),
            in_flight: InFlight::new(),
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Reloads the first page of the listing for `category` (all if `None`).
    ///
    /// For a logged-in user the RSVP map is reloaded too.
    pub async fn refresh(&self, category: Option<EventCategory>) -> Result<()> {
        let query = EventQuery {
            category,
            language: self.ctx.locale(),
            ..EventQuery::default()
        };

        match self.gateway.list(&self.city, &query).await {
            Ok(page) => {
                tracing::debug!(
                    current = page.current.len(),
                    upcoming = page.upcoming.len(),
                    "events refreshed"
                );
                let mut state = self.state.write().await;
                state.current = page.current;
                state.upcoming = page.upcoming;
                state.total = page.total;
                state.query = query;
                state.generation += 1;
            }
            Err(err) => {
                self.ctx.report("load events", &err, Message::LoadEventsFailed).await;
                return Err(err);
            }
        }

        if let Err(err) = self.load_my_rsvps().await {
            tracing::warn!(error = %err, "could not load RSVPs");
        }
        Ok(())
    }

    /// Fetches the next page of the current listing. Returns the number of new events.
    pub async fn load_more(&self) -> Result<usize> {
        let query = {
            let state = self.state.read().await;
            EventQuery {
                page: state.query.page + 1,
                ..state.query.clone()
            }
        };

        match self.gateway.list(&self.city, &query).await {
            Ok(page) => {
                let mut state = self.state.write().await;
                let known: HashSet<EventId> = state
                    .current
                    .iter()
                    .chain(state.upcoming.iter())
                    .map(|e| e.id)
                    .collect();
                let mut added = 0;
                for event in page.current {
                    if !known.contains(&event.id) {
                        state.current.push(event);
                        added += 1;
                    }
                }
                for event in page.upcoming {
                    if !known.contains(&event.id) {
                        state.upcoming.push(event);
                        added += 1;
                    }
                }
                state.query = query;
                Ok(added)
            }
            Err(err) => {
                self.ctx.report("load events", &err, Message::LoadEventsFailed).await;
                Err(err)
            }
        }
    }

    pub async fn load_trending(&self, limit: u32) -> Result<Vec<Event>> {
        match self.gateway.trending(&self.city, limit).await {
            Ok(events) => {
                let mut state = self.state.write().await;
                state.trending = events.clone();
                state.generation += 1;
                Ok(events)
            }
            Err(err) => {
                self.ctx.report("load trending", &err, Message::LoadEventsFailed).await;
                Err(err)
            }
        }
    }

    /// Replaces the RSVP map with the server's. Anonymous users have none.
    pub async fn load_my_rsvps(&self) -> Result<()> {
        if !self.ctx.session.is_authenticated().await {
            self.forget_rsvps().await;
            return Ok(());
        }
        let rsvps = self.gateway.my_rsvps().await?;
        let mut state = self.state.write().await;
        state.rsvps = rsvps.into_iter().map(|r| (r.event_id, r.status)).collect();
        state.generation += 1;
        Ok(())
    }

    /// Drops the previous user's answers without asking the server.
    pub async fn forget_rsvps(&self) {
        let mut state = self.state.write().await;
        state.rsvps.clear();
        state.generation += 1;
    }

    /// Answers an event, or clears the answer if `status` is already held.
    ///
    /// Returns the status now held. Anonymous users get the login prompt and
    /// nothing is sent. A failed answer is rolled back unless a refetch
    /// already replaced the optimistic counters with the server's.
    pub async fn rsvp(&self, event_id: EventId, status: RsvpStatus) -> Result<Option<RsvpStatus>> {
        self.ctx.require_user(Message::LoginToRsvp).await?;
        let _guard = self
            .in_flight
            .try_begin(EventAction::Rsvp(event_id))
            .ok_or_else(|| CityBuzzError::in_flight("rsvp"))?;

        let (previous, target, generation) = {
            let mut state = self.state.write().await;
            let previous = state.rsvps.get(&event_id).copied();
            let target = if previous == Some(status) {
                None
            } else {
                Some(status)
            };
            state.move_rsvp(event_id, previous, target);
            (previous, target, state.generation)
        };

        let result = match target {
            Some(next) => self.ctx.run("rsvp", self.gateway.rsvp(event_id, next)).await,
            None => self.ctx.run("clear rsvp", self.gateway.clear_rsvp(event_id)).await,
        };

        match result {
            Ok(()) => Ok(target),
            // Nothing to clear on the server: already where we were heading
            Err(CityBuzzError::Api { status: 404, .. }) if target.is_none() => Ok(None),
            Err(err) => {
                let mut state = self.state.write().await;
                if state.generation == generation {
                    state.move_rsvp(event_id, target, previous);
                } else {
                    tracing::debug!(%event_id, "listing refetched while answering, keeping server counters");
                }
                drop(state);
                self.ctx.report("rsvp", &err, Message::RsvpFailed).await;
                Err(err)
            }
        }
    }

    /// Creates an event and inserts it at the head of the current list.
    pub async fn create_event(&self, request: &CreateEventRequest) -> Result<Event> {
        request.validate().map_err(CityBuzzError::validation)?;
        self.ctx.require_user(Message::LoginToCreateEvent).await?;
        let _guard = self
            .in_flight
            .try_begin(EventAction::Create)
            .ok_or_else(|| CityBuzzError::in_flight("create event"))?;

        match self.ctx.run("create event", self.gateway.create(request)).await {
            Ok(event) => {
                tracing::info!(event_id = %event.id, title = %event.title, "event created");
                self.state.write().await.current.insert(0, event.clone());
                Ok(event)
            }
            Err(err) => {
                self.ctx.report("create event", &err, Message::CreateEventFailed).await;
                Err(err)
            }
        }
    }

    /// Updates an event and replaces every local copy with the server's record.
    pub async fn update_event(&self, event_id: EventId, request: &UpdateEventRequest) -> Result<Event> {
        request.validate().map_err(CityBuzzError::validation)?;
        self.ensure_can_modify(event_id).await?;
        let _guard = self
            .in_flight
            .try_begin(EventAction::Update(event_id))
            .ok_or_else(|| CityBuzzError::in_flight("update event"))?;

        match self
            .ctx
            .run("update event", self.gateway.update(event_id, request))
            .await
        {
            Ok(updated) => {
                let mut state = self.state.write().await;
                state.for_each_copy(event_id, |e| *e = updated.clone());
                state.open_menu = None;
                Ok(updated)
            }
            Err(err) => {
                self.ctx.report("update event", &err, Message::UpdateEventFailed).await;
                Err(err)
            }
        }
    }

    /// Deletes an event after confirmation. Returns `Ok(false)` if declined.
    pub async fn delete_event(&self, event_id: EventId, confirm: &dyn Confirm) -> Result<bool> {
        self.ensure_can_modify(event_id).await?;
        if !confirm.confirm(Message::ConfirmDeleteEvent.text(self.ctx.locale())) {
            self.state.write().await.open_menu = None;
            return Ok(false);
        }
        let _guard = self
            .in_flight
            .try_begin(EventAction::Delete(event_id))
            .ok_or_else(|| CityBuzzError::in_flight("delete event"))?;

        match self.ctx.run("delete event", self.gateway.delete(event_id)).await {
            Ok(()) => {
                self.state.write().await.remove(event_id);
                tracing::info!(%event_id, "event deleted");
                Ok(true)
            }
            Err(err) => {
                self.ctx.report("delete event", &err, Message::DeleteEventFailed).await;
                Err(err)
            }
        }
    }

    pub async fn attendees(&self, event_id: EventId) -> Result<Attendees> {
        match self.gateway.attendees(event_id).await {
            Ok(attendees) => Ok(attendees),
            Err(err) => {
                self.ctx.report("load attendees", &err, Message::LoadEventsFailed).await;
                Err(err)
            }
        }
    }

    pub async fn toggle_menu(&self, event_id: EventId) -> Option<EventId> {
        let mut state = self.state.write().await;
        state.open_menu = if state.open_menu == Some(event_id) {
            None
        } else {
            Some(event_id)
        };
        state.open_menu
    }

    async fn ensure_can_modify(&self, event_id: EventId) -> Result<()> {
        let user = self.ctx.require_user(Message::LoginToCreateEvent).await?;
        let state = self.state.read().await;
        let owner = state.find(event_id).and_then(|e| e.created_by);
        match owner {
            Some(owner) if owner != user.id => Err(CityBuzzError::validation(
                "only the organizer can modify this event",
            )),
            _ => Ok(()),
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub async fn snapshot(&self) -> EventsState {
        self.state.read().await.clone()
    }

    pub async fn current(&self) -> Vec<Event> {
        self.state.read().await.current.clone()
    }

    pub async fn upcoming(&self) -> Vec<Event> {
        self.state.read().await.upcoming.clone()
    }

    pub async fn trending(&self) -> Vec<Event> {
        self.state.read().await.trending.clone()
    }

    pub async fn event(&self, event_id: EventId) -> Option<Event> {
        self.state.read().await.find(event_id).cloned()
    }

    pub async fn rsvp_status(&self, event_id: EventId) -> Option<RsvpStatus> {
        self.state.read().await.rsvps.get(&event_id).copied()
    }

    pub fn is_rsvp_pending(&self, event_id: EventId) -> bool {
        self.in_flight.contains(&EventAction::Rsvp(event_id))
    }
}
