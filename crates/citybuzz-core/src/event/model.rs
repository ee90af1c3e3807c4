//! Event and RSVP models.

use crate::i18n::Locale;
use crate::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

pub type EventId = Uuid;

/// A user's answer to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RsvpStatus {
    Going,
    Interested,
}

/// Listing categories accepted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EventCategory {
    Concerts,
    Festivals,
    Sports,
    Culture,
    Markets,
    Nightlife,
    Clubs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<u32>,
    #[serde(default)]
    pub going_count: u32,
    #[serde(default)]
    pub interested_count: u32,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
}

impl Event {
    pub fn attendee_count(&self) -> u32 {
        self.going_count + self.interested_count
    }

    pub fn count(&self, status: RsvpStatus) -> u32 {
        match status {
            RsvpStatus::Going => self.going_count,
            RsvpStatus::Interested => self.interested_count,
        }
    }

    fn count_mut(&mut self, status: RsvpStatus) -> &mut u32 {
        match status {
            RsvpStatus::Going => &mut self.going_count,
            RsvpStatus::Interested => &mut self.interested_count,
        }
    }

    /// Moves the counters for a user whose answer changes from `from` to `to`.
    ///
    /// Switching between two statuses moves one unit from one counter to the
    /// other; clearing decrements; a first answer increments.
    pub fn apply_rsvp_change(&mut self, from: Option<RsvpStatus>, to: Option<RsvpStatus>) {
        if from == to {
            return;
        }
        if let Some(previous) = from {
            let count = self.count_mut(previous);
            *count = count.saturating_sub(1);
        }
        if let Some(next) = to {
            let count = self.count_mut(next);
            *count = count.saturating_add(1);
        }
    }
}

/// One RSVP of the current user, as listed by `GET /events/my-rsvps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rsvp {
    pub event_id: EventId,
    pub status: RsvpStatus,
}

/// The structured event listing for a city.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventsPage {
    #[serde(default)]
    pub current: Vec<Event>,
    #[serde(default)]
    pub upcoming: Vec<Event>,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub status: RsvpStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attendees {
    #[serde(default)]
    pub going: Vec<Attendee>,
    #[serde(default)]
    pub interested: Vec<Attendee>,
    #[serde(default)]
    pub going_count: u32,
    #[serde(default)]
    pub interested_count: u32,
}

/// Filters for an event listing.
#[derive(Debug, Clone, PartialEq)]
pub struct EventQuery {
    /// `None` lists every category
    pub category: Option<EventCategory>,
    pub language: Locale,
    pub page: u32,
    pub page_size: u32,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            category: None,
            language: Locale::default(),
            page: 1,
            page_size: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub city: String,
    pub category: EventCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    pub is_free: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<u32>,
}

impl CreateEventRequest {
    /// Client-side checks mirroring the server's validation rules.
    pub fn validate(&self) -> Result<(), String> {
        let title = self.title.trim().chars().count();
        if !(3..=255).contains(&title) {
            return Err("title must be between 3 and 255 characters".to_string());
        }
        let description = self.description.trim().chars().count();
        if !(10..=5000).contains(&description) {
            return Err("description must be between 10 and 5000 characters".to_string());
        }
        if self.location.trim().is_empty() || self.city.trim().is_empty() {
            return Err("location and city are required".to_string());
        }
        if self.max_capacity == Some(0) {
            return Err("max capacity must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Partial update; absent fields are left unchanged by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<EventCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_free: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<u32>,
}

impl UpdateEventRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Text fields that are present must not be blank.
    pub fn validate(&self) -> Result<(), String> {
        if self.is_empty() {
            return Err("nothing to update".to_string());
        }
        for (name, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("location", &self.location),
            ("city", &self.city),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(format!("{name} must not be empty"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(going: u32, interested: u32) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: "Fête de la musique".to_string(),
            description: String::new(),
            start_date: Utc::now(),
            end_date: None,
            location: "Place du Vieux-Marché".to_string(),
            address: None,
            city: "Rouen".to_string(),
            category: "concerts".to_string(),
            image_url: None,
            price: None,
            is_free: true,
            organizer_name: None,
            max_capacity: None,
            going_count: going,
            interested_count: interested,
            source: "user".to_string(),
            created_by: None,
        }
    }

    #[test]
    fn test_first_answer_increments() {
        let mut e = event(2, 1);
        e.apply_rsvp_change(None, Some(RsvpStatus::Going));
        assert_eq!((e.going_count, e.interested_count), (3, 1));
    }

    #[test]
    fn test_switching_moves_one_unit() {
        let mut e = event(2, 1);
        e.apply_rsvp_change(Some(RsvpStatus::Going), Some(RsvpStatus::Interested));
        assert_eq!((e.going_count, e.interested_count), (1, 2));
        assert_eq!(e.attendee_count(), 3);
    }

    #[test]
    fn test_clearing_decrements_without_underflow() {
        let mut e = event(0, 0);
        e.apply_rsvp_change(Some(RsvpStatus::Going), None);
        assert_eq!(e.going_count, 0);
    }

    #[test]
    fn test_rsvp_status_wire_format() {
        assert_eq!(serde_json::to_string(&RsvpStatus::Going).unwrap(), "\"going\"");
        assert_eq!("interested".parse::<RsvpStatus>().unwrap(), RsvpStatus::Interested);
    }

    #[test]
    fn test_update_request_rejects_blank_title() {
        let req = UpdateEventRequest {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
        assert!(UpdateEventRequest::default().validate().is_err());
    }
}
