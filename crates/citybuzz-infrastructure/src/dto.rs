//! Per-endpoint `data` schemas.
//!
//! One struct per response shape. Lists may arrive as `null` from the
//! backend, so they are read as `Option<Vec<_>>` and flattened here rather
//! than at call sites.

use citybuzz_core::event::{Attendees, Event, EventsPage};
use citybuzz_core::news::NewsPage;
use citybuzz_core::post::{Comment, FeedPage, Post};
use citybuzz_core::user::User;
use serde::Deserialize;

/// `GET /users/me`, `POST /auth/login`, `POST /auth/register`
#[derive(Debug, Deserialize)]
pub struct UserData {
    pub user: Option<User>,
}

/// `GET /posts`
#[derive(Debug, Deserialize)]
pub struct FeedData {
    pub posts: Option<Vec<Post>>,
    pub page: u32,
    pub limit: u32,
}

impl From<FeedData> for FeedPage {
    fn from(data: FeedData) -> Self {
        Self {
            posts: data.posts.unwrap_or_default(),
            page: data.page,
            limit: data.limit,
        }
    }
}

/// `POST /posts`
#[derive(Debug, Deserialize)]
pub struct PostData {
    pub post: Post,
}

/// `GET /posts/:id/comments`
#[derive(Debug, Deserialize)]
pub struct CommentsData {
    pub comments: Option<Vec<Comment>>,
}

/// `POST /posts/:id/comments`
#[derive(Debug, Deserialize)]
pub struct CommentData {
    pub comment: Comment,
}

/// `GET /events/:city`
#[derive(Debug, Deserialize)]
pub struct EventsData {
    pub current: Option<Vec<Event>>,
    pub upcoming: Option<Vec<Event>>,
    #[serde(default)]
    pub total: u32,
}

impl From<EventsData> for EventsPage {
    fn from(data: EventsData) -> Self {
        Self {
            current: data.current.unwrap_or_default(),
            upcoming: data.upcoming.unwrap_or_default(),
            total: data.total,
        }
    }
}

/// `GET /events/trending`
#[derive(Debug, Deserialize)]
pub struct TrendingData {
    pub events: Option<Vec<Event>>,
}

/// `GET /events/:id/attendees`
#[derive(Debug, Deserialize)]
pub struct AttendeesData {
    pub going: Option<Vec<citybuzz_core::event::Attendee>>,
    pub interested: Option<Vec<citybuzz_core::event::Attendee>>,
    #[serde(default)]
    pub going_count: u32,
    #[serde(default)]
    pub interested_count: u32,
}

impl From<AttendeesData> for Attendees {
    fn from(data: AttendeesData) -> Self {
        Self {
            going: data.going.unwrap_or_default(),
            interested: data.interested.unwrap_or_default(),
            going_count: data.going_count,
            interested_count: data.interested_count,
        }
    }
}

/// News listings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsData {
    pub articles: Option<Vec<citybuzz_core::news::Article>>,
    #[serde(default)]
    pub total_results: u32,
}

impl From<NewsData> for NewsPage {
    fn from(data: NewsData) -> Self {
        Self {
            articles: data.articles.unwrap_or_default(),
            total_results: data.total_results,
        }
    }
}
