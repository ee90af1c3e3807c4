//! Mock gateways and fixtures shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use citybuzz_application::{CityBuzzClient, Gateways};
use citybuzz_core::ClientConfig;
use citybuzz_core::error::{CityBuzzError, Result};
use citybuzz_core::event::{
    Attendees, CreateEventRequest, Event, EventGateway, EventId, EventQuery, EventsPage, Rsvp,
    RsvpStatus, UpdateEventRequest,
};
use citybuzz_core::i18n::Locale;
use citybuzz_core::news::{
    Article, ArticleSource, NewsGateway, NewsPage, NewsQuery, NewsScope, SaveArticleRequest,
    SavedArticle,
};
use citybuzz_core::post::{Comment, CommentId, FeedPage, Post, PostGateway, PostId};
use citybuzz_core::user::{AuthGateway, Credentials, RegisterRequest, User};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use uuid::Uuid;

// ============================================================================
// Fixtures
// ============================================================================

pub fn user(username: &str) -> User {
    User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        first_name: String::new(),
        last_name: String::new(),
        email: None,
        phone: None,
        bio: None,
        avatar_url: None,
        language: "fr".to_string(),
        created_at: None,
    }
}

pub fn post(content: &str, likes_count: u32, is_liked: bool) -> Post {
    Post {
        id: Uuid::new_v4(),
        user_id: None,
        content: content.to_string(),
        likes_count,
        comments_count: 0,
        created_at: Utc::now(),
        updated_at: None,
        author: None,
        is_liked,
        comments: Vec::new(),
    }
}

pub fn comment(post_id: PostId, content: &str) -> Comment {
    Comment {
        id: Uuid::new_v4(),
        post_id: Some(post_id),
        user_id: None,
        content: content.to_string(),
        likes_count: 0,
        created_at: Utc::now(),
        author: None,
        is_liked: false,
    }
}

pub fn event(title: &str, going_count: u32, interested_count: u32) -> Event {
    Event {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: "Au bord de la Seine".to_string(),
        start_date: Utc::now(),
        end_date: None,
        location: "Quais de Seine".to_string(),
        address: None,
        city: "Rouen".to_string(),
        category: "festivals".to_string(),
        image_url: None,
        price: None,
        is_free: true,
        organizer_name: None,
        max_capacity: None,
        going_count,
        interested_count,
        source: "user".to_string(),
        created_by: None,
    }
}

pub fn article(url: &str) -> Article {
    Article {
        source: ArticleSource {
            id: None,
            name: "Paris-Normandie".to_string(),
        },
        author: None,
        title: format!("Article {url}"),
        description: None,
        url: url.to_string(),
        url_to_image: None,
        published_at: Utc::now(),
        content: None,
    }
}

/// Blocks mutations until released, and tells the test when one is waiting.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

impl Gate {
    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

/// Shared knobs for every mock: call log, scripted failure, optional gate.
#[derive(Default)]
pub struct Script {
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<CityBuzzError>>,
    gate: Mutex<Option<Arc<Gate>>>,
}

impl Script {
    pub fn fail_with(&self, err: CityBuzzError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn succeed(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn hold(&self) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls whose label starts with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Records the call and applies the scripted outcome.
    async fn mutation(&self, label: String) -> Result<()> {
        self.calls.lock().unwrap().push(label);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn read(&self, label: String) {
        self.calls.lock().unwrap().push(label);
    }
}

// ============================================================================
// Auth
// ============================================================================

pub struct MockAuthGateway {
    pub current: Mutex<Option<User>>,
    pub probes: AtomicUsize,
    pub probe_delay: Duration,
}

impl MockAuthGateway {
    pub fn new(current: Option<User>) -> Self {
        Self {
            current: Mutex::new(current),
            probes: AtomicUsize::new(0),
            probe_delay: Duration::ZERO,
        }
    }

    pub fn with_probe_delay(mut self, delay: Duration) -> Self {
        self.probe_delay = delay;
        self
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthGateway for MockAuthGateway {
    async fn current_user(&self) -> Result<User> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if !self.probe_delay.is_zero() {
            tokio::time::sleep(self.probe_delay).await;
        }
        self.current
            .lock()
            .unwrap()
            .clone()
            .ok_or(CityBuzzError::LoginRequired)
    }

    async fn login(&self, credentials: &Credentials) -> Result<User> {
        if credentials.password != "secret" {
            return Err(CityBuzzError::auth("Invalid credentials"));
        }
        let user = user(&credentials.identifier);
        *self.current.lock().unwrap() = Some(user.clone());
        Ok(user)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<User> {
        Ok(user(&request.username))
    }

    async fn logout(&self) -> Result<()> {
        *self.current.lock().unwrap() = None;
        Ok(())
    }
}

// ============================================================================
// Posts
// ============================================================================

#[derive(Default)]
pub struct MockPostGateway {
    pub feed: Mutex<Vec<Post>>,
    pub comments: Mutex<HashMap<PostId, Vec<Comment>>>,
    pub script: Script,
}

impl MockPostGateway {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let gateway = Self::default();
        *gateway.feed.lock().unwrap() = posts;
        gateway
    }
}

#[async_trait]
impl PostGateway for MockPostGateway {
    async fn feed(&self, page: u32, limit: u32) -> Result<FeedPage> {
        self.script.read(format!("feed {page}"));
        let posts: Vec<Post> = self
            .feed
            .lock()
            .unwrap()
            .iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok(FeedPage { posts, page, limit })
    }

    async fn create(&self, content: &str) -> Result<Post> {
        self.script.mutation(format!("create {content}")).await?;
        Ok(post(content, 0, false))
    }

    async fn update(&self, post_id: PostId, content: &str) -> Result<()> {
        self.script.mutation(format!("update {post_id} {content}")).await
    }

    async fn delete(&self, post_id: PostId) -> Result<()> {
        self.script.mutation(format!("delete {post_id}")).await
    }

    async fn like(&self, post_id: PostId) -> Result<()> {
        self.script.mutation(format!("like {post_id}")).await
    }

    async fn unlike(&self, post_id: PostId) -> Result<()> {
        self.script.mutation(format!("unlike {post_id}")).await
    }

    async fn comments(&self, post_id: PostId) -> Result<Vec<Comment>> {
        self.script.read(format!("comments {post_id}"));
        Ok(self
            .comments
            .lock()
            .unwrap()
            .get(&post_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_comment(&self, post_id: PostId, content: &str) -> Result<Comment> {
        self.script
            .mutation(format!("create_comment {post_id} {content}"))
            .await?;
        Ok(comment(post_id, content))
    }

    async fn delete_comment(&self, comment_id: CommentId) -> Result<()> {
        self.script
            .mutation(format!("delete_comment {comment_id}"))
            .await
    }
}

// ============================================================================
// Events
// ============================================================================

#[derive(Default)]
pub struct MockEventGateway {
    pub listing: Mutex<EventsPage>,
    pub trending: Mutex<Vec<Event>>,
    pub rsvps: Mutex<Vec<Rsvp>>,
    pub queries: Mutex<Vec<EventQuery>>,
    pub script: Script,
}

impl MockEventGateway {
    pub fn with_events(current: Vec<Event>) -> Self {
        let gateway = Self::default();
        let total = current.len() as u32;
        *gateway.listing.lock().unwrap() = EventsPage {
            current,
            upcoming: Vec::new(),
            total,
        };
        gateway
    }
}

#[async_trait]
impl EventGateway for MockEventGateway {
    async fn list(&self, city: &str, query: &EventQuery) -> Result<EventsPage> {
        self.script.read(format!("list {city} {}", query.page));
        self.queries.lock().unwrap().push(query.clone());
        if query.page > 1 {
            return Ok(EventsPage::default());
        }
        Ok(self.listing.lock().unwrap().clone())
    }

    async fn trending(&self, city: &str, limit: u32) -> Result<Vec<Event>> {
        self.script.read(format!("trending {city} {limit}"));
        Ok(self.trending.lock().unwrap().clone())
    }

    async fn create(&self, request: &CreateEventRequest) -> Result<Event> {
        self.script.mutation(format!("create {}", request.title)).await?;
        Ok(event(&request.title, 0, 0))
    }

    async fn update(&self, event_id: EventId, request: &UpdateEventRequest) -> Result<Event> {
        self.script.mutation(format!("update {event_id}")).await?;
        let mut updated = self
            .listing
            .lock()
            .unwrap()
            .current
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
            .ok_or_else(|| CityBuzzError::api(404, "Event not found"))?;
        if let Some(title) = &request.title {
            updated.title = title.clone();
        }
        Ok(updated)
    }

    async fn delete(&self, event_id: EventId) -> Result<()> {
        self.script.mutation(format!("delete {event_id}")).await
    }

    async fn rsvp(&self, event_id: EventId, status: RsvpStatus) -> Result<()> {
        self.script.mutation(format!("rsvp {event_id} {status}")).await
    }

    async fn clear_rsvp(&self, event_id: EventId) -> Result<()> {
        self.script.mutation(format!("clear_rsvp {event_id}")).await
    }

    async fn my_rsvps(&self) -> Result<Vec<Rsvp>> {
        self.script.read("my_rsvps".to_string());
        Ok(self.rsvps.lock().unwrap().clone())
    }

    async fn attendees(&self, event_id: EventId) -> Result<Attendees> {
        self.script.read(format!("attendees {event_id}"));
        Ok(Attendees {
            going: Vec::new(),
            interested: Vec::new(),
            going_count: 0,
            interested_count: 0,
        })
    }
}

// ============================================================================
// News
// ============================================================================

#[derive(Default)]
pub struct MockNewsGateway {
    pub articles: Mutex<Vec<Article>>,
    pub saved: Mutex<Vec<SavedArticle>>,
    pub script: Script,
}

#[async_trait]
impl NewsGateway for MockNewsGateway {
    async fn list(&self, scope: &NewsScope, query: &NewsQuery) -> Result<NewsPage> {
        self.script.read(format!("list {scope:?} {}", query.page));
        let articles = self.articles.lock().unwrap().clone();
        Ok(NewsPage {
            total_results: articles.len() as u32,
            articles,
        })
    }

    async fn saved(&self) -> Result<Vec<SavedArticle>> {
        self.script.read("saved".to_string());
        Ok(self.saved.lock().unwrap().clone())
    }

    async fn save(&self, request: &SaveArticleRequest) -> Result<SavedArticle> {
        self.script.mutation(format!("save {}", request.article_url)).await?;
        Ok(SavedArticle {
            id: Uuid::new_v4(),
            article_url: request.article_url.clone(),
            article_title: request.article_title.clone(),
            article_image: request.article_image.clone(),
            article_source: request.article_source.clone(),
            saved_at: Utc::now(),
        })
    }

    async fn remove_saved(&self, article_url: &str) -> Result<()> {
        self.script.mutation(format!("remove {article_url}")).await
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub client: CityBuzzClient,
    pub auth: Arc<MockAuthGateway>,
    pub posts: Arc<MockPostGateway>,
    pub events: Arc<MockEventGateway>,
    pub news: Arc<MockNewsGateway>,
}

impl Harness {
    pub fn new(
        locale: Locale,
        auth: MockAuthGateway,
        posts: MockPostGateway,
        events: MockEventGateway,
    ) -> Self {
        let auth = Arc::new(auth);
        let posts = Arc::new(posts);
        let events = Arc::new(events);
        let news = Arc::new(MockNewsGateway::default());
        let config = ClientConfig {
            locale,
            ..ClientConfig::default()
        };
        let client = CityBuzzClient::new(
            &config,
            Gateways {
                auth: auth.clone(),
                posts: posts.clone(),
                events: events.clone(),
                news: news.clone(),
            },
        );
        Self {
            client,
            auth,
            posts,
            events,
            news,
        }
    }

    /// A bootstrapped client logged in as `username`.
    pub async fn signed_in(username: &str, posts: Vec<Post>, events: Vec<Event>) -> Self {
        let harness = Self::new(
            Locale::En,
            MockAuthGateway::new(Some(user(username))),
            MockPostGateway::with_posts(posts),
            MockEventGateway::with_events(events),
        );
        harness.client.session.initialize().await;
        harness
    }

    /// A bootstrapped anonymous client.
    pub async fn anonymous(locale: Locale, posts: Vec<Post>, events: Vec<Event>) -> Self {
        let harness = Self::new(
            locale,
            MockAuthGateway::new(None),
            MockPostGateway::with_posts(posts),
            MockEventGateway::with_events(events),
        );
        harness.client.session.initialize().await;
        harness
    }

    pub async fn me(&self) -> User {
        self.client
            .session
            .current_user()
            .await
            .expect("harness user is signed in")
    }
}
