//! Wiring of the session controller and the reconcilers.

use crate::events::EventReconciler;
use crate::feed::FeedReconciler;
use crate::mutation::MutationContext;
use crate::news::NewsReader;
use crate::notice::NoticeBoard;
use crate::session::SessionController;
use citybuzz_core::config::ClientConfig;
use citybuzz_core::error::Result;
use citybuzz_core::event::EventGateway;
use citybuzz_core::news::NewsGateway;
use citybuzz_core::post::PostGateway;
use citybuzz_core::user::AuthGateway;
use std::sync::Arc;

/// The backend, one gateway per resource.
#[derive(Clone)]
pub struct Gateways {
    pub auth: Arc<dyn AuthGateway>,
    pub posts: Arc<dyn PostGateway>,
    pub events: Arc<dyn EventGateway>,
    pub news: Arc<dyn NewsGateway>,
}

/// One client instance: a session and the views built on top of it.
pub struct CityBuzzClient {
    pub session: Arc<SessionController>,
    pub notices: Arc<NoticeBoard>,
    pub feed: FeedReconciler,
    pub events: EventReconciler,
    pub news: NewsReader,
}

impl CityBuzzClient {
    pub fn new(config: &ClientConfig, gateways: Gateways) -> Self {
        let session = Arc::new(SessionController::new(gateways.auth));
        let notices = Arc::new(NoticeBoard::new(config.locale, config.notice_ttl()));
        let ctx = MutationContext::new(session.clone(), notices.clone(), config.mutation_timeout());

        Self {
            feed: FeedReconciler::new(gateways.posts, ctx.clone(), config.page_size),
            events: EventReconciler::new(gateways.events, ctx.clone(), config.city.clone()),
            news: NewsReader::new(gateways.news, ctx, config.page_size),
            session,
            notices,
        }
    }

    /// Logs out and forgets everything tied to the previous user.
    pub async fn logout(&self) -> Result<()> {
        let result = self.session.logout().await;
        self.news.forget_saved().await;
        self.events.forget_rsvps().await;
        result
    }
}
