//! News listings and saved articles.

use crate::in_flight::InFlight;
use crate::mutation::MutationContext;
use citybuzz_core::error::{CityBuzzError, Result};
use citybuzz_core::i18n::Message;
use citybuzz_core::news::{
    Article, NewsGateway, NewsPage, NewsQuery, NewsScope, SaveArticleRequest, SavedArticle,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
pub struct NewsState {
    pub articles: Vec<Article>,
    pub total_results: u32,
    pub page: u32,
    /// Saved article records, `None` until first loaded
    pub saved: Option<Vec<SavedArticle>>,
    /// Saved URLs as the user currently sees them, including pending toggles
    pub saved_urls: HashSet<String>,
}

/// Reads news listings and keeps the user's saved-article set.
pub struct NewsReader {
    gateway: Arc<dyn NewsGateway>,
    ctx: MutationContext,
    page_size: u32,
    state: RwLock<NewsState>,
    in_flight: InFlight<String>,
}

impl NewsReader {
    pub fn new(gateway: Arc<dyn NewsGateway>, ctx: MutationContext, page_size: u32) -> Self {
        Self {
            gateway,
            ctx,
            page_size,
            state: RwLock::new(NewsState::default()),
            in_flight: InFlight::new(),
        }
    }

    /// Loads one page of a listing. Page 1 replaces the list, later pages append.
    pub async fn load(&self, scope: &NewsScope, category: Option<String>, page: u32) -> Result<NewsPage> {
        let query = NewsQuery {
            category,
            language: self.ctx.locale(),
            page: page.max(1),
            page_size: self.page_size,
        };

        match self.gateway.list(scope, &query).await {
            Ok(result) => {
                tracing::debug!(?scope, page = query.page, count = result.articles.len(), "news loaded");
                let mut state = self.state.write().await;
                if query.page == 1 {
                    state.articles = result.articles.clone();
                } else {
                    state.articles.extend(result.articles.iter().cloned());
                }
                state.total_results = result.total_results;
                state.page = query.page;
                Ok(result)
            }
            Err(err) => {
                self.ctx.report("load news", &err, Message::LoadNewsFailed).await;
                Err(err)
            }
        }
    }

    /// Saved articles, fetched once and then served from memory.
    ///
    /// Anonymous users have none and nothing is requested.
    pub async fn load_saved(&self) -> Result<Vec<SavedArticle>> {
        if let Some(saved) = self.state.read().await.saved.clone() {
            return Ok(saved);
        }
        if !self.ctx.session.is_authenticated().await {
            return Ok(Vec::new());
        }
        self.refresh_saved().await
    }

    /// Refetches the saved list, overwriting local membership.
    pub async fn refresh_saved(&self) -> Result<Vec<SavedArticle>> {
        match self.gateway.saved().await {
            Ok(saved) => {
                let mut state = self.state.write().await;
                state.saved_urls = saved.iter().map(|s| s.article_url.clone()).collect();
                state.saved = Some(saved.clone());
                Ok(saved)
            }
            Err(err) => {
                self.ctx.report("load saved articles", &err, Message::LoadNewsFailed).await;
                Err(err)
            }
        }
    }

    /// Saves the article, or removes it if already saved. Returns whether it is
    /// now saved.
    pub async fn toggle_saved(&self, article: &Article) -> Result<bool> {
        self.ctx.require_user(Message::LoginToSaveArticle).await?;
        self.load_saved().await?;
        let _guard = self
            .in_flight
            .try_begin(article.url.clone())
            .ok_or_else(|| CityBuzzError::in_flight("save article"))?;

        let was_saved = {
            let mut state = self.state.write().await;
            let was_saved = state.saved_urls.contains(&article.url);
            if was_saved {
                state.saved_urls.remove(&article.url);
            } else {
                state.saved_urls.insert(article.url.clone());
            }
            was_saved
        };

        let result = if was_saved {
            self.ctx
                .run("remove saved article", self.gateway.remove_saved(&article.url))
                .await
                .map(|()| None)
        } else {
            let request = SaveArticleRequest::from(article);
            self.ctx
                .run("save article", self.gateway.save(&request))
                .await
                .map(Some)
        };

        match result {
            Ok(record) => {
                let mut state = self.state.write().await;
                let saved = state.saved.get_or_insert_with(Vec::new);
                saved.retain(|s| s.article_url != article.url);
                if let Some(record) = record {
                    saved.push(record);
                }
                Ok(!was_saved)
            }
            Err(err) => {
                let mut state = self.state.write().await;
                if was_saved {
                    state.saved_urls.insert(article.url.clone());
                } else {
                    state.saved_urls.remove(&article.url);
                }
                drop(state);
                self.ctx.report("save article", &err, Message::SaveArticleFailed).await;
                Err(err)
            }
        }
    }

    /// Drops the saved set, e.g. after logout.
    pub async fn forget_saved(&self) {
        let mut state = self.state.write().await;
        state.saved = None;
        state.saved_urls.clear();
    }

    pub async fn is_saved(&self, url: &str) -> bool {
        self.state.read().await.saved_urls.contains(url)
    }

    pub async fn articles(&self) -> Vec<Article> {
        self.state.read().await.articles.clone()
    }

    pub async fn snapshot(&self) -> NewsState {
        self.state.read().await.clone()
    }
}
