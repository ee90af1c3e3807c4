//! Backend contract for news.

use super::model::{NewsPage, NewsQuery, NewsScope, SaveArticleRequest, SavedArticle};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait NewsGateway: Send + Sync {
    /// Public listing for a scope (`/news/rouen`, `/news/city`, `/news/search`...).
    async fn list(&self, scope: &NewsScope, query: &NewsQuery) -> Result<NewsPage>;

    /// `GET /news/saved`
    async fn saved(&self) -> Result<Vec<SavedArticle>>;

    /// `POST /news/save`
    async fn save(&self, request: &SaveArticleRequest) -> Result<SavedArticle>;

    /// `DELETE /news/saved?url=`
    async fn remove_saved(&self, article_url: &str) -> Result<()>;
}
