use crate::i18n::Locale;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// A news article aggregated by the backend from external providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub source: ArticleSource,
    #[serde(default)]
    pub author: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPage {
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub total_results: u32,
}

/// Which news listing to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsScope {
    Rouen,
    Normandy,
    France,
    City(String),
    Search(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewsQuery {
    pub category: Option<String>,
    pub language: Locale,
    pub page: u32,
    pub page_size: u32,
}

impl Default for NewsQuery {
    fn default() -> Self {
        Self {
            category: None,
            language: Locale::default(),
            page: 1,
            page_size: 10,
        }
    }
}

/// An article bookmarked by the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedArticle {
    pub id: Uuid,
    pub article_url: String,
    pub article_title: String,
    #[serde(default)]
    pub article_image: String,
    #[serde(default)]
    pub article_source: String,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveArticleRequest {
    pub article_url: String,
    pub article_title: String,
    pub article_image: String,
    pub article_source: String,
}

impl From<&Article> for SaveArticleRequest {
    fn from(article: &Article) -> Self {
        Self {
            article_url: article.url.clone(),
            article_title: article.title.clone(),
            article_image: article.url_to_image.clone().unwrap_or_default(),
            article_source: article.source.name.clone(),
        }
    }
}
