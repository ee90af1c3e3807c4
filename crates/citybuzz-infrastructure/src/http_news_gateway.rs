//! `NewsGateway` over the REST API.

use crate::api::{ApiClient, Endpoint};
use crate::dto::NewsData;
use async_trait::async_trait;
use citybuzz_core::error::Result;
use citybuzz_core::news::{
    NewsGateway, NewsPage, NewsQuery, NewsScope, SaveArticleRequest, SavedArticle,
};

#[derive(Clone)]
pub struct HttpNewsGateway {
    api: ApiClient,
}

impl HttpNewsGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

/// Builds the public listing endpoint for a scope.
pub(crate) fn listing_endpoint(scope: &NewsScope, query: &NewsQuery) -> Endpoint {
    let endpoint = match scope {
        NewsScope::Rouen => Endpoint::get("/news/rouen"),
        NewsScope::Normandy => Endpoint::get("/news/normandy"),
        NewsScope::France => Endpoint::get("/news/france"),
        NewsScope::City(city) => Endpoint::get("/news/city").query("city", city),
        NewsScope::Search(q) => Endpoint::get("/news/search")
            .query("q", q)
            .query("sortBy", "publishedAt"),
    };
    let endpoint = match scope {
        NewsScope::Search(_) => endpoint,
        _ => endpoint.query("category", query.category.clone().unwrap_or_default()),
    };
    endpoint
        .public()
        .query("language", query.language)
        .query("page", query.page)
        .query("pageSize", query.page_size)
}

#[async_trait]
impl NewsGateway for HttpNewsGateway {
    async fn list(&self, scope: &NewsScope, query: &NewsQuery) -> Result<NewsPage> {
        let data: Option<NewsData> = self
            .api
            .fetch_optional(listing_endpoint(scope, query))
            .await?;
        Ok(data.map(NewsPage::from).unwrap_or_default())
    }

    async fn saved(&self) -> Result<Vec<SavedArticle>> {
        let saved: Option<Vec<SavedArticle>> =
            self.api.fetch_optional(Endpoint::get("/news/saved")).await?;
        Ok(saved.unwrap_or_default())
    }

    async fn save(&self, request: &SaveArticleRequest) -> Result<SavedArticle> {
        self.api
            .submit(Endpoint::post("/news/save"), request, "saved article")
            .await
    }

    async fn remove_saved(&self, article_url: &str) -> Result<()> {
        let endpoint = Endpoint::delete("/news/saved").query("url", article_url);
        self.api.call(endpoint, None::<&()>).await
    }
}
