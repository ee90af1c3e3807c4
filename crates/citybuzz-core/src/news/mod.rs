//! Local news domain module.

mod gateway;
mod model;

pub use gateway::NewsGateway;
pub use model::{
    Article, ArticleSource, NewsPage, NewsQuery, NewsScope, SaveArticleRequest, SavedArticle,
};
