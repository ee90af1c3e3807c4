use crate::context::CliContext;
use anyhow::Result;
use chrono::Utc;
use citybuzz_core::news::{Article, ArticleSource, NewsScope};
use clap::Args;

/// Which listing to read; Rouen when nothing is given.
#[derive(Args)]
#[group(multiple = false)]
pub struct ScopeArgs {
    #[arg(long)]
    normandy: bool,
    #[arg(long)]
    france: bool,
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    search: Option<String>,
}

impl ScopeArgs {
    pub fn into_scope(self) -> NewsScope {
        if let Some(query) = self.search {
            NewsScope::Search(query)
        } else if let Some(city) = self.city {
            NewsScope::City(city)
        } else if self.france {
            NewsScope::France
        } else if self.normandy {
            NewsScope::Normandy
        } else {
            NewsScope::Rouen
        }
    }
}

pub async fn list(ctx: &CliContext, scope: &NewsScope, category: Option<String>, page: u32) -> Result<()> {
    let news = &ctx.client.news;
    let listing = news.load(scope, category, page).await?;
    news.load_saved().await?;

    println!("{} results", listing.total_results);
    for article in &listing.articles {
        let mark = if news.is_saved(&article.url).await { "★" } else { " " };
        println!(
            "{mark} {}  {} ({})",
            article.published_at.format("%Y-%m-%d"),
            article.title,
            article.source.name
        );
        println!("    {}", article.url);
    }
    Ok(())
}

pub async fn toggle_saved(ctx: &CliContext, url: String, title: String, source: String) -> Result<()> {
    let article = Article {
        source: ArticleSource {
            id: None,
            name: source,
        },
        author: None,
        title,
        description: None,
        url,
        url_to_image: None,
        published_at: Utc::now(),
        content: None,
    };
    if ctx.client.news.toggle_saved(&article).await? {
        println!("Saved {}", article.url);
    } else {
        println!("Removed {}", article.url);
    }
    Ok(())
}
