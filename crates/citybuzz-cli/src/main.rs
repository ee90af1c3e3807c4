//! citybuzz - command-line client for the City-Buzz social network.

use anyhow::Result;
use citybuzz_core::event::{EventCategory, RsvpStatus};
use citybuzz_core::i18n::Locale;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use uuid::Uuid;

mod commands;
mod context;
mod prompt;

const LOG_ENV: &str = "CITYBUZZ_LOG";

#[derive(Parser)]
#[command(name = "citybuzz")]
#[command(version, about = "City-Buzz CLI - posts, events and news for your city", long_about = None)]
struct Cli {
    /// Directory holding citybuzz/config.toml (defaults to the platform config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Interface language (fr, en)
    #[arg(long, global = true)]
    locale: Option<Locale>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the logged-in user
    Whoami,
    /// Log in with an email, phone number or username
    Login {
        identifier: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account (does not log in)
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date_of_birth: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        gender: Option<String>,
    },
    /// End the session
    Logout,
    /// List the feed
    Feed {
        /// Number of pages to fetch
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Publish a post
    Post { content: String },
    /// Replace the content of one of your posts
    EditPost { post_id: Uuid, content: String },
    /// Delete one of your posts
    DeletePost { post_id: Uuid },
    /// Like a post, or unlike it if already liked
    Like { post_id: Uuid },
    /// Show the comments of a post
    Comments { post_id: Uuid },
    /// Comment on a post
    Comment { post_id: Uuid, content: String },
    /// Delete one of your comments
    DeleteComment { post_id: Uuid, comment_id: Uuid },
    /// List events in the configured city
    Events {
        #[arg(long)]
        category: Option<EventCategory>,
        /// Also show the N trending events
        #[arg(long)]
        trending: Option<u32>,
    },
    /// Answer an event; repeating the same answer clears it
    Rsvp { event_id: Uuid, status: RsvpStatus },
    /// Show who is going to an event
    Attendees { event_id: Uuid },
    /// Delete one of your events
    DeleteEvent { event_id: Uuid },
    /// Read the news
    News {
        #[command(flatten)]
        scope: commands::news::ScopeArgs,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Save an article, or remove it if already saved
    SaveArticle {
        url: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        source: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let ctx = context::CliContext::load(cli.config_dir.as_deref(), cli.locale).await?;
    let confirm = prompt::confirmer(cli.yes);

    let result = match cli.command {
        Commands::Whoami => commands::auth::whoami(&ctx).await,
        Commands::Login {
            identifier,
            password,
        } => commands::auth::login(&ctx, &identifier, &password).await,
        Commands::Register {
            username,
            password,
            first_name,
            last_name,
            date_of_birth,
            email,
            phone,
            gender,
        } => {
            let request = citybuzz_core::user::RegisterRequest {
                email,
                phone,
                username,
                password,
                first_name,
                last_name,
                gender,
                date_of_birth,
            };
            commands::auth::register(&ctx, &request).await
        }
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Feed { pages } => commands::feed::list(&ctx, pages).await,
        Commands::Post { content } => commands::feed::post(&ctx, &content).await,
        Commands::EditPost { post_id, content } => {
            commands::feed::edit(&ctx, post_id, &content).await
        }
        Commands::DeletePost { post_id } => {
            commands::feed::delete(&ctx, post_id, confirm.as_ref()).await
        }
        Commands::Like { post_id } => commands::feed::like(&ctx, post_id).await,
        Commands::Comments { post_id } => commands::feed::comments(&ctx, post_id).await,
        Commands::Comment { post_id, content } => {
            commands::feed::comment(&ctx, post_id, &content).await
        }
        Commands::DeleteComment {
            post_id,
            comment_id,
        } => commands::feed::delete_comment(&ctx, post_id, comment_id, confirm.as_ref()).await,
        Commands::Events { category, trending } => {
            commands::events::list(&ctx, category, trending).await
        }
        Commands::Rsvp { event_id, status } => commands::events::rsvp(&ctx, event_id, status).await,
        Commands::Attendees { event_id } => commands::events::attendees(&ctx, event_id).await,
        Commands::DeleteEvent { event_id } => {
            commands::events::delete(&ctx, event_id, confirm.as_ref()).await
        }
        Commands::News {
            scope,
            category,
            page,
        } => commands::news::list(&ctx, &scope.into_scope(), category, page).await,
        Commands::SaveArticle { url, title, source } => {
            commands::news::toggle_saved(&ctx, url, title, source).await
        }
    };

    ctx.finish().await;
    result
}
