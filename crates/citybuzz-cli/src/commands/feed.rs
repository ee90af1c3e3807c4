use crate::context::CliContext;
use anyhow::{Result, bail};
use citybuzz_core::confirm::Confirm;
use citybuzz_core::post::{Comment, CommentId, Post, PostId};

fn print_post(post: &Post) {
    let author = post
        .author
        .as_ref()
        .map(|a| a.display_name())
        .unwrap_or_else(|| "?".to_string());
    let heart = if post.is_liked { "♥" } else { "♡" };
    println!(
        "{}  {}  {}",
        post.id,
        author,
        post.created_at.format("%Y-%m-%d %H:%M")
    );
    println!("    {}", post.content);
    println!(
        "    {heart} {}  💬 {}",
        post.likes_count, post.comments_count
    );
}

fn print_comment(comment: &Comment) {
    let author = comment
        .author
        .as_ref()
        .map(|a| a.display_name())
        .unwrap_or_else(|| "?".to_string());
    println!("  {}  {}: {}", comment.id, author, comment.content);
}

/// Pages through the feed until `post_id` is loaded.
async fn locate(ctx: &CliContext, post_id: PostId) -> Result<()> {
    let feed = &ctx.client.feed;
    feed.refresh().await?;
    while feed.post(post_id).await.is_none() {
        if !feed.snapshot().await.has_more {
            bail!("post {post_id} is not in the feed");
        }
        feed.load_more().await?;
    }
    Ok(())
}

pub async fn list(ctx: &CliContext, pages: u32) -> Result<()> {
    let feed = &ctx.client.feed;
    feed.refresh().await?;
    for _ in 1..pages {
        if !feed.snapshot().await.has_more {
            break;
        }
        feed.load_more().await?;
    }

    let posts = feed.posts().await;
    if posts.is_empty() {
        println!("No posts yet");
    }
    for post in &posts {
        print_post(post);
    }
    Ok(())
}

pub async fn post(ctx: &CliContext, content: &str) -> Result<()> {
    let feed = &ctx.client.feed;
    feed.set_post_draft(content).await;
    let post = feed.create_post().await?;
    print_post(&post);
    Ok(())
}

pub async fn edit(ctx: &CliContext, post_id: PostId, content: &str) -> Result<()> {
    locate(ctx, post_id).await?;
    let feed = &ctx.client.feed;
    feed.start_edit(post_id).await?;
    feed.set_edit_content(content).await?;
    let post = feed.save_edit().await?;
    print_post(&post);
    Ok(())
}

pub async fn delete(ctx: &CliContext, post_id: PostId, confirm: &dyn Confirm) -> Result<()> {
    locate(ctx, post_id).await?;
    if ctx.client.feed.delete_post(post_id, confirm).await? {
        println!("Deleted {post_id}");
    } else {
        println!("Cancelled");
    }
    Ok(())
}

pub async fn like(ctx: &CliContext, post_id: PostId) -> Result<()> {
    locate(ctx, post_id).await?;
    let liked = ctx.client.feed.toggle_like(post_id).await?;
    if let Some(post) = ctx.client.feed.post(post_id).await {
        let verb = if liked { "Liked" } else { "Unliked" };
        println!("{verb} {post_id} ({} likes)", post.likes_count);
    }
    Ok(())
}

pub async fn comments(ctx: &CliContext, post_id: PostId) -> Result<()> {
    locate(ctx, post_id).await?;
    ctx.client.feed.toggle_comments(post_id).await?;
    let Some(post) = ctx.client.feed.post(post_id).await else {
        return Ok(());
    };
    print_post(&post);
    for comment in &post.comments {
        print_comment(comment);
    }
    Ok(())
}

pub async fn comment(ctx: &CliContext, post_id: PostId, content: &str) -> Result<()> {
    locate(ctx, post_id).await?;
    let feed = &ctx.client.feed;
    feed.set_comment_draft(post_id, content).await;
    let comment = feed.submit_comment(post_id).await?;
    print_comment(&comment);
    Ok(())
}

pub async fn delete_comment(
    ctx: &CliContext,
    post_id: PostId,
    comment_id: CommentId,
    confirm: &dyn Confirm,
) -> Result<()> {
    locate(ctx, post_id).await?;
    // Comments are loaded lazily; open them so the one to delete is known
    ctx.client.feed.toggle_comments(post_id).await?;
    if ctx
        .client
        .feed
        .delete_comment(post_id, comment_id, confirm)
        .await?
    {
        println!("Deleted comment {comment_id}");
    } else {
        println!("Cancelled");
    }
    Ok(())
}
