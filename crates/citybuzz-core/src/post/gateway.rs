//! Backend contract for posts and comments.

use super::model::{Comment, CommentId, FeedPage, Post, PostId};
use crate::error::Result;
use async_trait::async_trait;

/// Access to the backend's post endpoints.
///
/// This trait decouples the feed reconciler from the transport, so the
/// reconciliation rules can be exercised against in-memory fakes.
#[async_trait]
pub trait PostGateway: Send + Sync {
    /// `GET /posts?page=&limit=`
    async fn feed(&self, page: u32, limit: u32) -> Result<FeedPage>;

    /// `POST /posts`. Returns the server record with its authoritative id.
    async fn create(&self, content: &str) -> Result<Post>;

    /// `PUT /posts/:id`
    async fn update(&self, post_id: PostId, content: &str) -> Result<()>;

    /// `DELETE /posts/:id`
    async fn delete(&self, post_id: PostId) -> Result<()>;

    /// `POST /posts/:id/like`
    async fn like(&self, post_id: PostId) -> Result<()>;

    /// `DELETE /posts/:id/like`
    async fn unlike(&self, post_id: PostId) -> Result<()>;

    /// `GET /posts/:id/comments`
    async fn comments(&self, post_id: PostId) -> Result<Vec<Comment>>;

    /// `POST /posts/:id/comments`
    async fn create_comment(&self, post_id: PostId, content: &str) -> Result<Comment>;

    /// `DELETE /comments/:id`
    async fn delete_comment(&self, comment_id: CommentId) -> Result<()>;
}
