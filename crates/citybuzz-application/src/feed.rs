//! The post feed: optimistic likes, comments, edits and deletes.

use crate::in_flight::InFlight;
use crate::mutation::MutationContext;
use chrono::Utc;
use citybuzz_core::confirm::Confirm;
use citybuzz_core::error::{CityBuzzError, Result};
use citybuzz_core::i18n::Message;
use citybuzz_core::post::{Comment, CommentId, Post, PostGateway, PostId};
use citybuzz_core::user::{User, UserId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// An edit in progress. At most one post is edited at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub post_id: PostId,
    pub content: String,
}

/// Everything the feed view renders.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    pub posts: Vec<Post>,
    /// Last page fetched; 0 before the first load
    pub page: u32,
    pub has_more: bool,
    pub post_draft: String,
    pub comment_drafts: HashMap<PostId, String>,
    pub visible_comments: HashSet<PostId>,
    /// Posts whose comment list has been fetched since the last refresh
    pub loaded_comments: HashSet<PostId>,
    pub open_menu: Option<PostId>,
    pub editing: Option<EditDraft>,
    /// Bumped whenever a refresh replaces the posts
    generation: u64,
}

impl FeedState {
    fn post_mut(&mut self, post_id: PostId) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == post_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FeedAction {
    CreatePost,
    Like(PostId),
    Comment(PostId),
    LoadComments(PostId),
    Edit(PostId),
    DeletePost(PostId),
    DeleteComment(CommentId),
}

/// Keeps the local feed in step with the server.
///
/// Likes are applied before the server answers and rolled back if it
/// refuses. Comments and new posts are appended once the server returns the
/// created record. A refresh always replaces local state with the server's.
pub struct FeedReconciler {
    gateway: Arc<dyn PostGateway>,
    ctx: MutationContext,
    page_size: u32,
    state: RwLock<FeedState>,
    in_flight: InFlight<FeedAction>,
}

impl FeedReconciler {
    pub fn new(gateway: Arc<dyn PostGateway>, ctx: MutationContext, page_size: u32) -> Self {
        Self {
            gateway,
            ctx,
            page_size,
            state: RwLock::new(FeedState::default()),
            in_flight: InFlight::new(),
        }
    }

    // ============================================================================
    // Loading
    // ============================================================================

    /// Reloads the first page, discarding local optimistic state.
    ///
    /// Lazily loaded comment lists are dropped with the old posts, so they are
    /// fetched again the next time they are opened.
    pub async fn refresh(&self) -> Result<()> {
        match self.gateway.feed(1, self.page_size).await {
            Ok(page) => {
                tracing::debug!(count = page.posts.len(), "feed refreshed");
                let mut state = self.state.write().await;
                state.has_more = page.has_more();
                state.page = 1;
                state.posts = page.posts;
                state.visible_comments.clear();
                state.loaded_comments.clear();
                state.generation += 1;
                let ids: HashSet<PostId> = state.posts.iter().map(|p| p.id).collect();
                if state.open_menu.is_some_and(|id| !ids.contains(&id)) {
                    state.open_menu = None;
                }
                Ok(())
            }
            Err(err) => {
                self.ctx.report("load feed", &err, Message::LoadPostsFailed).await;
                Err(err)
            }
        }
    }

    /// Appends the next page. Returns the number of new posts.
    pub async fn load_more(&self) -> Result<usize> {
        let next = self.state.read().await.page + 1;
        match self.gateway.feed(next, self.page_size).await {
            Ok(page) => {
                let mut state = self.state.write().await;
                state.has_more = page.has_more();
                state.page = next;
                let known: HashSet<PostId> = state.posts.iter().map(|p| p.id).collect();
                let fresh: Vec<Post> = page
                    .posts
                    .into_iter()
                    .filter(|p| !known.contains(&p.id))
                    .collect();
                let added = fresh.len();
                state.posts.extend(fresh);
                Ok(added)
            }
            Err(err) => {
                self.ctx.report("load feed", &err, Message::LoadPostsFailed).await;
                Err(err)
            }
        }
    }

    // ============================================================================
    // Posts
    // ============================================================================

    pub async fn set_post_draft(&self, text: impl Into<String>) {
        self.state.write().await.post_draft = text.into();
    }

    /// Publishes the post draft and inserts the created post at the head.
    pub async fn create_post(&self) -> Result<Post> {
        let content = self.state.read().await.post_draft.trim().to_string();
        if content.is_empty() {
            return Err(CityBuzzError::validation("post content is empty"));
        }
        let user = self.ctx.require_user(Message::LoginToPost).await?;
        let _guard = self
            .in_flight
            .try_begin(FeedAction::CreatePost)
            .ok_or_else(|| CityBuzzError::in_flight("create post"))?;

        match self.ctx.run("create post", self.gateway.create(&content)).await {
            Ok(post) => {
                let post = post.with_author_fallback(Some(&user));
                let mut state = self.state.write().await;
                state.posts.insert(0, post.clone());
                if state.post_draft.trim() == content {
                    state.post_draft.clear();
                }
                tracing::info!(post_id = %post.id, "post created");
                Ok(post)
            }
            Err(err) => {
                self.ctx.report("create post", &err, Message::CreatePostFailed).await;
                Err(err)
            }
        }
    }

    /// Likes or unlikes, depending on the current local flag.
    ///
    /// The flag and counter flip immediately; a failure or timeout flips them
    /// back, unless a refresh landed in between. Returns the new flag.
    pub async fn toggle_like(&self, post_id: PostId) -> Result<bool> {
        self.ctx.require_user(Message::LoginToLike).await?;
        let _guard = self
            .in_flight
            .try_begin(FeedAction::Like(post_id))
            .ok_or_else(|| CityBuzzError::in_flight("like"))?;

        let (was_liked, generation) = {
            let mut state = self.state.write().await;
            let generation = state.generation;
            let post = state
                .post_mut(post_id)
                .ok_or_else(|| CityBuzzError::not_found("post", post_id))?;
            let was_liked = post.is_liked;
            post.set_liked(!was_liked);
            (was_liked, generation)
        };

        let result = if was_liked {
            self.ctx.run("unlike post", self.gateway.unlike(post_id)).await
        } else {
            self.ctx.run("like post", self.gateway.like(post_id)).await
        };

        match result {
            Ok(()) => Ok(!was_liked),
            // "already liked" / "not liked": the server is where we were heading
            Err(CityBuzzError::Api { status: 409, .. }) => Ok(!was_liked),
            Err(err) => {
                let mut state = self.state.write().await;
                if state.generation == generation {
                    if let Some(post) = state.post_mut(post_id) {
                        post.set_liked(was_liked);
                    }
                } else {
                    tracing::debug!(%post_id, "feed refreshed while liking, keeping server state");
                }
                drop(state);
                self.ctx.report("like post", &err, Message::LikeFailed).await;
                Err(err)
            }
        }
    }

    pub async fn toggle_menu(&self, post_id: PostId) -> Option<PostId> {
        let mut state = self.state.write().await;
        state.open_menu = if state.open_menu == Some(post_id) {
            None
        } else {
            Some(post_id)
        };
        state.open_menu
    }

    /// Opens the edit draft for a post owned by the current user.
    pub async fn start_edit(&self, post_id: PostId) -> Result<()> {
        let user = self.ctx.session.current_user().await;
        let mut state = self.state.write().await;
        let post = state
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .ok_or_else(|| CityBuzzError::not_found("post", post_id))?;
        ensure_owner(post.owner_id(), user.as_ref())?;
        let content = post.content.clone();

        state.editing = Some(EditDraft { post_id, content });
        state.open_menu = None;
        Ok(())
    }

    pub async fn set_edit_content(&self, text: impl Into<String>) -> Result<()> {
        let mut state = self.state.write().await;
        let draft = state
            .editing
            .as_mut()
            .ok_or_else(|| CityBuzzError::validation("no post is being edited"))?;
        draft.content = text.into();
        Ok(())
    }

    pub async fn cancel_edit(&self) {
        self.state.write().await.editing = None;
    }

    /// Sends the edit draft. The draft survives a failure so it can be retried.
    pub async fn save_edit(&self) -> Result<Post> {
        let draft = self
            .state
            .read()
            .await
            .editing
            .clone()
            .ok_or_else(|| CityBuzzError::validation("no post is being edited"))?;
        let content = draft.content.trim().to_string();
        if content.is_empty() {
            return Err(CityBuzzError::validation("post content is empty"));
        }
        let _guard = self
            .in_flight
            .try_begin(FeedAction::Edit(draft.post_id))
            .ok_or_else(|| CityBuzzError::in_flight("update post"))?;

        match self
            .ctx
            .run("update post", self.gateway.update(draft.post_id, &content))
            .await
        {
            Ok(()) => {
                let mut state = self.state.write().await;
                if state.editing.as_ref().is_some_and(|e| e.post_id == draft.post_id) {
                    state.editing = None;
                }
                let post = state
                    .post_mut(draft.post_id)
                    .ok_or_else(|| CityBuzzError::not_found("post", draft.post_id))?;
                post.content = content;
                post.updated_at = Some(Utc::now());
                Ok(post.clone())
            }
            Err(err) => {
                self.ctx.report("update post", &err, Message::UpdatePostFailed).await;
                Err(err)
            }
        }
    }

    /// Deletes a post after confirmation. Returns `Ok(false)` if declined.
    pub async fn delete_post(&self, post_id: PostId, confirm: &dyn Confirm) -> Result<bool> {
        let user = self.ctx.require_user(Message::LoginToPost).await?;
        {
            let state = self.state.read().await;
            let post = state
                .posts
                .iter()
                .find(|p| p.id == post_id)
                .ok_or_else(|| CityBuzzError::not_found("post", post_id))?;
            ensure_owner(post.owner_id(), Some(&user))?;
        }
        if !confirm.confirm(Message::ConfirmDeletePost.text(self.ctx.locale())) {
            self.state.write().await.open_menu = None;
            return Ok(false);
        }
        let _guard = self
            .in_flight
            .try_begin(FeedAction::DeletePost(post_id))
            .ok_or_else(|| CityBuzzError::in_flight("delete post"))?;

        match self.ctx.run("delete post", self.gateway.delete(post_id)).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                state.posts.retain(|p| p.id != post_id);
                state.comment_drafts.remove(&post_id);
                state.visible_comments.remove(&post_id);
                state.loaded_comments.remove(&post_id);
                if state.open_menu == Some(post_id) {
                    state.open_menu = None;
                }
                if state.editing.as_ref().is_some_and(|e| e.post_id == post_id) {
                    state.editing = None;
                }
                tracing::info!(%post_id, "post deleted");
                Ok(true)
            }
            Err(err) => {
                self.ctx.report("delete post", &err, Message::DeletePostFailed).await;
                Err(err)
            }
        }
    }

    // ============================================================================
    // Comments
    // ============================================================================

    pub async fn set_comment_draft(&self, post_id: PostId, text: impl Into<String>) {
        self.state
            .write()
            .await
            .comment_drafts
            .insert(post_id, text.into());
    }

    /// Posts the comment draft for `post_id` and appends the server's record.
    ///
    /// Blank drafts are rejected locally. While a submission for the same post
    /// is pending, further submissions fail with `AlreadyInFlight` and send
    /// nothing. The draft is cleared on success and kept on failure.
    pub async fn submit_comment(&self, post_id: PostId) -> Result<Comment> {
        let content = self
            .state
            .read()
            .await
            .comment_drafts
            .get(&post_id)
            .map(|d| d.trim().to_string())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(CityBuzzError::validation("comment is empty"));
        }
        let user = self.ctx.require_user(Message::LoginToComment).await?;
        let _guard = self
            .in_flight
            .try_begin(FeedAction::Comment(post_id))
            .ok_or_else(|| CityBuzzError::in_flight("comment"))?;

        match self
            .ctx
            .run("create comment", self.gateway.create_comment(post_id, &content))
            .await
        {
            Ok(comment) => {
                let comment = comment.with_author_fallback(Some(&user));
                let mut state = self.state.write().await;
                if state
                    .comment_drafts
                    .get(&post_id)
                    .is_some_and(|d| d.trim() == content)
                {
                    state.comment_drafts.remove(&post_id);
                }
                if let Some(post) = state.post_mut(post_id) {
                    post.push_comment(comment.clone());
                }
                Ok(comment)
            }
            Err(err) => {
                self.ctx.report("create comment", &err, Message::CommentFailed).await;
                Err(err)
            }
        }
    }

    /// Shows or hides a post's comments. Returns whether they are now visible.
    ///
    /// Comments are fetched the first time a post is opened after a refresh;
    /// reopening a loaded list costs nothing. Comments posted before the
    /// list was opened do not count as loaded.
    pub async fn toggle_comments(&self, post_id: PostId) -> Result<bool> {
        let needs_fetch = {
            let mut state = self.state.write().await;
            if state.visible_comments.remove(&post_id) {
                return Ok(false);
            }
            if !state.posts.iter().any(|p| p.id == post_id) {
                return Err(CityBuzzError::not_found("post", post_id));
            }
            let needs_fetch = !state.loaded_comments.contains(&post_id);
            state.visible_comments.insert(post_id);
            needs_fetch
        };

        if needs_fetch {
            self.load_comments(post_id).await?;
        }
        Ok(true)
    }

    async fn load_comments(&self, post_id: PostId) -> Result<()> {
        let Some(_guard) = self.in_flight.try_begin(FeedAction::LoadComments(post_id)) else {
            return Ok(());
        };
        match self.gateway.comments(post_id).await {
            Ok(comments) => {
                tracing::debug!(%post_id, count = comments.len(), "comments loaded");
                let mut state = self.state.write().await;
                let Some(post) = state.post_mut(post_id) else {
                    return Ok(());
                };
                post.set_comments(comments);
                state.loaded_comments.insert(post_id);
                Ok(())
            }
            Err(err) => {
                self.ctx.report("load comments", &err, Message::LoadCommentsFailed).await;
                Err(err)
            }
        }
    }

    /// Deletes one of the current user's comments after confirmation.
    pub async fn delete_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
        confirm: &dyn Confirm,
    ) -> Result<bool> {
        let user = self.ctx.require_user(Message::LoginToComment).await?;
        {
            let state = self.state.read().await;
            let comment = state
                .posts
                .iter()
                .find(|p| p.id == post_id)
                .and_then(|p| p.comments.iter().find(|c| c.id == comment_id))
                .ok_or_else(|| CityBuzzError::not_found("comment", comment_id))?;
            ensure_owner(comment.owner_id(), Some(&user))?;
        }
        if !confirm.confirm(Message::ConfirmDeleteComment.text(self.ctx.locale())) {
            return Ok(false);
        }
        let _guard = self
            .in_flight
            .try_begin(FeedAction::DeleteComment(comment_id))
            .ok_or_else(|| CityBuzzError::in_flight("delete comment"))?;

        match self
            .ctx
            .run("delete comment", self.gateway.delete_comment(comment_id))
            .await
        {
            Ok(()) => {
                if let Some(post) = self.state.write().await.post_mut(post_id) {
                    post.remove_comment(comment_id);
                }
                Ok(true)
            }
            Err(err) => {
                self.ctx
                    .report("delete comment", &err, Message::DeleteCommentFailed)
                    .await;
                Err(err)
            }
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub async fn snapshot(&self) -> FeedState {
        self.state.read().await.clone()
    }

    pub async fn posts(&self) -> Vec<Post> {
        self.state.read().await.posts.clone()
    }

    pub async fn post(&self, post_id: PostId) -> Option<Post> {
        self.state
            .read()
            .await
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .cloned()
    }

    pub async fn post_draft(&self) -> String {
        self.state.read().await.post_draft.clone()
    }

    pub async fn comment_draft(&self, post_id: PostId) -> String {
        self.state
            .read()
            .await
            .comment_drafts
            .get(&post_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn editing(&self) -> Option<EditDraft> {
        self.state.read().await.editing.clone()
    }

    pub async fn open_menu(&self) -> Option<PostId> {
        self.state.read().await.open_menu
    }

    pub async fn comments_visible(&self, post_id: PostId) -> bool {
        self.state.read().await.visible_comments.contains(&post_id)
    }

    pub fn is_submitting_comment(&self, post_id: PostId) -> bool {
        self.in_flight.contains(&FeedAction::Comment(post_id))
    }

    pub fn is_like_pending(&self, post_id: PostId) -> bool {
        self.in_flight.contains(&FeedAction::Like(post_id))
    }
}

/// Unknown ownership is left for the server to judge.
fn ensure_owner(owner: Option<UserId>, user: Option<&User>) -> Result<()> {
    match (owner, user) {
        (Some(owner), Some(user)) if owner != user.id => Err(CityBuzzError::validation(
            "only the author can modify this",
        )),
        (Some(_), None) => Err(CityBuzzError::LoginRequired),
        _ => Ok(()),
    }
}
