//! Post and comment models.

use crate::user::{User, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PostId = Uuid;
pub type CommentId = Uuid;

/// A feed post.
///
/// `likes_count`, `comments_count` and `is_liked` are server-owned; the client
/// only adjusts them optimistically and a refetch always overwrites them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub content: String,
    #[serde(default)]
    pub likes_count: u32,
    #[serde(default)]
    pub comments_count: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    /// Whether the current user likes this post
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    /// Owner id, taken from `user_id` or from the embedded author.
    pub fn owner_id(&self) -> Option<UserId> {
        self.user_id.or_else(|| self.author.as_ref().map(|a| a.id))
    }

    /// Sets the like flag and moves the counter by one if the flag changed.
    pub fn set_liked(&mut self, liked: bool) {
        if self.is_liked == liked {
            return;
        }
        self.is_liked = liked;
        self.likes_count = if liked {
            self.likes_count.saturating_add(1)
        } else {
            self.likes_count.saturating_sub(1)
        };
    }

    /// Fills in the author when the server response omitted it.
    pub fn with_author_fallback(mut self, fallback: Option<&User>) -> Self {
        if self.author.is_none() {
            self.author = fallback.cloned();
        }
        self
    }

    /// Replaces the comment list and keeps the counter in step with it.
    pub fn set_comments(&mut self, comments: Vec<Comment>) {
        self.comments = comments;
        self.comments_count = self.comments.len() as u32;
    }

    /// Appends a comment at the tail. The counter never drops below the list length.
    pub fn push_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
        self.comments_count = self
            .comments_count
            .saturating_add(1)
            .max(self.comments.len() as u32);
    }

    /// Removes a comment; returns false if it was not in the list.
    pub fn remove_comment(&mut self, comment_id: CommentId) -> bool {
        let before = self.comments.len();
        self.comments.retain(|c| c.id != comment_id);
        let removed = self.comments.len() != before;
        if removed {
            self.comments_count = self.comments_count.saturating_sub(1);
        }
        removed
    }
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    pub content: String,
    #[serde(default)]
    pub likes_count: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(default)]
    pub is_liked: bool,
}

impl Comment {
    pub fn owner_id(&self) -> Option<UserId> {
        self.user_id.or_else(|| self.author.as_ref().map(|a| a.id))
    }

    pub fn with_author_fallback(mut self, fallback: Option<&User>) -> Self {
        if self.author.is_none() {
            self.author = fallback.cloned();
        }
        self
    }
}

/// One page of the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    pub page: u32,
    pub limit: u32,
}

impl FeedPage {
    /// A short page means the feed is exhausted.
    pub fn has_more(&self) -> bool {
        self.posts.len() as u32 >= self.limit && !self.posts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(likes: u32, liked: bool) -> Post {
        Post {
            id: Uuid::new_v4(),
            user_id: None,
            content: "Marché du Vieux-Marché ce matin".to_string(),
            likes_count: likes,
            comments_count: 0,
            created_at: Utc::now(),
            updated_at: None,
            author: None,
            is_liked: liked,
            comments: Vec::new(),
        }
    }

    fn comment(content: &str) -> Comment {
        Comment {
            id: Uuid::new_v4(),
            post_id: None,
            user_id: None,
            content: content.to_string(),
            likes_count: 0,
            created_at: Utc::now(),
            author: None,
            is_liked: false,
        }
    }

    #[test]
    fn test_set_liked_moves_counter_once() {
        let mut p = post(3, false);
        p.set_liked(true);
        assert_eq!(p.likes_count, 4);
        p.set_liked(true);
        assert_eq!(p.likes_count, 4);
        p.set_liked(false);
        assert_eq!(p.likes_count, 3);
    }

    #[test]
    fn test_unlike_never_underflows() {
        let mut p = post(0, true);
        p.set_liked(false);
        assert_eq!(p.likes_count, 0);
        assert!(!p.is_liked);
    }

    #[test]
    fn test_comment_counter_tracks_list() {
        let mut p = post(0, false);
        let first = comment("Super !");
        let first_id = first.id;
        p.push_comment(first);
        p.push_comment(comment("J'y serai"));
        assert_eq!(p.comments_count, 2);

        assert!(p.remove_comment(first_id));
        assert!(!p.remove_comment(first_id));
        assert_eq!(p.comments_count, 1);
        assert_eq!(p.comments[0].content, "J'y serai");
    }

    #[test]
    fn test_feed_page_has_more() {
        let page = FeedPage {
            posts: vec![post(0, false), post(0, false)],
            page: 1,
            limit: 2,
        };
        assert!(page.has_more());

        let last = FeedPage {
            posts: vec![post(0, false)],
            page: 2,
            limit: 2,
        };
        assert!(!last.has_more());
    }
}
