//! `PostGateway` over the REST API.

use crate::api::{ApiClient, Endpoint};
use crate::dto::{CommentData, CommentsData, FeedData, PostData};
use async_trait::async_trait;
use citybuzz_core::error::Result;
use citybuzz_core::post::{Comment, CommentId, FeedPage, Post, PostGateway, PostId};
use serde::Serialize;

#[derive(Serialize)]
struct ContentBody<'a> {
    content: &'a str,
}

#[derive(Clone)]
pub struct HttpPostGateway {
    api: ApiClient,
}

impl HttpPostGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PostGateway for HttpPostGateway {
    async fn feed(&self, page: u32, limit: u32) -> Result<FeedPage> {
        let endpoint = Endpoint::get("/posts")
            .query("page", page)
            .query("limit", limit);
        let data: FeedData = self.api.fetch(endpoint, "posts").await?;
        Ok(data.into())
    }

    async fn create(&self, content: &str) -> Result<Post> {
        let data: PostData = self
            .api
            .submit(Endpoint::post("/posts"), &ContentBody { content }, "post")
            .await?;
        Ok(data.post)
    }

    async fn update(&self, post_id: PostId, content: &str) -> Result<()> {
        self.api
            .call(
                Endpoint::put(format!("/posts/{post_id}")),
                Some(&ContentBody { content }),
            )
            .await
    }

    async fn delete(&self, post_id: PostId) -> Result<()> {
        self.api
            .call(Endpoint::delete(format!("/posts/{post_id}")), None::<&()>)
            .await
    }

    async fn like(&self, post_id: PostId) -> Result<()> {
        self.api
            .call(Endpoint::post(format!("/posts/{post_id}/like")), None::<&()>)
            .await
    }

    async fn unlike(&self, post_id: PostId) -> Result<()> {
        self.api
            .call(Endpoint::delete(format!("/posts/{post_id}/like")), None::<&()>)
            .await
    }

    async fn comments(&self, post_id: PostId) -> Result<Vec<Comment>> {
        let data: CommentsData = self
            .api
            .fetch(Endpoint::get(format!("/posts/{post_id}/comments")), "comments")
            .await?;
        Ok(data.comments.unwrap_or_default())
    }

    async fn create_comment(&self, post_id: PostId, content: &str) -> Result<Comment> {
        let data: CommentData = self
            .api
            .submit(
                Endpoint::post(format!("/posts/{post_id}/comments")),
                &ContentBody { content },
                "comment",
            )
            .await?;
        Ok(data.comment)
    }

    async fn delete_comment(&self, comment_id: CommentId) -> Result<()> {
        self.api
            .call(Endpoint::delete(format!("/comments/{comment_id}")), None::<&()>)
            .await
    }
}
