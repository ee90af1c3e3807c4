//! Post domain module.
//!
//! # Module Structure
//!
//! - `model`: Posts, comments and feed pages
//! - `gateway`: Backend contract for the post and comment endpoints

mod gateway;
mod model;

pub use gateway::PostGateway;
pub use model::{Comment, CommentId, FeedPage, Post, PostId};
