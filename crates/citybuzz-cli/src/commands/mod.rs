pub mod auth;
pub mod events;
pub mod feed;
pub mod news;
