//! WordPress integration.
//!
//! [`CmsApi`] is the transport seam; [`WordPressClient`] implements it over
//! the WordPress REST API with the JWT auth plugin. The components on top
//! apply the status policy of each stage:
//!
//! - [`AuthClient`] turns credentials into an [`AuthToken`](crate::core::AuthToken)
//! - [`CategoryResolver`] maps a category name to its id
//! - [`BatchPublisher`] posts articles in paced chunks and records outcomes

mod auth;
mod categories;
mod client;
mod publisher;

pub use auth::AuthClient;
pub use categories::CategoryResolver;
pub use client::{CmsApi, CmsResponse, NewPost, WordPressClient};
pub use publisher::{
    chunk_articles, chunk_count, BatchPublisher, DEFAULT_CHUNK_SIZE, DEFAULT_PUBLISH_INTERVAL,
};

#[cfg(test)]
pub use client::MockCmsApi;
