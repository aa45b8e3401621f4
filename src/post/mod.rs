//! Posting collaborators: where a finished tweet goes.

pub mod twitter;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::schema::tweet::Tweet;

pub use twitter::TwitterPoster;

#[derive(Debug, Error)]
pub enum PostError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API rejected tweet with status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("failed to sign request: {0}")]
    Signing(String),
}

/// What the posting API reported back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostReceipt {
    pub id: Option<String>,
}

#[async_trait]
pub trait Poster: Send + Sync {
    async fn post(&self, tweet: &Tweet) -> Result<PostReceipt, PostError>;
}

/// Logs tweets instead of publishing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunPoster;

#[async_trait]
impl Poster for DryRunPoster {
    async fn post(&self, tweet: &Tweet) -> Result<PostReceipt, PostError> {
        info!(length = tweet.length(), attempts = tweet.attempts, "dry run: {}", tweet);
        Ok(PostReceipt::default())
    }
}
