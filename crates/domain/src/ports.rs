//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::{
    Comment, PostView, PostedReply, ResearchRecord, Sentiment, SubmittedPost, Subreddit,
    SubredditPost,
};

/// Error type for social platform operations
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("API error: {0}")]
    Api(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Rate limited, retry after: {0:?}")]
    RateLimited(Option<Duration>),
    #[error("Network error: {0}")]
    Network(String),
}

/// Port for the social platform the bot posts to
#[async_trait]
pub trait Platform: Send + Sync {
    /// Resolve a subreddit by name, verifying it is accessible
    async fn resolve_subreddit(&self, name: &str) -> Result<Subreddit, PlatformError>;

    /// Fetch up to `limit` currently-hot posts from a subreddit
    async fn hot_posts(
        &self,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<SubredditPost>, PlatformError>;

    /// Submit a self post
    async fn submit_post(
        &self,
        subreddit: &str,
        title: &str,
        body: &str,
    ) -> Result<SubmittedPost, PlatformError>;

    /// Re-fetch the current view of a submitted post
    async fn fetch_post(&self, post_id: &str) -> Result<PostView, PlatformError>;

    /// List every comment currently visible on a post, with collapsed
    /// subtrees expanded and the tree flattened
    async fn comments(&self, post_id: &str) -> Result<Vec<Comment>, PlatformError>;

    /// Post a reply to a comment
    async fn reply(&self, comment_id: &str, text: &str) -> Result<PostedReply, PlatformError>;
}

/// Error type for text generation
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("API error: {0}")]
    Api(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Timeout")]
    Timeout,
    #[error("Empty response")]
    Empty,
}

/// Port for LLM-backed text generation. Provider-specific sampling
/// parameters are fixed when the adapter is constructed.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Port for lexical sentiment scoring
pub trait SentimentAnalyzer: Send + Sync {
    fn score(&self, text: &str) -> Sentiment;
}

/// Error type for research record persistence
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Port for persisting the research record at run end
#[async_trait]
pub trait ResearchStore: Send + Sync {
    async fn save(&self, record: &ResearchRecord) -> Result<(), StoreError>;
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Port for cooperative suspension, so the monitoring loop and the outbound
/// rate limiter can be driven without real delays in tests
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
