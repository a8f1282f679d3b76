//! Style analysis use case - summarizes how the target subreddit writes

use crate::{
    model::SubredditPost,
    ports::{Platform, TextGenerator},
};

/// Configuration for style analysis
#[derive(Debug, Clone)]
pub struct StyleConfig {
    /// How many hot posts to sample
    pub sample_limit: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self { sample_limit: 10 }
    }
}

/// Use case for deriving a free-text style guide from recent posts.
///
/// Best effort: any platform or generation failure degrades to an empty
/// style guide with a warning, never an error.
pub struct StyleAnalyzer<'a, P: ?Sized, G: ?Sized> {
    platform: &'a P,
    generator: &'a G,
    config: StyleConfig,
}

impl<'a, P, G> StyleAnalyzer<'a, P, G>
where
    P: Platform + ?Sized,
    G: TextGenerator + ?Sized,
{
    pub fn new(platform: &'a P, generator: &'a G, config: StyleConfig) -> Self {
        Self {
            platform,
            generator,
            config,
        }
    }

    /// Derive a posting style guide for a subreddit
    pub async fn analyze(&self, subreddit: &str) -> String {
        let posts = match self
            .platform
            .hot_posts(subreddit, self.config.sample_limit)
            .await
        {
            Ok(posts) => posts,
            Err(error) => {
                tracing::warn!(
                    subreddit = %subreddit,
                    error = %error,
                    "Failed to sample posts for style analysis, using empty style guide"
                );
                return String::new();
            }
        };

        tracing::info!(
            subreddit = %subreddit,
            sample_count = posts.len(),
            "Analyzing subreddit style"
        );

        let prompt = build_style_prompt(&posts);
        match self.generator.generate(&prompt).await {
            Ok(guide) => guide,
            Err(error) => {
                tracing::warn!(
                    subreddit = %subreddit,
                    error = %error,
                    "Style generation failed, using empty style guide"
                );
                String::new()
            }
        }
    }
}

/// Build the style-analysis prompt from sampled posts
pub fn build_style_prompt(posts: &[SubredditPost]) -> String {
    let rendered = serde_json::to_string_pretty(posts).unwrap_or_default();

    format!(
        "Analyze these recent posts and identify:\n\
         1. Common writing styles\n\
         2. Typical post structure\n\
         3. Popular phrases and terminology\n\
         4. Engagement patterns\n\
         \n\
         Posts:\n\
         {rendered}\n\
         \n\
         Provide a structured template for creating posts in this subreddit.\n"
    )
}
