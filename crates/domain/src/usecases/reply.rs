//! Reply engine - decides which comments merit a reply and drafts one

use crate::ports::TextGenerator;

/// Score thresholds a comment must clear before the bot replies
#[derive(Debug, Clone)]
pub struct ReplyPolicy {
    /// Absolute score floor
    pub min_upvotes: i64,
    /// Fraction of the post score a comment must exceed
    pub upvote_ratio_threshold: f64,
}

impl Default for ReplyPolicy {
    fn default() -> Self {
        Self {
            min_upvotes: 5,
            upvote_ratio_threshold: 0.05,
        }
    }
}

/// Reply-worthiness predicate. Both inequalities are strict: a comment
/// sitting exactly on either threshold is not worthy.
pub fn worthy(comment_score: i64, post_score: i64, policy: &ReplyPolicy) -> bool {
    comment_score > policy.min_upvotes
        && comment_score as f64 > post_score as f64 * policy.upvote_ratio_threshold
}

/// Use case for drafting a reply from the thread context.
///
/// Generation failure degrades to an empty reply, which is still submitted.
pub struct ReplyDrafter<'a, G: ?Sized> {
    generator: &'a G,
}

impl<'a, G: TextGenerator + ?Sized> ReplyDrafter<'a, G> {
    pub fn new(generator: &'a G) -> Self {
        Self { generator }
    }

    pub async fn draft(&self, post_content: &str, comment_body: &str) -> String {
        let prompt = build_reply_prompt(post_content, comment_body);
        match self.generator.generate(&prompt).await {
            Ok(reply) => reply,
            Err(error) => {
                tracing::warn!(error = %error, "Reply generation failed, using empty reply");
                String::new()
            }
        }
    }
}

/// Build the reply-drafting prompt
pub fn build_reply_prompt(post_content: &str, comment_body: &str) -> String {
    format!(
        "Based on this conversation context:\n\
         Original Post: {post_content}\n\
         \n\
         Comment: {comment_body}\n\
         \n\
         Generate a thoughtful and engaging reply that adds value to the discussion.\n"
    )
}
