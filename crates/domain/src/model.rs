//! Domain models and value objects

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A resolved subreddit handle
#[derive(Debug, Clone)]
pub struct Subreddit {
    /// Display name without the r/ prefix
    pub name: String,
    /// Human-readable subreddit title
    pub title: String,
    /// Subscriber count at resolution time
    pub subscribers: u64,
}

/// A post fetched from the target subreddit, used as style-sample material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubredditPost {
    pub title: String,
    pub body: String,
    pub score: i64,
}

/// The bot's own post, as acknowledged by the platform at submission
#[derive(Debug, Clone)]
pub struct SubmittedPost {
    /// Platform-assigned post ID
    pub id: String,
}

/// Refreshed view of the submitted post during monitoring
#[derive(Debug, Clone)]
pub struct PostView {
    pub id: String,
    /// Current post score, the baseline for reply worthiness
    pub score: i64,
    /// Whether the platform reports the post as removed
    pub removed: bool,
}

/// A comment visible on the monitored thread; the platform adapter has
/// already expanded collapsed subtrees and flattened the tree
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub score: i64,
    pub created_at: OffsetDateTime,
}

/// A reply posted by the bot, as acknowledged by the platform
#[derive(Debug, Clone)]
pub struct PostedReply {
    pub id: String,
}

/// Sentiment scores for a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// Negative to positive, -1.0..=1.0
    pub polarity: f64,
    /// Objective to subjective, 0.0..=1.0
    pub subjectivity: f64,
}

impl Sentiment {
    pub const NEUTRAL: Sentiment = Sentiment {
        polarity: 0.0,
        subjectivity: 0.0,
    };
}

/// Lifecycle of the submitted post; the only transition is active -> removed,
/// observed via polling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Active,
    Removed,
}

/// Snapshot of the submitted post inside the research record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSnapshot {
    /// Platform-assigned post ID
    pub id: String,
    /// Full drafted content, title line included
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub status: PostStatus,
}

/// Who authored a recorded interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionOrigin {
    Human,
    Bot,
}

/// One observed comment or one posted reply; append-only. A comment and the
/// bot's reply to it are recorded as separate snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionSnapshot {
    /// Platform-assigned comment ID
    pub id: String,
    pub content: String,
    pub upvotes: i64,
    pub sentiment: Sentiment,
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
    pub origin: InteractionOrigin,
}

/// The persisted log of one research run. Created once, mutated by appending
/// interactions, written once at run end, never resumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchRecord {
    pub research_id: String,
    pub original_prompt: String,
    pub subreddit: String,
    pub style_guide: String,
    pub post: PostSnapshot,
    pub interactions: Vec<InteractionSnapshot>,
}

impl ResearchRecord {
    /// Number of bot-authored replies recorded so far
    pub fn bot_reply_count(&self) -> usize {
        self.interactions
            .iter()
            .filter(|i| i.origin == InteractionOrigin::Bot)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ResearchRecord {
        ResearchRecord {
            research_id: "research_1700000000".to_string(),
            original_prompt: "What features do users want?".to_string(),
            subreddit: "smartphones".to_string(),
            style_guide: "Short titles, direct questions".to_string(),
            post: PostSnapshot {
                id: "abc123".to_string(),
                content: "Title\nBody".to_string(),
                created_at: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
                status: PostStatus::Active,
            },
            interactions: vec![
                InteractionSnapshot {
                    id: "c1".to_string(),
                    content: "Great question".to_string(),
                    upvotes: 12,
                    sentiment: Sentiment {
                        polarity: 0.6,
                        subjectivity: 0.4,
                    },
                    recorded_at: OffsetDateTime::from_unix_timestamp(1_700_000_100).unwrap(),
                    origin: InteractionOrigin::Human,
                },
                InteractionSnapshot {
                    id: "r1".to_string(),
                    content: "Thanks for weighing in".to_string(),
                    upvotes: 0,
                    sentiment: Sentiment::NEUTRAL,
                    recorded_at: OffsetDateTime::from_unix_timestamp(1_700_000_200).unwrap(),
                    origin: InteractionOrigin::Bot,
                },
            ],
        }
    }

    #[test]
    fn bot_reply_count_only_counts_bot_origin() {
        assert_eq!(sample_record().bot_reply_count(), 1);
    }

    #[test]
    fn record_serialization_is_deterministic() {
        let record = sample_record();
        let first = serde_json::to_string_pretty(&record).unwrap();
        let second = serde_json::to_string_pretty(&record).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn post_status_serializes_lowercase() {
        let json = serde_json::to_string(&PostStatus::Removed).unwrap();
        assert_eq!(json, "\"removed\"");
        let json = serde_json::to_string(&InteractionOrigin::Human).unwrap();
        assert_eq!(json, "\"human\"");
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        let parsed: ResearchRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.research_id, record.research_id);
        assert_eq!(parsed.interactions.len(), 2);
        assert_eq!(parsed.post.status, PostStatus::Active);
    }
}
