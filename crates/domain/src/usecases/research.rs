//! Research run use case - orchestrates drafting, posting, and the
//! comment-monitoring loop for one session

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    model::{
        InteractionOrigin, InteractionSnapshot, PostSnapshot, PostStatus, ResearchRecord,
    },
    ports::{Clock, Platform, PlatformError, ResearchStore, SentimentAnalyzer, Sleeper, TextGenerator},
    usecases::{
        draft::PostDrafter,
        reply::{ReplyDrafter, ReplyPolicy, worthy},
        style::{StyleAnalyzer, StyleConfig},
    },
};

/// Configuration for one research run
#[derive(Debug, Clone)]
pub struct ResearchConfig {
    /// How long to monitor the thread after posting
    pub monitoring_duration: Duration,
    /// Sleep between polling passes
    pub check_interval: Duration,
    /// Cap on bot-authored replies for the whole thread
    pub max_replies_per_thread: usize,
    /// Reply-worthiness thresholds
    pub reply_policy: ReplyPolicy,
    /// Style-sampling settings
    pub style: StyleConfig,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            monitoring_duration: Duration::from_secs(21_600),
            check_interval: Duration::from_secs(3_600),
            max_replies_per_thread: 4,
            reply_policy: ReplyPolicy::default(),
            style: StyleConfig::default(),
        }
    }
}

/// Fatal errors of a research run. Everything else is logged and absorbed
/// by the next polling pass.
#[derive(Debug, thiserror::Error)]
pub enum ResearchError {
    #[error("subreddit '{name}' is not accessible: {source}")]
    PlatformUnavailable {
        name: String,
        source: PlatformError,
    },
    #[error("post submission failed: {0}")]
    SubmissionFailed(PlatformError),
}

/// Why the monitoring loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// Monitoring duration elapsed
    Expired,
    /// The platform reported the post removed
    PostRemoved,
}

enum PassOutcome {
    Continue,
    PostRemoved,
}

/// Research run orchestrator
#[derive(Clone)]
pub struct ResearchRun<P, G, A, R, C, Sl>
where
    P: Platform + ?Sized,
    G: TextGenerator + ?Sized,
    A: SentimentAnalyzer + ?Sized,
    R: ResearchStore + ?Sized,
    C: Clock + ?Sized,
    Sl: Sleeper + ?Sized,
{
    platform: Arc<P>,
    generator: Arc<G>,
    sentiment: Arc<A>,
    store: Arc<R>,
    clock: Arc<C>,
    sleeper: Arc<Sl>,
    config: ResearchConfig,
}

impl<P, G, A, R, C, Sl> ResearchRun<P, G, A, R, C, Sl>
where
    P: Platform + ?Sized,
    G: TextGenerator + ?Sized,
    A: SentimentAnalyzer + ?Sized,
    R: ResearchStore + ?Sized,
    C: Clock + ?Sized,
    Sl: Sleeper + ?Sized,
{
    pub fn new(
        platform: Arc<P>,
        generator: Arc<G>,
        sentiment: Arc<A>,
        store: Arc<R>,
        clock: Arc<C>,
        sleeper: Arc<Sl>,
        config: ResearchConfig,
    ) -> Self {
        Self {
            platform,
            generator,
            sentiment,
            store,
            clock,
            sleeper,
            config,
        }
    }

    /// Run one complete research session. Returns the research id once the
    /// post has been submitted; only an unresolvable subreddit or a failed
    /// submission turn the run into an error.
    pub async fn run(
        &self,
        research_prompt: &str,
        subreddit_name: &str,
        research_id: Option<String>,
    ) -> Result<String, ResearchError> {
        let research_id = research_id
            .unwrap_or_else(|| format!("research_{}", self.clock.now().unix_timestamp()));

        let subreddit = self
            .platform
            .resolve_subreddit(subreddit_name)
            .await
            .map_err(|source| ResearchError::PlatformUnavailable {
                name: subreddit_name.to_string(),
                source,
            })?;

        tracing::info!(
            research_id = %research_id,
            subreddit = %subreddit.name,
            subscribers = subreddit.subscribers,
            "Starting research run"
        );

        let style_guide = StyleAnalyzer::new(
            self.platform.as_ref(),
            self.generator.as_ref(),
            self.config.style.clone(),
        )
        .analyze(subreddit_name)
        .await;

        let draft = PostDrafter::new(self.generator.as_ref())
            .draft(&style_guide, research_prompt)
            .await;

        let submitted = self
            .platform
            .submit_post(subreddit_name, &draft.title, &draft.body)
            .await
            .map_err(ResearchError::SubmissionFailed)?;

        tracing::info!(
            research_id = %research_id,
            post_id = %submitted.id,
            title = %draft.title,
            "Submitted research post"
        );

        let mut record = ResearchRecord {
            research_id: research_id.clone(),
            original_prompt: research_prompt.to_string(),
            subreddit: subreddit_name.to_string(),
            style_guide,
            post: PostSnapshot {
                id: submitted.id,
                content: draft.content.clone(),
                created_at: self.clock.now(),
                status: PostStatus::Active,
            },
            interactions: Vec::new(),
        };

        let outcome = self.monitor(&mut record, &draft.content).await;

        tracing::info!(
            research_id = %record.research_id,
            outcome = ?outcome,
            interactions = record.interactions.len(),
            "Monitoring finished"
        );

        // Submission succeeded, so the run is reported as successful even if
        // the final write fails; the platform-side artifacts already exist.
        if let Err(error) = self.store.save(&record).await {
            tracing::error!(
                research_id = %record.research_id,
                error = %error,
                "Failed to persist research record"
            );
        }

        Ok(research_id)
    }

    /// The polling state machine: poll -> sleep until the duration elapses
    /// or the post is reported removed. Pass failures are logged and treated
    /// as no-op passes.
    async fn monitor(&self, record: &mut ResearchRecord, post_content: &str) -> MonitorOutcome {
        let started = self.clock.now();
        let mut replied: HashSet<String> = HashSet::new();
        let mut replies_posted = 0usize;

        loop {
            if self.clock.now() - started >= self.config.monitoring_duration {
                return MonitorOutcome::Expired;
            }

            match self
                .poll_pass(record, post_content, &mut replied, &mut replies_posted)
                .await
            {
                Ok(PassOutcome::PostRemoved) => return MonitorOutcome::PostRemoved,
                Ok(PassOutcome::Continue) => {}
                Err(error) => {
                    tracing::warn!(
                        post_id = %record.post.id,
                        error = %error,
                        "Monitoring pass failed, retrying next interval"
                    );
                }
            }

            self.sleeper.sleep(self.config.check_interval).await;
        }
    }

    async fn poll_pass(
        &self,
        record: &mut ResearchRecord,
        post_content: &str,
        replied: &mut HashSet<String>,
        replies_posted: &mut usize,
    ) -> Result<PassOutcome, PlatformError> {
        let view = self.platform.fetch_post(&record.post.id).await?;

        if view.removed {
            tracing::warn!(post_id = %view.id, "Post was removed by moderators");
            record.post.status = PostStatus::Removed;
            return Ok(PassOutcome::PostRemoved);
        }

        let comments = self.platform.comments(&record.post.id).await?;
        tracing::debug!(
            post_id = %view.id,
            post_score = view.score,
            comment_count = comments.len(),
            "Polling pass"
        );

        for comment in comments {
            if replied.contains(&comment.id) {
                continue;
            }
            if !worthy(comment.score, view.score, &self.config.reply_policy) {
                continue;
            }

            // Worthy comments are recorded once per pass; only replies are
            // deduplicated, so a long-lived worthy comment accumulates a
            // snapshot on every pass until it gets a reply.
            record.interactions.push(InteractionSnapshot {
                id: comment.id.clone(),
                content: comment.body.clone(),
                upvotes: comment.score,
                sentiment: self.sentiment.score(&comment.body),
                recorded_at: comment.created_at,
                origin: InteractionOrigin::Human,
            });

            if *replies_posted >= self.config.max_replies_per_thread {
                continue;
            }

            let reply_text = ReplyDrafter::new(self.generator.as_ref())
                .draft(post_content, &comment.body)
                .await;

            match self.platform.reply(&comment.id, &reply_text).await {
                Ok(posted) => {
                    record.interactions.push(InteractionSnapshot {
                        id: posted.id.clone(),
                        content: reply_text.clone(),
                        upvotes: 0,
                        sentiment: self.sentiment.score(&reply_text),
                        recorded_at: self.clock.now(),
                        origin: InteractionOrigin::Bot,
                    });
                    replied.insert(comment.id.clone());
                    replied.insert(posted.id);
                    *replies_posted += 1;
                }
                Err(error) => {
                    // Not added to the dedup set, so the next pass retries.
                    tracing::warn!(
                        comment_id = %comment.id,
                        error = %error,
                        "Failed to post reply, skipping"
                    );
                }
            }
        }

        Ok(PassOutcome::Continue)
    }
}
