//! Reddit API platform adapter

use async_trait::async_trait;
use reddit_research_domain::{
    Comment, Platform, PlatformError, PostView, PostedReply, Sleeper, SubmittedPost, Subreddit,
    SubredditPost, TokioSleeper,
};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

use super::auth::{RedditCredentials, TokenSource};
use super::rate_limit::MinIntervalLimiter;

const API_BASE_URL: &str = "https://oauth.reddit.com";
const AUTH_BASE_URL: &str = "https://www.reddit.com";

/// Reddit caps morechildren lookups at 100 ids per request
const MORE_CHILDREN_BATCH: usize = 100;

/// Reddit platform client implementing the domain `Platform` port
pub struct RedditPlatform {
    client: Client,
    tokens: TokenSource,
    api_base_url: String,
    limiter: MinIntervalLimiter,
}

impl RedditPlatform {
    pub fn new(credentials: RedditCredentials, rate_limit_delay: Duration) -> Self {
        Self::with_base_urls(
            credentials,
            API_BASE_URL.to_string(),
            AUTH_BASE_URL.to_string(),
            rate_limit_delay,
            Arc::new(TokioSleeper),
        )
    }

    pub fn with_base_urls(
        credentials: RedditCredentials,
        api_base_url: String,
        auth_base_url: String,
        rate_limit_delay: Duration,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let client = Client::builder()
            .user_agent(&credentials.user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        let tokens = TokenSource::new(client.clone(), credentials, auth_base_url);

        Self {
            client,
            tokens,
            api_base_url,
            limiter: MinIntervalLimiter::new(rate_limit_delay, sleeper),
        }
    }

    async fn get_authed(&self, path_and_query: &str) -> Result<Response, PlatformError> {
        self.limiter.acquire().await;
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .get(format!("{}{}", self.api_base_url, path_and_query))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PlatformError::Network(e.to_string()))?;

        check_status(response, path_and_query).await
    }

    async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<Response, PlatformError> {
        self.limiter.acquire().await;
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .post(format!("{}{}", self.api_base_url, path))
            .bearer_auth(token)
            .form(form)
            .send()
            .await
            .map_err(|e| PlatformError::Network(e.to_string()))?;

        check_status(response, path).await
    }
}

async fn check_status(response: Response, endpoint: &str) -> Result<Response, PlatformError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == 401 {
        return Err(PlatformError::Auth("Invalid access token".to_string()));
    }

    if status == 403 || status == 404 {
        return Err(PlatformError::NotFound(endpoint.to_string()));
    }

    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs);
        return Err(PlatformError::RateLimited(retry_after));
    }

    let body = response.text().await.unwrap_or_default();
    Err(PlatformError::Api(format!(
        "{endpoint} returned {status}: {body}"
    )))
}

fn parse_error(context: &str, error: impl std::fmt::Display) -> PlatformError {
    PlatformError::Api(format!("Failed to parse {context}: {error}"))
}

#[derive(Debug, Deserialize)]
struct Thing {
    kind: String,
    data: Value,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct SubredditAbout {
    display_name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    subscribers: u64,
}

#[derive(Debug, Deserialize)]
struct PostData {
    id: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    removed_by_category: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HotPostData {
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    score: i64,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    id: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    created_utc: f64,
    /// Nested listing, or `""` when the subtree is empty
    #[serde(default)]
    replies: Value,
}

#[derive(Debug, Deserialize)]
struct MoreData {
    #[serde(default)]
    children: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiJsonEnvelope {
    json: ApiJsonBody,
}

#[derive(Debug, Deserialize)]
struct ApiJsonBody {
    #[serde(default)]
    errors: Vec<Value>,
    #[serde(default)]
    data: Option<Value>,
}

impl ApiJsonEnvelope {
    fn into_data(self, endpoint: &str) -> Result<Value, PlatformError> {
        if !self.json.errors.is_empty() {
            return Err(PlatformError::Api(format!(
                "{endpoint} rejected: {:?}",
                self.json.errors
            )));
        }
        self.json
            .data
            .ok_or_else(|| PlatformError::Api(format!("{endpoint} response missing data")))
    }
}

/// Walk a comment listing depth-first, flattening `t1` comments and
/// collecting unresolved `more` stubs for follow-up expansion
fn collect_things(things: Vec<Thing>, out: &mut Vec<Comment>, more_ids: &mut Vec<String>) {
    for thing in things {
        match thing.kind.as_str() {
            "t1" => {
                let Ok(data) = serde_json::from_value::<CommentData>(thing.data) else {
                    continue;
                };
                let CommentData {
                    id,
                    body,
                    score,
                    created_utc,
                    replies,
                } = data;

                out.push(Comment {
                    id,
                    body,
                    score,
                    created_at: OffsetDateTime::from_unix_timestamp(created_utc as i64)
                        .unwrap_or(OffsetDateTime::UNIX_EPOCH),
                });

                if replies.is_object() {
                    if let Ok(listing) = serde_json::from_value::<Listing>(replies) {
                        collect_things(listing.data.children, out, more_ids);
                    }
                }
            }
            "more" => {
                if let Ok(data) = serde_json::from_value::<MoreData>(thing.data) {
                    more_ids.extend(data.children);
                }
            }
            _ => {}
        }
    }
}

#[async_trait]
impl Platform for RedditPlatform {
    async fn resolve_subreddit(&self, name: &str) -> Result<Subreddit, PlatformError> {
        let response = self.get_authed(&format!("/r/{name}/about")).await?;

        let thing: Thing = response
            .json()
            .await
            .map_err(|e| parse_error("subreddit info", e))?;
        let about: SubredditAbout =
            serde_json::from_value(thing.data).map_err(|e| parse_error("subreddit info", e))?;

        tracing::debug!(
            subreddit = %about.display_name,
            subscribers = about.subscribers,
            "Resolved subreddit"
        );

        Ok(Subreddit {
            name: about.display_name,
            title: about.title,
            subscribers: about.subscribers,
        })
    }

    async fn hot_posts(
        &self,
        subreddit: &str,
        limit: u32,
    ) -> Result<Vec<SubredditPost>, PlatformError> {
        let response = self
            .get_authed(&format!("/r/{subreddit}/hot?limit={limit}"))
            .await?;

        let listing: Listing = response
            .json()
            .await
            .map_err(|e| parse_error("hot listing", e))?;

        let posts: Vec<SubredditPost> = listing
            .data
            .children
            .into_iter()
            .filter(|thing| thing.kind == "t3")
            .filter_map(|thing| serde_json::from_value::<HotPostData>(thing.data).ok())
            .map(|post| SubredditPost {
                title: post.title,
                body: post.selftext,
                score: post.score,
            })
            .collect();

        tracing::info!(
            subreddit = %subreddit,
            count = posts.len(),
            "Fetched hot posts"
        );

        Ok(posts)
    }

    async fn submit_post(
        &self,
        subreddit: &str,
        title: &str,
        body: &str,
    ) -> Result<SubmittedPost, PlatformError> {
        let form = [
            ("api_type", "json"),
            ("sr", subreddit),
            ("kind", "self"),
            ("title", title),
            ("text", body),
        ];

        let response = self.post_form("/api/submit", &form).await?;
        let envelope: ApiJsonEnvelope = response
            .json()
            .await
            .map_err(|e| parse_error("submit response", e))?;
        let data = envelope.into_data("/api/submit")?;

        let id = data
            .get("id")
            .and_then(Value::as_str)
            .or_else(|| data.get("name").and_then(Value::as_str))
            .ok_or_else(|| PlatformError::Api("Submit response missing post id".to_string()))?
            .trim_start_matches("t3_")
            .to_string();

        tracing::info!(subreddit = %subreddit, post_id = %id, "Submitted post");

        Ok(SubmittedPost { id })
    }

    async fn fetch_post(&self, post_id: &str) -> Result<PostView, PlatformError> {
        let response = self.get_authed(&format!("/comments/{post_id}?limit=1")).await?;

        let listings: Vec<Listing> = response
            .json()
            .await
            .map_err(|e| parse_error("post view", e))?;

        let post_thing = listings
            .into_iter()
            .next()
            .and_then(|listing| listing.data.children.into_iter().next())
            .ok_or_else(|| PlatformError::Api("Post listing was empty".to_string()))?;

        let post: PostData =
            serde_json::from_value(post_thing.data).map_err(|e| parse_error("post view", e))?;

        Ok(PostView {
            id: post.id,
            score: post.score,
            removed: post.removed_by_category.is_some(),
        })
    }

    async fn comments(&self, post_id: &str) -> Result<Vec<Comment>, PlatformError> {
        let response = self
            .get_authed(&format!("/comments/{post_id}?limit=500"))
            .await?;

        let mut listings: Vec<Listing> = response
            .json()
            .await
            .map_err(|e| parse_error("comment listing", e))?;

        if listings.len() < 2 {
            return Err(PlatformError::Api(
                "Comment listing missing from response".to_string(),
            ));
        }
        let comment_listing = listings.remove(1);

        let mut comments = Vec::new();
        let mut more_ids = Vec::new();
        collect_things(comment_listing.data.children, &mut comments, &mut more_ids);

        // keep resolving "more" stubs until every collapsed subtree is expanded
        while !more_ids.is_empty() {
            let batch_len = more_ids.len().min(MORE_CHILDREN_BATCH);
            let batch: Vec<String> = more_ids.drain(..batch_len).collect();
            let children = batch.join(",");

            let response = self
                .get_authed(&format!(
                    "/api/morechildren?api_type=json&link_id=t3_{post_id}&children={children}"
                ))
                .await?;

            let envelope: MoreChildrenEnvelope = response
                .json()
                .await
                .map_err(|e| parse_error("morechildren response", e))?;

            collect_things(envelope.json.data.things, &mut comments, &mut more_ids);
        }

        tracing::debug!(post_id = %post_id, count = comments.len(), "Fetched comments");

        Ok(comments)
    }

    async fn reply(&self, comment_id: &str, text: &str) -> Result<PostedReply, PlatformError> {
        let parent = format!("t1_{comment_id}");
        let form = [
            ("api_type", "json"),
            ("thing_id", parent.as_str()),
            ("text", text),
        ];

        let response = self.post_form("/api/comment", &form).await?;
        let envelope: ApiJsonEnvelope = response
            .json()
            .await
            .map_err(|e| parse_error("reply response", e))?;
        let data = envelope.into_data("/api/comment")?;

        let id = data
            .get("things")
            .and_then(Value::as_array)
            .and_then(|things| things.first())
            .and_then(|thing| thing.get("data"))
            .and_then(|data| data.get("id"))
            .and_then(Value::as_str)
            .ok_or_else(|| PlatformError::Api("Reply response missing comment id".to_string()))?
            .trim_start_matches("t1_")
            .to_string();

        tracing::info!(parent = %comment_id, reply_id = %id, "Posted reply");

        Ok(PostedReply { id })
    }
}

#[derive(Debug, Deserialize)]
struct MoreChildrenEnvelope {
    json: MoreChildrenJson,
}

#[derive(Debug, Deserialize)]
struct MoreChildrenJson {
    data: MoreChildrenData,
}

#[derive(Debug, Deserialize)]
struct MoreChildrenData {
    #[serde(default)]
    things: Vec<Thing>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_credentials() -> RedditCredentials {
        RedditCredentials {
            client_id: SecretString::new("client-id".into()),
            client_secret: SecretString::new("client-secret".into()),
            username: SecretString::new("bot-user".into()),
            password: SecretString::new("bot-pass".into()),
            user_agent: "reddit-research-tests/0.1".to_string(),
        }
    }

    async fn platform(server: &MockServer) -> RedditPlatform {
        Mock::given(method("POST"))
            .and(path("/api/v1/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "test-token",
                "token_type": "bearer",
                "expires_in": 3600,
                "scope": "*"
            })))
            .mount(server)
            .await;

        RedditPlatform::with_base_urls(
            test_credentials(),
            server.uri(),
            server.uri(),
            Duration::ZERO,
            Arc::new(TokioSleeper),
        )
    }

    #[tokio::test]
    async fn resolve_subreddit_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/r/smartphones/about"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "t5",
                "data": {
                    "display_name": "smartphones",
                    "title": "Smartphones",
                    "subscribers": 54321
                }
            })))
            .mount(&server)
            .await;

        let platform = platform(&server).await;
        let subreddit = platform.resolve_subreddit("smartphones").await.unwrap();

        assert_eq!(subreddit.name, "smartphones");
        assert_eq!(subreddit.subscribers, 54321);
    }

    #[tokio::test]
    async fn resolve_subreddit_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/r/doesnotexist/about"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let platform = platform(&server).await;
        let result = platform.resolve_subreddit("doesnotexist").await;

        assert!(matches!(result, Err(PlatformError::NotFound(_))));
    }

    #[tokio::test]
    async fn auth_failure_surfaces_from_any_call() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/v1/access_token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let platform = RedditPlatform::with_base_urls(
            test_credentials(),
            server.uri(),
            server.uri(),
            Duration::ZERO,
            Arc::new(TokioSleeper),
        );

        let result = platform.resolve_subreddit("smartphones").await;

        assert!(matches!(result, Err(PlatformError::Auth(_))));
    }

    #[tokio::test]
    async fn hot_posts_parses_listing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/r/smartphones/hot"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "kind": "Listing",
                "data": {
                    "children": [
                        {"kind": "t3", "data": {"title": "First", "selftext": "Body one", "score": 42}},
                        {"kind": "t3", "data": {"title": "Second", "selftext": "", "score": 7}}
                    ]
                }
            })))
            .mount(&server)
            .await;

        let platform = platform(&server).await;
        let posts = platform.hot_posts("smartphones", 10).await.unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "First");
        assert_eq!(posts[0].body, "Body one");
        assert_eq!(posts[1].score, 7);
    }

    #[tokio::test]
    async fn submit_post_returns_new_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/submit"))
            .and(header("Authorization", "Bearer test-token"))
            .and(body_string_contains("title=Title+Line"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "json": {
                    "errors": [],
                    "data": {
                        "id": "abc123",
                        "name": "t3_abc123",
                        "url": "https://reddit.com/r/smartphones/comments/abc123"
                    }
                }
            })))
            .mount(&server)
            .await;

        let platform = platform(&server).await;
        let submitted = platform
            .submit_post("smartphones", "Title Line", "Body line")
            .await
            .unwrap();

        assert_eq!(submitted.id, "abc123");
    }

    #[tokio::test]
    async fn submit_post_surfaces_api_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/submit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "json": {
                    "errors": [["SUBREDDIT_NOTALLOWED", "not allowed to post there", "sr"]],
                    "data": null
                }
            })))
            .mount(&server)
            .await;

        let platform = platform(&server).await;
        let result = platform.submit_post("smartphones", "t", "b").await;

        assert!(matches!(result, Err(PlatformError::Api(_))));
    }

    fn comment_json(id: &str, score: i64, replies: Value) -> Value {
        json!({
            "kind": "t1",
            "data": {
                "id": id,
                "body": format!("body {id}"),
                "score": score,
                "created_utc": 1_700_000_000.0,
                "replies": replies
            }
        })
    }

    #[tokio::test]
    async fn fetch_post_reports_removed_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/comments/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"kind": "Listing", "data": {"children": [
                    {"kind": "t3", "data": {"id": "abc123", "score": 55, "removed_by_category": "moderator"}}
                ]}},
                {"kind": "Listing", "data": {"children": []}}
            ])))
            .mount(&server)
            .await;

        let platform = platform(&server).await;
        let view = platform.fetch_post("abc123").await.unwrap();

        assert_eq!(view.score, 55);
        assert!(view.removed);
    }

    #[tokio::test]
    async fn fetch_post_active_when_removal_marker_is_null() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/comments/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"kind": "Listing", "data": {"children": [
                    {"kind": "t3", "data": {"id": "abc123", "score": 55, "removed_by_category": null}}
                ]}},
                {"kind": "Listing", "data": {"children": []}}
            ])))
            .mount(&server)
            .await;

        let platform = platform(&server).await;
        let view = platform.fetch_post("abc123").await.unwrap();

        assert!(!view.removed);
    }

    #[tokio::test]
    async fn comments_flattens_nested_threads_and_expands_more_stubs() {
        let server = MockServer::start().await;

        let nested = json!({
            "kind": "Listing",
            "data": {"children": [comment_json("c2", 3, json!(""))]}
        });

        Mock::given(method("GET"))
            .and(path("/comments/abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"kind": "Listing", "data": {"children": [
                    {"kind": "t3", "data": {"id": "abc123", "score": 10}}
                ]}},
                {"kind": "Listing", "data": {"children": [
                    comment_json("c1", 8, nested),
                    {"kind": "more", "data": {"children": ["c3"]}}
                ]}}
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/morechildren"))
            .and(query_param("children", "c3"))
            .and(query_param("link_id", "t3_abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "json": {
                    "errors": [],
                    "data": {"things": [comment_json("c3", 1, json!(""))]}
                }
            })))
            .mount(&server)
            .await;

        let platform = platform(&server).await;
        let comments = platform.comments("abc123").await.unwrap();

        let ids: Vec<&str> = comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3"]);
        assert_eq!(comments[0].score, 8);
    }

    #[tokio::test]
    async fn reply_returns_posted_comment_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/comment"))
            .and(body_string_contains("thing_id=t1_c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "json": {
                    "errors": [],
                    "data": {"things": [
                        {"kind": "t1", "data": {"id": "newreply"}}
                    ]}
                }
            })))
            .mount(&server)
            .await;

        let platform = platform(&server).await;
        let reply = platform.reply("c1", "Thanks for the insight").await.unwrap();

        assert_eq!(reply.id, "newreply");
    }

    #[tokio::test]
    async fn rate_limited_response_maps_to_rate_limited_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/r/smartphones/about"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
            .mount(&server)
            .await;

        let platform = platform(&server).await;
        let result = platform.resolve_subreddit("smartphones").await;

        match result {
            Err(PlatformError::RateLimited(retry_after)) => {
                assert_eq!(retry_after, Some(Duration::from_secs(30)));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }
}
