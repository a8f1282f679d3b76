//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub research: ResearchSettings,

    #[serde(default)]
    pub reddit: RedditConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchSettings {
    #[serde(default = "default_monitoring_duration")]
    pub monitoring_duration_secs: u64,

    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    #[serde(default = "default_max_replies")]
    pub max_replies_per_thread: usize,

    #[serde(default = "default_upvote_ratio_threshold")]
    pub upvote_ratio_threshold: f64,

    #[serde(default = "default_min_upvotes")]
    pub min_upvotes: i64,

    #[serde(default = "default_rate_limit_delay")]
    pub rate_limit_delay_secs: u64,

    #[serde(default = "default_style_sample_limit")]
    pub style_sample_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditConfig {
    #[serde(default = "default_reddit_client_id_env")]
    pub client_id_env: String,

    #[serde(default = "default_reddit_client_secret_env")]
    pub client_secret_env: String,

    #[serde(default = "default_reddit_username_env")]
    pub username_env: String,

    #[serde(default = "default_reddit_password_env")]
    pub password_env: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_top_p")]
    pub top_p: f64,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_api_key_env")]
    pub api_key_env: String,
}

// Default value functions
fn default_output_dir() -> PathBuf {
    PathBuf::from("./research-output")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_monitoring_duration() -> u64 {
    21_600
}

fn default_check_interval() -> u64 {
    3_600
}

fn default_max_replies() -> usize {
    4
}

fn default_upvote_ratio_threshold() -> f64 {
    0.05
}

fn default_min_upvotes() -> i64 {
    5
}

fn default_rate_limit_delay() -> u64 {
    120
}

fn default_style_sample_limit() -> u32 {
    10
}

fn default_reddit_client_id_env() -> String {
    "REDDIT_CLIENT_ID".to_string()
}

fn default_reddit_client_secret_env() -> String {
    "REDDIT_CLIENT_SECRET".to_string()
}

fn default_reddit_username_env() -> String {
    "REDDIT_USERNAME".to_string()
}

fn default_reddit_password_env() -> String {
    "REDDIT_PASSWORD".to_string()
}

fn default_user_agent() -> String {
    "reddit-research/0.1 (research bot)".to_string()
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_top_p() -> f64 {
    0.9
}

fn default_top_k() -> u32 {
    40
}

fn default_max_output_tokens() -> u32 {
    2048
}

fn default_timeout() -> u64 {
    45
}

fn default_openai_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_gemini_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            monitoring_duration_secs: default_monitoring_duration(),
            check_interval_secs: default_check_interval(),
            max_replies_per_thread: default_max_replies(),
            upvote_ratio_threshold: default_upvote_ratio_threshold(),
            min_upvotes: default_min_upvotes(),
            rate_limit_delay_secs: default_rate_limit_delay(),
            style_sample_limit: default_style_sample_limit(),
        }
    }
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            client_id_env: default_reddit_client_id_env(),
            client_secret_env: default_reddit_client_secret_env(),
            username_env: default_reddit_username_env(),
            password_env: default_reddit_password_env(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout(),
            openai: OpenAiConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            // User specified a path that doesn't exist
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Add environment variable overrides
        builder = builder.add_source(
            config::Environment::with_prefix("REDDIT_RESEARCH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# reddit-research configuration

[general]
output_dir = "./research-output"
log_level = "info"

[research]
# 6 hours of monitoring, one polling pass per hour
monitoring_duration_secs = 21600
check_interval_secs = 3600
max_replies_per_thread = 4
upvote_ratio_threshold = 0.05
min_upvotes = 5
# minimum delay between outgoing Reddit API calls
rate_limit_delay_secs = 120
style_sample_limit = 10

[reddit]
# credentials are read from these environment variables
client_id_env = "REDDIT_CLIENT_ID"
client_secret_env = "REDDIT_CLIENT_SECRET"
username_env = "REDDIT_USERNAME"
password_env = "REDDIT_PASSWORD"
user_agent = "reddit-research/0.1 (research bot)"

[llm]
provider = "openai"  # openai, gemini, stub
model = "gpt-4o-mini"
temperature = 0.7
top_p = 0.9
top_k = 40
max_output_tokens = 2048
timeout_secs = 45

[llm.openai]
api_key_env = "OPENAI_API_KEY"
base_url = "https://api.openai.com/v1"

[llm.gemini]
api_key_env = "GOOGLE_API_KEY"
"#
        .to_string()
    }
}
