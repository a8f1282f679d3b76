//! Run command - one complete research session

use anyhow::{Context, Result, bail};
use reddit_research_adapters::{
    VaderSentiment,
    llm::{GeminiGenerator, GeneratorConfig, OpenAiGenerator, StubGenerator},
    reddit::{RedditCredentials, RedditPlatform},
    store::JsonFileStore,
};
use reddit_research_domain::{
    SystemClock, TextGenerator, TokioSleeper,
    usecases::{ReplyPolicy, ResearchConfig, ResearchRun, StyleConfig},
};
use secrecy::SecretString;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::args::RunArgs;
use crate::config::AppConfig;

pub async fn execute(args: RunArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;

    tracing::info!(
        subreddit = %args.subreddit,
        provider = %config.llm.provider,
        output_dir = %config.general.output_dir.display(),
        "Starting research session"
    );

    let platform = Arc::new(build_platform(&config)?);
    let generator: Arc<dyn TextGenerator> = Arc::from(build_generator(&config)?);
    let store = Arc::new(JsonFileStore::new(config.general.output_dir.clone()));

    let run = ResearchRun::new(
        platform,
        generator,
        Arc::new(VaderSentiment),
        Arc::clone(&store),
        Arc::new(SystemClock),
        Arc::new(TokioSleeper),
        research_config(&config),
    );

    let research_id = run
        .run(&args.prompt, &args.subreddit, args.research_id)
        .await
        .context("Research run failed")?;

    println!("Research completed: {research_id}");
    println!(
        "Record written to {}",
        store.path_for(&research_id).display()
    );

    Ok(())
}

fn research_config(config: &AppConfig) -> ResearchConfig {
    ResearchConfig {
        monitoring_duration: Duration::from_secs(config.research.monitoring_duration_secs),
        check_interval: Duration::from_secs(config.research.check_interval_secs),
        max_replies_per_thread: config.research.max_replies_per_thread,
        reply_policy: ReplyPolicy {
            min_upvotes: config.research.min_upvotes,
            upvote_ratio_threshold: config.research.upvote_ratio_threshold,
        },
        style: StyleConfig {
            sample_limit: config.research.style_sample_limit,
        },
    }
}

fn build_platform(config: &AppConfig) -> Result<RedditPlatform> {
    let credentials = RedditCredentials {
        client_id: load_secret(&config.reddit.client_id_env, "reddit client id")?,
        client_secret: load_secret(&config.reddit.client_secret_env, "reddit client secret")?,
        username: load_secret(&config.reddit.username_env, "reddit username")?,
        password: load_secret(&config.reddit.password_env, "reddit password")?,
        user_agent: config.reddit.user_agent.clone(),
    };

    Ok(RedditPlatform::new(
        credentials,
        Duration::from_secs(config.research.rate_limit_delay_secs),
    ))
}

fn build_generator(config: &AppConfig) -> Result<Box<dyn TextGenerator>> {
    let generator_config = GeneratorConfig {
        model: config.llm.model.clone(),
        temperature: config.llm.temperature,
        top_p: config.llm.top_p,
        top_k: config.llm.top_k,
        max_output_tokens: config.llm.max_output_tokens,
        timeout_secs: config.llm.timeout_secs,
    };

    match config.llm.provider.as_str() {
        "openai" => {
            let api_key = load_secret(&config.llm.openai.api_key_env, "openai")?;
            Ok(Box::new(OpenAiGenerator::with_base_url(
                api_key,
                config.llm.openai.base_url.clone(),
                generator_config,
            )))
        }
        "gemini" => {
            let api_key = load_secret(&config.llm.gemini.api_key_env, "gemini")?;
            Ok(Box::new(GeminiGenerator::new(api_key, generator_config)))
        }
        "stub" => Ok(Box::new(StubGenerator::default())),
        other => bail!("Unknown LLM provider: {}", other),
    }
}

fn load_secret(env_var: &str, what: &str) -> Result<SecretString> {
    if env_var.trim().is_empty() {
        bail!("No environment variable configured for {}", what);
    }

    let value = std::env::var(env_var)
        .with_context(|| format!("Missing {what} env var {env_var}"))?;

    if value.trim().is_empty() {
        bail!("Env var {} is empty for {}", env_var, what);
    }

    Ok(SecretString::new(value.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_generator_selects_stub_provider() {
        let mut config = AppConfig::default();
        config.llm.provider = "stub".to_string();

        assert!(build_generator(&config).is_ok());
    }

    #[test]
    fn build_generator_rejects_unknown_provider() {
        let mut config = AppConfig::default();
        config.llm.provider = "carrier-pigeon".to_string();

        let error = build_generator(&config).err().unwrap();
        assert!(error.to_string().contains("Unknown LLM provider"));
    }

    #[test]
    fn load_secret_rejects_unconfigured_env_var() {
        let error = load_secret("", "reddit client id").unwrap_err();
        assert!(error.to_string().contains("No environment variable"));
    }
}
