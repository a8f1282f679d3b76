//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// reddit-research: bot that drafts a subreddit post with an LLM and
/// monitors the thread for reply-worthy comments
#[derive(Parser, Debug)]
#[command(name = "reddit-research")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one research session: post, monitor, reply, persist
    Run(RunArgs),

    /// Configuration management
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Research topic the drafted post should explore
    #[arg(long)]
    pub prompt: String,

    /// Target subreddit name (without the r/ prefix)
    #[arg(long)]
    pub subreddit: String,

    /// Caller-supplied research id (default: derived from the current time)
    #[arg(long)]
    pub research_id: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}
