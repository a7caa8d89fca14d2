//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for mindmingle
#[derive(Parser, Debug)]
#[command(name = "mindmingle")]
#[command(author, version, about = "Chat with Google Gemini from your terminal")]
#[command(long_about = r#"
MindMingle is a terminal chat client. Sign up or log in locally, then keep
any number of chat sessions that are saved between runs.

Replies come from Google Gemini. Set GEMINI_API_KEY (or [provider].api_key)
before starting.

Configuration files are loaded from (in priority order):
1. MINDMINGLE_* environment variables (e.g. MINDMINGLE_PROVIDER__MODEL)
2. --config <path>        Explicit config file
3. ./mindmingle.toml      Project-level config
4. ~/.config/mindmingle/config.toml   Global config

Example:
  mindmingle
  mindmingle --model gemini-2.5-pro --no-color
"#)]
pub struct Cli {
    /// Model to generate replies with (overrides [provider].model)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Directory for saved users, chats and settings
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the typing indicator and the typewriter effect
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
