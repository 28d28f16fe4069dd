use std::path::PathBuf;

use clap::Parser;
use newswatch_core::{ConfigError, TelegramConfig, WatchConfig};

/// Checks the news page once and reports new items to Telegram.
///
/// Meant to be invoked by a scheduler (cron, systemd timer, CI schedule).
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional JSON settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// State file (overrides the settings file)
    #[arg(short, long, env = "STATE_FILE")]
    pub state: Option<PathBuf>,

    /// Page to watch (overrides the settings file)
    #[arg(short, long, env = "NEWS_URL")]
    pub url: Option<String>,

    /// Fetch timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Do not read or answer chat commands
    #[arg(long)]
    pub no_commands: bool,

    /// Telegram bot token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Telegram chat that receives notifications and may send commands
    #[arg(long, env = "CHAT_ID")]
    pub chat_id: Option<String>,

    /// Telegram Bot API base URL
    #[arg(long, env = "TELEGRAM_API", default_value = newswatch_core::config::DEFAULT_TELEGRAM_API)]
    pub telegram_api: String,
}

impl Cli {
    pub fn watch_config(&self) -> Result<WatchConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => WatchConfig::from_file(path)?,
            None => WatchConfig::default(),
        };
        if let Some(state) = &self.state {
            config.state_path = state.clone();
        }
        if let Some(url) = &self.url {
            config.page_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_seconds = secs;
        }
        if self.no_commands {
            config.handle_commands = false;
        }
        Ok(config)
    }

    pub fn telegram_config(&self) -> Result<TelegramConfig, ConfigError> {
        TelegramConfig::new(self.bot_token.clone(), self.chat_id.clone())?
            .with_api_base(&self.telegram_api)
    }
}
