use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_PAGE_URL: &str = "https://www.ssju.ac.in/news-events";
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org/";

/// What to watch and how to remember it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub page_url: String,
    /// Base for resolving relative links; the page URL's origin when unset.
    pub site_base: Option<String>,
    pub item_selector: String,
    pub link_filter: Option<String>,
    pub request_timeout_seconds: u64,
    pub state_path: PathBuf,
    pub max_messages_per_run: usize,
    pub run_log_limit: usize,
    pub label: String,
    pub handle_commands: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            page_url: DEFAULT_PAGE_URL.to_owned(),
            site_base: None,
            item_selector: "a[href]".to_owned(),
            link_filter: Some("/news".to_owned()),
            request_timeout_seconds: 30,
            state_path: PathBuf::from("state.json"),
            max_messages_per_run: 5,
            run_log_limit: 200,
            label: "SSJU".to_owned(),
            handle_commands: true,
        }
    }
}

impl WatchConfig {
    /// Loads settings from a JSON file; absent keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::SettingsParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn page_url(&self) -> Result<Url, ConfigError> {
        parse_url(&self.page_url)
    }

    pub fn site_base(&self) -> Result<Url, ConfigError> {
        match &self.site_base {
            Some(base) => parse_url(base),
            None => {
                let page = self.page_url()?;
                page.join("/").map_err(|source| ConfigError::InvalidUrl {
                    value: self.page_url.clone(),
                    source,
                })
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Credentials and endpoint for the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: Url,
    pub timeout: Duration,
}

impl TelegramConfig {
    /// Validates the credential and recipient; both are required.
    pub fn new(bot_token: Option<String>, chat_id: Option<String>) -> Result<Self, ConfigError> {
        let bot_token = required(bot_token, "bot token (BOT_TOKEN)")?;
        let chat_id = required(chat_id, "chat id (CHAT_ID)")?;
        Ok(Self {
            bot_token,
            chat_id,
            api_base: parse_url(DEFAULT_TELEGRAM_API)?,
            timeout: Duration::from_secs(20),
        })
    }

    pub fn with_api_base(mut self, api_base: &str) -> Result<Self, ConfigError> {
        // Url::join drops the last segment unless the base ends with '/'
        let normalized = if api_base.ends_with('/') {
            api_base.to_owned()
        } else {
            format!("{api_base}/")
        };
        self.api_base = parse_url(&normalized)?;
        Ok(self)
    }

    pub fn method_url(&self, method: &str) -> Result<Url, url::ParseError> {
        self.api_base
            .join(&format!("bot{}/{}", self.bot_token, method))
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    match value.map(|v| v.trim().to_owned()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn parse_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_are_rejected() {
        assert!(matches!(
            TelegramConfig::new(None, Some("42".into())),
            Err(ConfigError::Missing(_))
        ));
        assert!(matches!(
            TelegramConfig::new(Some("token".into()), Some("  ".into())),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn method_url_keeps_api_base_path() {
        let cfg = TelegramConfig::new(Some("abc".into()), Some("42".into()))
            .unwrap()
            .with_api_base("http://127.0.0.1:9000/tg")
            .unwrap();
        assert_eq!(
            cfg.method_url("sendMessage").unwrap().as_str(),
            "http://127.0.0.1:9000/tg/botabc/sendMessage"
        );
    }

    #[test]
    fn site_base_defaults_to_page_origin() {
        let cfg = WatchConfig {
            page_url: "https://www.ssju.ac.in/en/news-events?page=2".into(),
            ..WatchConfig::default()
        };
        assert_eq!(cfg.site_base().unwrap().as_str(), "https://www.ssju.ac.in/");

        let cfg = WatchConfig {
            site_base: Some("https://cdn.ssju.ac.in/portal/".into()),
            ..cfg
        };
        assert_eq!(cfg.site_base().unwrap().as_str(), "https://cdn.ssju.ac.in/portal/");
    }

    #[test]
    fn partial_settings_file_keeps_defaults() {
        let cfg: WatchConfig =
            serde_json::from_str(r#"{ "label": "Campus", "max_messages_per_run": 3 }"#).unwrap();
        assert_eq!(cfg.label, "Campus");
        assert_eq!(cfg.max_messages_per_run, 3);
        assert_eq!(cfg.page_url, DEFAULT_PAGE_URL);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(30));
    }
}
