use std::time::Duration;

use reqwest::Client;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::TelegramConfig;
use crate::error::{ConfigError, NotifyError};

#[derive(Debug, Deserialize)]
struct ApiReply<T> {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    result: Option<T>,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
    disable_web_page_preview: bool,
}

#[derive(Debug, Serialize)]
struct GetUpdates {
    offset: Option<i64>,
    timeout: u32,
    allowed_updates: [&'static str; 1],
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Sends messages to the one configured chat.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: Client,
    chat_id: String,
    timeout: Duration,
    send_url: Url,
    updates_url: Url,
}

impl TelegramNotifier {
    pub fn new(client: Client, config: &TelegramConfig) -> Result<Self, ConfigError> {
        let method_url = |method: &str| {
            config
                .method_url(method)
                .map_err(|source| ConfigError::InvalidUrl {
                    value: config.api_base.to_string(),
                    source,
                })
        };
        Ok(Self {
            send_url: method_url("sendMessage")?,
            updates_url: method_url("getUpdates")?,
            client,
            chat_id: config.chat_id.clone(),
            timeout: config.timeout,
        })
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Delivers one HTML-formatted message. Not retried.
    pub async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };
        self.call::<IgnoredAny, _>(&self.send_url, &body).await?;
        debug!(chars = text.chars().count(), "message delivered");
        Ok(())
    }

    /// Like [`send`](Self::send), but failures are only logged.
    ///
    /// Returns whether the message went through.
    pub async fn send_best_effort(&self, text: &str) -> bool {
        match self.send(text).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to deliver message");
                false
            }
        }
    }

    /// Pending updates after `last_update_id`, acknowledging earlier ones.
    pub async fn updates_after(&self, last_update_id: Option<i64>) -> Result<Vec<Update>, NotifyError> {
        let body = GetUpdates {
            offset: last_update_id.map(|id| id + 1),
            timeout: 0,
            allowed_updates: ["message"],
        };
        let updates = self
            .call::<Vec<Update>, _>(&self.updates_url, &body)
            .await?
            .unwrap_or_default();
        debug!(count = updates.len(), "fetched pending updates");
        Ok(updates)
    }

    async fn call<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<Option<T>, NotifyError> {
        let response = self
            .client
            .post(url.clone())
            .timeout(self.timeout)
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let raw = response.text().await?;
        match serde_json::from_str::<ApiReply<T>>(&raw) {
            Ok(reply) if status.is_success() && reply.ok => Ok(reply.result),
            Ok(reply) => Err(NotifyError::Api {
                status,
                description: reply.description.unwrap_or_else(|| "no description".to_owned()),
            }),
            Err(_) => Err(NotifyError::Api {
                status,
                description: raw.chars().take(200).collect(),
            }),
        }
    }
}
