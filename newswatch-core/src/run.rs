use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::commands;
use crate::config::{TelegramConfig, WatchConfig};
use crate::diff::diff;
use crate::error::{ConfigError, RunError};
use crate::extract::Extractor;
use crate::fetcher::{build_client, PageFetcher};
use crate::messages;
use crate::notify::TelegramNotifier;
use crate::record::NewsRecord;
use crate::storage::{RunLogEntry, RunStatus, StateStore};

/// Outcome of one [`Watcher::run_once_at`] call.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub new_items: Vec<NewsRecord>,
    pub startup_sent: bool,
    pub heartbeat_sent: bool,
    pub status: RunStatus,
    pub commands_answered: usize,
    pub total_notifications: u64,
}

/// Sequences one check of the watched page.
#[derive(Debug, Clone)]
pub struct Watcher {
    config: WatchConfig,
    fetcher: PageFetcher,
    notifier: TelegramNotifier,
    store: StateStore,
}

impl Watcher {
    pub fn new(config: WatchConfig, telegram: &TelegramConfig) -> Result<Self, ConfigError> {
        let client = build_client(config.request_timeout())?;
        let extractor = Extractor::from_config(&config)?;
        let fetcher = PageFetcher::new(client.clone(), config.page_url()?, extractor);
        let notifier = TelegramNotifier::new(client, telegram)?;
        let store = StateStore::new(&config.state_path);
        Ok(Self {
            config,
            fetcher,
            notifier,
            store,
        })
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub async fn run_once(&self) -> Result<RunReport, RunError> {
        self.run_once_at(Utc::now()).await
    }

    /// Performs one full cycle as if the clock read `now`.
    ///
    /// State is written once, at the end. A failed fetch still records the
    /// heartbeat and a run-log entry but leaves the seen set untouched.
    pub async fn run_once_at(&self, now: DateTime<Utc>) -> Result<RunReport, RunError> {
        let mut state = self.store.load().await;
        let label = self.config.label.as_str();
        let page_url = self.fetcher.url().as_str();

        let startup_sent = state.is_first_run();
        if startup_sent {
            info!("first run for this deployment");
            self.notifier
                .send_best_effort(&messages::startup(label, page_url))
                .await;
        }

        let today = now.date_naive();
        let heartbeat_sent = state.heartbeat_due(today);
        if heartbeat_sent {
            info!(%today, "sending daily heartbeat");
            self.notifier
                .send_best_effort(&messages::heartbeat(label))
                .await;
            state.mark_heartbeat(today);
        }

        let (new_items, entry) = match self.fetcher.fetch_records().await {
            Ok(candidates) => {
                let found = candidates.len();
                let new_items = diff(candidates, &mut state.seen);
                info!(found, new = new_items.len(), "page checked");
                self.announce(&new_items, page_url).await;
                let entry = RunLogEntry {
                    timestamp: now,
                    new_item_count: new_items.len(),
                    status: RunStatus::Ok,
                    error: None,
                };
                (new_items, entry)
            }
            Err(e) => {
                warn!(error = %e, url = %page_url, "page check failed");
                self.notifier
                    .send_best_effort(&messages::fetch_failed(label, page_url, &e.to_string()))
                    .await;
                let entry = RunLogEntry {
                    timestamp: now,
                    new_item_count: 0,
                    status: RunStatus::Error,
                    error: Some(e.to_string()),
                };
                (Vec::new(), entry)
            }
        };
        let status = entry.status;
        state.record_run(entry, self.config.run_log_limit);

        let commands_answered = if self.config.handle_commands {
            commands::answer_pending(&self.notifier, &mut state, label).await
        } else {
            0
        };

        if let Err(e) = self.store.save(&state).await {
            error!(error = %e, path = %self.store.path().display(), "failed to persist state");
            self.notifier
                .send_best_effort(&messages::save_failed(label, &e.to_string()))
                .await;
            return Err(e.into());
        }

        Ok(RunReport {
            new_items,
            startup_sent,
            heartbeat_sent,
            status,
            commands_answered,
            total_notifications: state.stats.total_notifications,
        })
    }

    async fn announce(&self, new_items: &[NewsRecord], page_url: &str) {
        let label = self.config.label.as_str();
        let cap = self.config.max_messages_per_run;
        for record in new_items.iter().take(cap) {
            self.notifier
                .send_best_effort(&messages::new_item(label, record))
                .await;
        }
        if new_items.len() > cap {
            let remaining = new_items.len() - cap;
            info!(remaining, "per-run message cap reached");
            self.notifier
                .send_best_effort(&messages::overflow(label, remaining, page_url))
                .await;
        }
    }
}
