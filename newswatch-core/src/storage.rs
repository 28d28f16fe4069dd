use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use crate::diff::SeenSet;
use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Ok,
    Error,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Ok => f.write_str("ok"),
            RunStatus::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLogEntry {
    pub timestamp: DateTime<Utc>,
    pub new_item_count: usize,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_notifications: u64,
}

/// Everything the watcher remembers between invocations.
///
/// Also reads the older `{"news": [...], "last_heartbeat": "..."}` layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunState {
    #[serde(alias = "news")]
    pub seen: SeenSet,
    #[serde(alias = "last_heartbeat", deserialize_with = "optional_date")]
    pub last_heartbeat_date: Option<NaiveDate>,
    pub stats: Stats,
    pub run_log: Vec<RunLogEntry>,
    /// Highest Telegram update id already handled.
    pub last_update_id: Option<i64>,
}

impl RunState {
    /// True before any item or heartbeat has ever been recorded.
    pub fn is_first_run(&self) -> bool {
        self.seen.is_empty() && self.last_heartbeat_date.is_none()
    }

    pub fn heartbeat_due(&self, today: NaiveDate) -> bool {
        self.last_heartbeat_date != Some(today)
    }

    pub fn mark_heartbeat(&mut self, today: NaiveDate) {
        self.last_heartbeat_date = Some(today);
    }

    /// Appends a run summary, trimming the oldest entries beyond `limit`.
    ///
    /// `new_item_count` is added to the notification counter.
    pub fn record_run(&mut self, entry: RunLogEntry, limit: usize) {
        self.stats.total_notifications += entry.new_item_count as u64;
        self.run_log.push(entry);
        let limit = limit.max(1);
        if self.run_log.len() > limit {
            let excess = self.run_log.len() - limit;
            self.run_log.drain(..excess);
        }
    }

    pub fn last_run(&self) -> Option<&RunLogEntry> {
        self.run_log.last()
    }
}

/// `null`, a missing value and `""` all mean no date.
fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(de::Error::custom),
    }
}

/// JSON file holding one [`RunState`].
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Reads the persisted state.
    ///
    /// Never fails: a missing file starts fresh, and a corrupt one falls
    /// back to the temp file of an interrupted save, then to a fresh state.
    /// After a fallback to fresh state every item on the page is reported
    /// once more.
    pub async fn load(&self) -> RunState {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no state file yet, starting fresh");
                return RunState::default();
            }
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "failed to read state, starting fresh");
                return RunState::default();
            }
        };

        match serde_json::from_slice::<RunState>(&bytes) {
            Ok(state) => {
                debug!(seen = state.seen.len(), runs = state.run_log.len(), "state loaded");
                state
            }
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "failed to parse state, trying tmp fallback");
                let tmp = self.tmp_path();
                match tokio::fs::read(&tmp).await {
                    Ok(tmp_bytes) => serde_json::from_slice(&tmp_bytes).unwrap_or_else(|e| {
                        warn!(error = %e, path = %tmp.display(), "tmp state unusable, starting fresh");
                        RunState::default()
                    }),
                    Err(_) => RunState::default(),
                }
            }
        }
    }

    /// Replaces the persisted state with `state` in one step.
    ///
    /// The document is written next to the target and renamed over it, so
    /// the previous state stays intact until the rename succeeds.
    pub async fn save(&self, state: &RunState) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|source| StoreError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), seen = state.seen.len(), "state saved");
        Ok(())
    }
}
