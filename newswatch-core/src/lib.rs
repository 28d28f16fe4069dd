pub mod commands;
pub mod config;
pub mod diff;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod messages;
pub mod notify;
pub mod record;
pub mod run;
pub mod storage;

pub use commands::Command;
pub use config::{TelegramConfig, WatchConfig};
pub use diff::{diff, SeenSet};
pub use error::{ConfigError, FetchError, NotifyError, RunError, StoreError};
pub use extract::Extractor;
pub use fetcher::PageFetcher;
pub use notify::TelegramNotifier;
pub use record::NewsRecord;
pub use run::{RunReport, Watcher};
pub use storage::{RunLogEntry, RunState, RunStatus, StateStore, Stats};
