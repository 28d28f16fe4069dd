mod cli;

use std::process::ExitCode;

use clap::Parser;
use newswatch_core::{RunStatus, Watcher};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let watcher = match build_watcher(&cli) {
        Ok(watcher) => watcher,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::from(2);
        }
    };

    match watcher.run_once().await {
        Ok(report) => {
            match report.status {
                RunStatus::Ok => info!(
                    new = report.new_items.len(),
                    heartbeat = report.heartbeat_sent,
                    commands = report.commands_answered,
                    total = report.total_notifications,
                    "run finished"
                ),
                RunStatus::Error => warn!("run finished, page could not be checked"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}

fn build_watcher(cli: &Cli) -> Result<Watcher, newswatch_core::ConfigError> {
    let telegram = cli.telegram_config()?;
    let config = cli.watch_config()?;
    info!(url = %config.page_url, state = %config.state_path.display(), "configuration loaded");
    Watcher::new(config, &telegram)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
