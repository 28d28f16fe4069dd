use tracing::{debug, info, warn};

use crate::messages;
use crate::notify::{TelegramNotifier, Update};
use crate::storage::RunState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stats,
    Last,
}

impl Command {
    /// Recognises `/start`, `/stats` and `/last`, with an optional
    /// `@botname` suffix and trailing arguments.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Command::Start),
            "stats" => Some(Command::Stats),
            "last" => Some(Command::Last),
            _ => None,
        }
    }

    pub fn reply(self, label: &str, state: &RunState) -> String {
        match self {
            Command::Start => messages::start_reply(label),
            Command::Stats => messages::stats_reply(state),
            Command::Last => messages::last_reply(state),
        }
    }
}

/// Commands in `updates` sent from `chat_id`, in arrival order.
pub fn commands_from(updates: &[Update], chat_id: &str) -> Vec<Command> {
    updates
        .iter()
        .filter_map(|update| update.message.as_ref())
        .filter(|message| message.chat.id.to_string() == chat_id)
        .filter_map(|message| message.text.as_deref())
        .filter_map(Command::parse)
        .collect()
}

/// Answers pending commands and advances `state.last_update_id`.
///
/// Returns the number of replies sent. Polling failures leave the offset
/// untouched so the commands are picked up on the next run.
pub async fn answer_pending(notifier: &TelegramNotifier, state: &mut RunState, label: &str) -> usize {
    let updates = match notifier.updates_after(state.last_update_id).await {
        Ok(updates) => updates,
        Err(e) => {
            warn!(error = %e, "failed to poll for commands");
            return 0;
        }
    };
    if let Some(max_id) = updates.iter().map(|u| u.update_id).max() {
        state.last_update_id = Some(state.last_update_id.map_or(max_id, |id| id.max(max_id)));
    }

    let commands = commands_from(&updates, notifier.chat_id());
    if updates.len() > commands.len() {
        debug!(ignored = updates.len() - commands.len(), "ignored updates without a recognised command");
    }
    let mut answered = 0;
    for command in commands {
        info!(?command, "answering command");
        if notifier.send_best_effort(&command.reply(label, state)).await {
            answered += 1;
        }
    }
    answered
}
