//! Text of every message the watcher sends, in Telegram HTML.

use crate::record::NewsRecord;
use crate::storage::RunState;

/// Escapes the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

pub fn startup(label: &str, page_url: &str) -> String {
    format!(
        "✅ <b>{} News Bot started successfully</b>\n\n⏰ Monitoring {} for updates.",
        escape_html(label),
        escape_html(page_url)
    )
}

pub fn heartbeat(label: &str) -> String {
    format!(
        "❤️ <b>{} News Bot heartbeat</b>\n\nBot is alive and checking for new updates.",
        escape_html(label)
    )
}

pub fn new_item(label: &str, record: &NewsRecord) -> String {
    format!(
        "📰 <b>{} Update</b>\n\n{}\n{}",
        escape_html(label),
        escape_html(&record.title),
        escape_html(&record.link)
    )
}

pub fn overflow(label: &str, remaining: usize, page_url: &str) -> String {
    format!(
        "➕ <b>{} Update</b>\n\n{} more new item(s) found. See {}",
        escape_html(label),
        remaining,
        escape_html(page_url)
    )
}

pub fn fetch_failed(label: &str, page_url: &str, error: &str) -> String {
    format!(
        "⚠️ <b>{} News Bot error</b>\n\nCould not check {}:\n<code>{}</code>",
        escape_html(label),
        escape_html(page_url),
        escape_html(error)
    )
}

pub fn save_failed(label: &str, error: &str) -> String {
    format!(
        "🛑 <b>{} News Bot error</b>\n\nState could not be saved; items may be reported again.\n<code>{}</code>",
        escape_html(label),
        escape_html(error)
    )
}

pub fn start_reply(label: &str) -> String {
    format!(
        "👋 <b>{} News Bot</b>\n\nI watch the {} news page and post new items here.\n\n\
         /stats - total notifications sent\n/last - summary of the latest check",
        escape_html(label),
        escape_html(label)
    )
}

pub fn stats_reply(state: &RunState) -> String {
    format!(
        "📊 Total notifications sent: <b>{}</b>",
        state.stats.total_notifications
    )
}

pub fn last_reply(state: &RunState) -> String {
    match state.last_run() {
        Some(entry) => {
            let mut text = format!(
                "🕒 Last check: {}\nNew items: {}\nStatus: {}",
                entry.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
                entry.new_item_count,
                entry.status
            );
            if let Some(error) = &entry.error {
                text.push_str(&format!("\nError: {}", escape_html(error)));
            }
            text
        }
        None => "🕒 No check has been recorded yet.".to_owned(),
    }
}
