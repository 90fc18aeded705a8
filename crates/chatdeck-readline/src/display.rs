//! Terminal rendering for sessions, messages and stats.

use chrono::{DateTime, Local, Utc};
use colored::Colorize;

use chatdeck_core::session::HistoryStats;
use chatdeck_core::{ChatError, Message, Session};

/// Human-friendly age of `then` as seen at `now`.
pub fn relative_date(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    match (now - then).num_days() {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        days @ 2..=6 => format!("{days} days ago"),
        _ => then.with_timezone(&Local).format("%Y-%m-%d").to_string(),
    }
}

/// One line of the session list.
pub fn session_line(index: usize, session: &Session, is_current: bool, now: DateTime<Utc>) -> String {
    let marker = if is_current { "*" } else { " " };
    format!(
        "{marker} {:>2}. {}  ({} • {} messages)",
        index + 1,
        session.title,
        relative_date(session.updated_at, now),
        session.message_count
    )
}

pub fn print_sessions(sessions: &[Session], current_id: Option<&str>) {
    if sessions.is_empty() {
        println!("{}", "No chat history yet".bright_black());
        return;
    }

    let now = Utc::now();
    for (index, session) in sessions.iter().enumerate() {
        let is_current = current_id == Some(session.id.as_str());
        let line = session_line(index, session, is_current, now);
        if is_current {
            println!("{}", line.bright_yellow());
        } else {
            println!("{line}");
        }
    }
}

pub fn print_message(message: &Message) {
    if message.is_user {
        println!("{}", format!("> {}", message.text).green());
    } else {
        for line in message.text.lines() {
            println!("{}", line.bright_blue());
        }
    }
}

/// Replays a whole conversation, e.g. after `/switch`.
pub fn print_transcript(session: &Session) {
    println!("{}", format!("=== {} ===", session.title).bright_magenta().bold());
    if session.messages.is_empty() {
        println!("{}", "Start a conversation!".bright_black());
    }
    for message in &session.messages {
        print_message(message);
    }
    println!();
}

/// Text for a failed send. Transient failures are a notice: the user turn
/// is already saved and the send can simply be retried.
pub fn send_failure_text(err: &ChatError) -> String {
    if err.is_transient() {
        format!("{err}. Your message was saved, try again.")
    } else {
        format!("Failed to send message: {err}")
    }
}

pub fn print_send_failure(err: &ChatError) {
    let text = send_failure_text(err);
    if err.is_transient() {
        println!("{}", text.yellow());
    } else {
        eprintln!("{}", text.red());
    }
}

pub fn stats_lines(stats: &HistoryStats) -> Vec<String> {
    let oldest = stats
        .oldest_session
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());

    vec![
        format!("Sessions: {}", stats.total_sessions),
        format!("Messages: {}", stats.total_messages),
        format!("Average per session: {}", stats.average_messages_per_session),
        format!("Oldest session: {oldest}"),
    ]
}
