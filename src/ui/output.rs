use crate::controller::{AppState, Resolution};
use crate::models::{Message, MessageKind, Session};
use colored::*;
use terminal_size::{terminal_size, Width};

pub const WELCOME_TITLE: &str = "Welcome to IKMS Agent";
pub const WELCOME_SUBTITLE: &str = "Your intelligent knowledge management assistant.";
pub const EMPTY_SESSIONS: &str = "No chats yet. Start a conversation!";

fn rule_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(60)
        .clamp(20, 100)
}

fn rule() -> String {
    "─".repeat(rule_width())
}

pub fn display_welcome() {
    println!("{}", WELCOME_TITLE.bold());
    println!("{}", WELCOME_SUBTITLE.dimmed());
    println!();
}

/// One chat bubble. Assistant messages that carry context get a badge.
pub fn display_message(message: &Message) {
    match message.kind {
        MessageKind::User => {
            println!("{} {}", "you ›".green().bold(), message.content);
        }
        MessageKind::Assistant => {
            let label = "ikms ›".cyan().bold();
            if message.failed {
                println!("{} {}", label, message.content.red());
            } else {
                println!("{} {}", label, message.content);
            }
            if message.context.is_some() {
                println!("{}", "      ℹ Context used".dimmed());
            }
        }
    }
}

pub fn display_conversation(messages: &[Message]) {
    if messages.is_empty() {
        display_welcome();
        return;
    }
    for message in messages {
        display_message(message);
    }
}

/// Single line of the session list; the active session is marked with `*`.
pub fn format_session_line(session: &Session, active: Option<&str>) -> String {
    let marker = if active == Some(session.id.as_str()) { "*" } else { " " };
    match session.created_date() {
        Some(date) => format!("{} {}  {}  ({})", marker, session.display_title(), date, session.id),
        None => format!("{} {}  ({})", marker, session.display_title(), session.id),
    }
}

pub fn display_sessions(sessions: &[Session], active: Option<&str>) {
    println!("{}", "Recent Chats".bold());
    println!("{}", rule().dimmed());
    if sessions.is_empty() {
        println!("{}", EMPTY_SESSIONS.dimmed());
        return;
    }
    for session in sessions {
        let line = format_session_line(session, active);
        if active == Some(session.id.as_str()) {
            println!("{}", line.cyan());
        } else {
            println!("{}", line);
        }
    }
}

pub fn display_thinking() {
    println!("{}", "Thinking... (Ctrl-C to stop)".dimmed());
}

pub fn display_notice(text: &str) {
    println!("{}", text.dimmed());
}

/// Render the terminal transition of a question.
pub fn display_resolution(resolution: &Resolution, state: &AppState) {
    match resolution {
        Resolution::Completed | Resolution::Failed(_) => {
            if let Some(last) = state.messages.last() {
                display_message(last);
            }
        }
        Resolution::Cancelled => display_notice("Generation stopped."),
    }
}
