use crate::api::QaBackend;
use crate::controller::{ChatController, Resolution};
use crate::session::SessionStore;
use crate::ui::{
    display_conversation, display_notice, display_resolution, display_sessions, display_thinking,
};
use colored::*;
use std::future::Future;
use std::io::{self, BufRead, Write};
use std::thread;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::debug;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this chat? [y/N] ";

/// Lines of user input delivered over a channel.
///
/// Stdin is read on a plain OS thread so a blocked read never keeps the
/// runtime alive once the REPL has returned.
pub struct InputLines {
    rx: mpsc::UnboundedReceiver<io::Result<String>>,
}

impl InputLines {
    pub fn from_receiver(rx: mpsc::UnboundedReceiver<io::Result<String>>) -> Self {
        Self { rx }
    }

    /// Next line, `Ok(None)` once the input is closed.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.rx.recv().await.transpose()
    }
}

pub fn stdin_lines() -> InputLines {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
    });
    InputLines::from_receiver(rx)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    New,
    Sessions,
    Select(String),
    Delete(String),
    History,
    Help,
    Quit,
    Unknown(String),
}

/// Interpret one line of interactive input. Anything not starting with `/`
/// is a question.
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Ask(line.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match (name, arg) {
        ("new", _) => Command::New,
        ("sessions" | "ls", _) => Command::Sessions,
        ("select" | "open", id) if !id.is_empty() => Command::Select(id.to_string()),
        ("delete" | "rm", id) if !id.is_empty() => Command::Delete(id.to_string()),
        ("history", _) => Command::History,
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit" | "q", _) => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

pub fn print_help() {
    println!("{}", "Type a question and press Enter. Commands:".bold());
    for (command, help) in [
        ("/new", "Start a new chat"),
        ("/sessions", "List recent chats"),
        ("/select <id>", "Switch to a chat"),
        ("/delete <id>", "Delete a chat"),
        ("/history", "Show the current conversation"),
        ("/help", "Show this help"),
        ("/quit", "Exit (Ctrl-D or Ctrl-C also work)"),
    ] {
        println!("  {:<14} {}", command.cyan(), help.dimmed());
    }
    println!(
        "{}",
        "Press Ctrl-C while an answer is pending to stop it.".dimmed()
    );
}

/// Ask `y/N` on stdin. Anything but an explicit yes declines.
pub async fn confirm(lines: &mut InputLines, prompt: &str) -> bool {
    print!("{}", prompt.yellow());
    let _ = io::stdout().flush();
    match lines.next_line().await {
        Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        _ => false,
    }
}

/// Submit a question and await it until either the backend answers or
/// `stop` completes. A stop cancels the pending request without surfacing an
/// error; the interactive client passes `signal::ctrl_c()`.
pub async fn ask_with_stop<B, S, F>(
    controller: &mut ChatController<B, S>,
    input: &str,
    stop: F,
) -> Option<Resolution>
where
    B: QaBackend,
    S: SessionStore,
    F: Future,
{
    let pending = controller.begin_question(input)?;
    display_thinking();

    let outcome = {
        let send = controller.backend().send_message(
            &pending.question,
            pending.session_id.as_deref(),
            pending.token(),
        );
        tokio::pin!(send);
        tokio::pin!(stop);
        let mut stopped = false;
        loop {
            tokio::select! {
                outcome = &mut send => break outcome,
                _ = &mut stop, if !stopped => {
                    debug!("stop requested");
                    stopped = true;
                    pending.cancel();
                }
            }
        }
    };

    Some(controller.resolve_question(pending, outcome).await)
}

pub async fn delete_with_confirmation<B, S>(
    controller: &mut ChatController<B, S>,
    lines: &mut InputLines,
    session_id: &str,
    skip_confirmation: bool,
) where
    B: QaBackend,
    S: SessionStore,
{
    if !skip_confirmation && !confirm(lines, DELETE_PROMPT).await {
        display_notice("Not deleted.");
        return;
    }
    if controller.delete_session(session_id).await {
        display_notice(&format!("Deleted chat {}.", session_id));
    } else {
        eprintln!("{}", format!("Failed to delete chat {}.", session_id).red());
    }
}

/// Interactive chat loop. Returns when the user quits, presses Ctrl-C at the
/// prompt, or the input closes.
pub async fn run_interactive<B, S>(
    controller: &mut ChatController<B, S>,
    lines: &mut InputLines,
) -> io::Result<()>
where
    B: QaBackend,
    S: SessionStore,
{
    display_conversation(&controller.state().messages);
    display_notice("Type /help for commands.");

    loop {
        print!("{} ", "›".bold());
        io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };

        match parse_command(&line) {
            Command::Ask(question) => {
                let resolution = ask_with_stop(controller, &question, signal::ctrl_c()).await;
                if let Some(resolution) = resolution {
                    display_resolution(&resolution, controller.state());
                }
            }
            Command::New => {
                controller.new_chat();
                display_conversation(&controller.state().messages);
            }
            Command::Sessions => {
                controller.refresh_sessions().await;
                let state = controller.state();
                display_sessions(&state.sessions, state.active_session_id.as_deref());
            }
            Command::Select(id) => {
                controller.select_session(&id).await;
                display_conversation(&controller.state().messages);
            }
            Command::Delete(id) => {
                delete_with_confirmation(controller, lines, &id, false).await;
            }
            Command::History => display_conversation(&controller.state().messages),
            Command::Help => print_help(),
            Command::Quit => break,
            Command::Unknown(raw) => {
                eprintln!("{}", format!("Unknown command: {}", raw).yellow());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_question() {
        assert_eq!(
            parse_command("What is X?"),
            Command::Ask("What is X?".to_string())
        );
        assert_eq!(parse_command("   "), Command::Ask("   ".to_string()));
    }

    #[test]
    fn slash_commands_with_arguments() {
        assert_eq!(parse_command("/select abc"), Command::Select("abc".to_string()));
        assert_eq!(parse_command("  /delete  s-1 "), Command::Delete("s-1".to_string()));
        assert_eq!(parse_command("/new"), Command::New);
        assert_eq!(parse_command("/quit"), Command::Quit);
    }

    #[tokio::test]
    async fn input_lines_end_when_sender_closes() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut lines = InputLines::from_receiver(rx);
        tx.send(Ok("hello".to_string())).unwrap();
        drop(tx);

        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("hello"));
        assert_eq!(lines.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn confirm_accepts_only_explicit_yes() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut lines = InputLines::from_receiver(rx);
        tx.send(Ok(" Yes ".to_string())).unwrap();
        tx.send(Ok("sure".to_string())).unwrap();
        drop(tx);

        assert!(confirm(&mut lines, DELETE_PROMPT).await);
        assert!(!confirm(&mut lines, DELETE_PROMPT).await);
        assert!(!confirm(&mut lines, DELETE_PROMPT).await);
    }

    #[test]
    fn missing_arguments_are_unknown() {
        assert_eq!(parse_command("/select"), Command::Unknown("/select".to_string()));
        assert_eq!(parse_command("/frobnicate"), Command::Unknown("/frobnicate".to_string()));
    }
}
