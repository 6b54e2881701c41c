use clap::Parser;
use colored::*;
use std::process;

use ikms_chat::api::QaClient;
use ikms_chat::cli::Args;
use ikms_chat::config::Config;
use ikms_chat::controller::{ChatController, Resolution};
use ikms_chat::logging::init_tracing;
use ikms_chat::repl::{
    ask_with_stop, delete_with_confirmation, run_interactive, stdin_lines, InputLines,
};
use ikms_chat::session::FilesystemSessionStore;
use ikms_chat::ui::{display_conversation, display_notice, display_resolution, display_sessions};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match Config::from_env_and_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };

    init_tracing(config.verbose);
    tracing::debug!(api_base = %config.api_base, state_dir = %config.state_dir.display(), "configuration loaded");

    let client = match QaClient::new(&config.api_base, config.request_timeout()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            process::exit(1);
        }
    };
    let store = FilesystemSessionStore::with_dir(&config.state_dir);
    let mut controller = ChatController::new(client, store);
    let mut input: Option<InputLines> = None;

    if args.new_chat {
        controller.new_chat();
        display_notice("Started a new chat.");
    }

    if let Some(id) = args.select.as_deref() {
        controller.select_session(id).await;
        display_conversation(&controller.state().messages);
    }

    if let Some(id) = args.delete.as_deref() {
        let lines = input.get_or_insert_with(stdin_lines);
        delete_with_confirmation(&mut controller, lines, id, args.yes).await;
    }

    if args.list_sessions {
        controller.refresh_sessions().await;
        let state = controller.state();
        display_sessions(&state.sessions, state.active_session_id.as_deref());
    }

    if args.history {
        controller.mount().await;
        display_conversation(&controller.state().messages);
    }

    if args.is_management_only() {
        return;
    }

    if !args.question.is_empty() {
        let question = args.question.join(" ");
        match ask_with_stop(&mut controller, &question, tokio::signal::ctrl_c()).await {
            Some(resolution) => {
                display_resolution(&resolution, controller.state());
                if matches!(resolution, Resolution::Failed(_)) {
                    process::exit(1);
                }
            }
            None => {
                eprintln!("{}", "Nothing to ask: the question is empty.".yellow());
                process::exit(1);
            }
        }
        return;
    }

    controller.mount().await;
    let lines = input.get_or_insert_with(stdin_lines);
    let result = run_interactive(&mut controller, lines).await;
    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red(), e);
        process::exit(1);
    }
}
