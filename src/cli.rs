use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "ikms")]
#[command(about = "Terminal chat client for the IKMS question-answering service", long_about = None)]
pub struct Args {
    #[arg(short = 'n', long = "new", help = "Start a new chat (forget the active session)")]
    pub new_chat: bool,

    #[arg(short = 'l', long = "sessions", help = "List chat sessions")]
    pub list_sessions: bool,

    #[arg(long = "select", value_name = "ID", help = "Switch to an existing session")]
    pub select: Option<String>,

    #[arg(long = "delete", value_name = "ID", help = "Delete a session")]
    pub delete: Option<String>,

    #[arg(short = 'y', long = "yes", help = "Do not ask for confirmation before deleting")]
    pub yes: bool,

    #[arg(long = "history", help = "Print the active conversation")]
    pub history: bool,

    #[arg(
        long = "api-base",
        value_name = "URL",
        help = "Backend base URL (e.g., http://localhost:8001)"
    )]
    pub api_base: Option<String>,

    #[arg(short = 'v', long = "verbose", help = "Log requests and state transitions")]
    pub verbose: bool,

    #[arg(help = "Question to ask; starts an interactive chat when omitted")]
    pub question: Vec<String>,
}

impl Args {
    /// True when the invocation only manages sessions and should not enter
    /// the interactive chat.
    pub fn is_management_only(&self) -> bool {
        self.question.is_empty()
            && (self.new_chat
                || self.list_sessions
                || self.select.is_some()
                || self.delete.is_some()
                || self.history)
    }
}
