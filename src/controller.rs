use crate::api::{AskResponse, QaBackend, RequestOutcome};
use crate::models::{expand_history, Message, Session};
use crate::session::SessionStore;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Pending,
}

/// Everything the view renders.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AppState {
    pub active_session_id: Option<String>,
    pub messages: Vec<Message>,
    pub sessions: Vec<Session>,
    pub phase: Phase,
}

impl AppState {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Pending
    }
}

/// User intents forwarded by the view.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SubmitQuestion(String),
    StopGeneration,
    SelectSession(String),
    NewChat,
    DeleteSession(String),
    RefreshSessions,
}

/// How an in-flight question ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Completed,
    Failed(String),
    Cancelled,
}

/// A question that has been accepted and is waiting on the backend.
#[derive(Debug, Clone)]
pub struct PendingQuestion {
    pub question: String,
    pub session_id: Option<String>,
    cancel: CancellationToken,
}

impl PendingQuestion {
    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

/// Drives the conversation: owns the state, the session store and the
/// backend handle. All transitions happen on the caller's task.
pub struct ChatController<B, S> {
    backend: B,
    store: S,
    state: AppState,
    in_flight: Option<CancellationToken>,
}

impl<B: QaBackend, S: SessionStore> ChatController<B, S> {
    pub fn new(backend: B, store: S) -> Self {
        let active_session_id = store.load_active_session();
        Self {
            backend,
            store,
            state: AppState {
                active_session_id,
                ..AppState::default()
            },
            in_flight: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Initial load: history of the persisted session, then the session list.
    pub async fn mount(&mut self) {
        if let Some(id) = self.state.active_session_id.clone() {
            self.load_history(&id).await;
        }
        self.refresh_sessions().await;
    }

    pub async fn dispatch(&mut self, intent: Intent) -> Option<Resolution> {
        debug!(?intent, "dispatching intent");
        match intent {
            Intent::SubmitQuestion(input) => return self.ask(&input).await,
            Intent::StopGeneration => {
                self.stop();
            }
            Intent::SelectSession(id) => self.select_session(&id).await,
            Intent::NewChat => self.new_chat(),
            Intent::DeleteSession(id) => {
                self.delete_session(&id).await;
            }
            Intent::RefreshSessions => self.refresh_sessions().await,
        }
        None
    }

    /// Submit and await a question in one step. Returns `None` when the
    /// submission was rejected (blank input, or a question already pending).
    pub async fn ask(&mut self, input: &str) -> Option<Resolution> {
        let pending = self.begin_question(input)?;
        let outcome = self
            .backend
            .send_message(&pending.question, pending.session_id.as_deref(), &pending.cancel)
            .await;
        Some(self.resolve_question(pending, outcome).await)
    }

    /// `Idle -> Pending`. Appends the user message and arms a fresh
    /// cancellation token.
    pub fn begin_question(&mut self, input: &str) -> Option<PendingQuestion> {
        if input.trim().is_empty() {
            debug!("ignoring blank question");
            return None;
        }
        if self.state.is_loading() {
            debug!("ignoring question while another is pending");
            return None;
        }

        self.state.messages.push(Message::user(input));
        self.state.phase = Phase::Pending;

        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());

        Some(PendingQuestion {
            question: input.to_string(),
            session_id: self.state.active_session_id.clone(),
            cancel,
        })
    }

    /// `Pending -> {Completed, Failed, Cancelled} -> Idle`.
    pub async fn resolve_question(
        &mut self,
        pending: PendingQuestion,
        outcome: RequestOutcome<AskResponse>,
    ) -> Resolution {
        self.in_flight = None;
        self.state.phase = Phase::Idle;

        // A stop that raced a successful response still wins.
        let outcome = if pending.cancel.is_cancelled() {
            RequestOutcome::Cancelled
        } else {
            outcome
        };

        match outcome {
            RequestOutcome::Completed(reply) => {
                self.state
                    .messages
                    .push(Message::assistant(reply.answer, reply.context));

                if self.state.active_session_id.is_none() {
                    if let Some(id) = reply.session_id.filter(|id| !id.is_empty()) {
                        self.activate_session(&id).await;
                    }
                }
                Resolution::Completed
            }
            RequestOutcome::Failed(err) => {
                warn!(error = %err, "question failed");
                self.state.messages.push(Message::error(&err));
                Resolution::Failed(err.to_string())
            }
            RequestOutcome::Cancelled => {
                debug!("question cancelled by user");
                Resolution::Cancelled
            }
        }
    }

    /// Raise the cancellation signal of the pending question, if any.
    pub fn stop(&mut self) -> bool {
        match &self.in_flight {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub async fn select_session(&mut self, session_id: &str) {
        if session_id.is_empty() {
            return;
        }
        self.activate_session(session_id).await;
    }

    /// Forget the active session locally. Never touches the backend.
    pub fn new_chat(&mut self) {
        if let Err(e) = self.store.clear_active_session() {
            warn!(error = %e, "could not clear persisted session");
        }
        self.state.active_session_id = None;
        self.state.messages.clear();
    }

    /// Delete a session on the backend. When it is the active one the local
    /// conversation is reset first. Returns whether the backend accepted it.
    /// An empty id is rejected without touching local state or the backend.
    pub async fn delete_session(&mut self, session_id: &str) -> bool {
        if session_id.is_empty() {
            return false;
        }
        if self.state.active_session_id.as_deref() == Some(session_id) {
            self.new_chat();
        }

        let deleted = match self.backend.delete_session(session_id).await {
            Ok(()) => true,
            Err(e) => {
                warn!(session_id, error = %e, "failed to delete session");
                false
            }
        };

        self.refresh_sessions().await;
        deleted
    }

    pub async fn refresh_sessions(&mut self) {
        match self.backend.get_sessions().await {
            Ok(sessions) => self.state.sessions = sessions,
            Err(e) => warn!(error = %e, "failed to fetch sessions"),
        }
    }

    async fn activate_session(&mut self, session_id: &str) {
        if let Err(e) = self.store.save_active_session(session_id) {
            warn!(session_id, error = %e, "could not persist active session");
        }
        self.state.active_session_id = Some(session_id.to_string());
        self.load_history(session_id).await;
        self.refresh_sessions().await;
    }

    async fn load_history(&mut self, session_id: &str) {
        match self.backend.get_history(session_id).await {
            Ok(turns) => self.state.messages = expand_history(&turns),
            Err(e) => warn!(session_id, error = %e, "failed to load history"),
        }
    }
}
