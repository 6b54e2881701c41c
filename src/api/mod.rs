pub mod client;
pub mod models;
pub mod response;

pub use client::QaClient;
pub use models::{AskRequest, AskResponse, HistoryTurn};

use crate::error::{ChatError, Result};
use crate::models::Session;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Result of a cancellable backend call.
///
/// Cancellation is its own arm so callers never have to sniff an error to
/// tell a user-initiated stop from a failure.
#[derive(Debug)]
pub enum RequestOutcome<T> {
    Completed(T),
    Failed(ChatError),
    Cancelled,
}

impl<T> RequestOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RequestOutcome::Cancelled)
    }
}

impl<T> From<Result<T>> for RequestOutcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => RequestOutcome::Completed(value),
            Err(err) => RequestOutcome::Failed(err),
        }
    }
}

/// The four operations of the question-answering backend.
#[async_trait]
pub trait QaBackend: Send + Sync {
    /// Ask a question, creating a session server-side when `session_id` is
    /// `None`. Observes `cancel` for the whole exchange.
    async fn send_message(
        &self,
        question: &str,
        session_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> RequestOutcome<AskResponse>;

    /// Turns of a session, oldest first. An empty id yields an empty list
    /// without contacting the backend.
    async fn get_history(&self, session_id: &str) -> Result<Vec<HistoryTurn>>;

    async fn get_sessions(&self) -> Result<Vec<Session>>;

    async fn delete_session(&self, session_id: &str) -> Result<()>;
}
