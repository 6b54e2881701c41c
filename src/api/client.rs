use super::models::{AskRequest, AskResponse, HistoryTurn};
use super::response::failure_message;
use super::{QaBackend, RequestOutcome};
use crate::error::{ChatError, Result};
use crate::models::Session;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response, Url};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const HISTORY_FAILURE: &str = "Failed to fetch history";
const SESSIONS_FAILURE: &str = "Failed to load sessions";
const DELETE_FAILURE: &str = "Failed to delete session";

/// HTTP+JSON client for the question-answering backend.
#[derive(Clone)]
pub struct QaClient {
    http: Client,
    base: Url,
}

impl QaClient {
    pub fn new(api_base: &str, timeout: Option<Duration>) -> Result<Self> {
        let base = Url::parse(api_base)
            .map_err(|e| ChatError::Config(format!("Invalid API base URL '{}': {}", api_base, e)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ChatError::Config(format!(
                "API base URL must use http or https: {}",
                api_base
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Join path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn ask(&self, request: &AskRequest) -> Result<AskResponse> {
        let url = self.endpoint(&["qa", "conversation"]);
        debug!(%url, has_session = request.session_id.is_some(), "sending question");

        let response = self.http.post(url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = failure_message(&body);
            warn!(status = status.as_u16(), %message, "question rejected by backend");
            return Err(ChatError::request(status.as_u16(), message));
        }

        Ok(response.json::<AskResponse>().await?)
    }
}

/// Map a non-success status to a request error carrying a fixed message.
async fn ensure_success(response: Response, message: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), %body, "backend returned an error status");
    Err(ChatError::request(status.as_u16(), message))
}

#[async_trait]
impl QaBackend for QaClient {
    async fn send_message(
        &self,
        question: &str,
        session_id: Option<&str>,
        cancel: &CancellationToken,
    ) -> RequestOutcome<AskResponse> {
        let request = AskRequest {
            question: question.to_string(),
            session_id: session_id.filter(|id| !id.is_empty()).map(str::to_string),
        };

        // Dropping the exchange future aborts the underlying connection.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("question cancelled before the backend answered");
                RequestOutcome::Cancelled
            }
            result = self.ask(&request) => result.into(),
        }
    }

    async fn get_history(&self, session_id: &str) -> Result<Vec<HistoryTurn>> {
        if session_id.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.endpoint(&["qa", "session", session_id, "history"]);
        debug!(%url, "fetching history");

        let response = self.http.get(url).send().await?;
        let response = ensure_success(response, HISTORY_FAILURE).await?;
        Ok(response.json::<Vec<HistoryTurn>>().await?)
    }

    async fn get_sessions(&self) -> Result<Vec<Session>> {
        let url = self.endpoint(&["qa", "sessions"]);
        debug!(%url, "listing sessions");

        let response = self.http.get(url).send().await?;
        let response = ensure_success(response, SESSIONS_FAILURE).await?;
        Ok(response.json::<Vec<Session>>().await?)
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let url = self.endpoint(&["qa", "session", session_id]);
        debug!(%url, "deleting session");

        let response = self.http.delete(url).send().await?;
        ensure_success(response, DELETE_FAILURE).await?;
        Ok(())
    }
}
