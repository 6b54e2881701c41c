use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Request { status: u16, message: String },
    /// The request never produced a response (connect, timeout, decode).
    #[error("{0}")]
    Network(#[from] reqwest::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChatError {
    pub fn request(status: u16, message: impl Into<String>) -> Self {
        ChatError::Request {
            status,
            message: message.into(),
        }
    }

    /// True for failures of a backend call, whether the server rejected it or
    /// the network did.
    pub fn is_request_error(&self) -> bool {
        matches!(self, ChatError::Request { .. } | ChatError::Network(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ChatError::Request { status, .. } => Some(*status),
            ChatError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ChatError>;
