use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone)]
pub struct AskRequest {
    pub question: String,
    /// Serialized as `null` when absent; the backend creates a session then.
    pub session_id: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// One stored question/answer exchange.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct HistoryTurn {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}
