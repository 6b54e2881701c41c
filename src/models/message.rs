use crate::api::models::HistoryTurn;
use crate::error::ChatError;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Assistant,
}

/// One chat bubble as the client displays it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Set on the inline message standing in for a failed question.
    #[serde(default, skip_serializing_if = "is_false")]
    pub failed: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::User,
            content: content.into(),
            context: None,
            timestamp: Some(now()),
            failed: false,
        }
    }

    pub fn assistant(content: impl Into<String>, context: Option<String>) -> Self {
        Self {
            kind: MessageKind::Assistant,
            content: content.into(),
            context,
            timestamp: Some(now()),
            failed: false,
        }
    }

    /// Inline assistant message surfacing a failed question.
    pub fn error(err: &ChatError) -> Self {
        Self {
            failed: true,
            ..Self::assistant(format!("Error: {}", err), None)
        }
    }

    pub fn is_user(&self) -> bool {
        self.kind == MessageKind::User
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Flatten backend turns into messages, oldest first, user before assistant
/// within a turn. Turns missing a side contribute only the side they have.
pub fn expand_history(turns: &[HistoryTurn]) -> Vec<Message> {
    turns
        .iter()
        .flat_map(|turn| {
            let question = present(&turn.question).map(|q| Message {
                kind: MessageKind::User,
                content: q.to_string(),
                context: None,
                timestamp: turn.timestamp.clone(),
                failed: false,
            });
            let answer = present(&turn.answer).map(|a| Message {
                kind: MessageKind::Assistant,
                content: a.to_string(),
                context: turn.context.clone(),
                timestamp: turn.timestamp.clone(),
                failed: false,
            });
            question.into_iter().chain(answer)
        })
        .collect()
}
