use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub const UNTITLED_SESSION: &str = "Untitled Chat";

/// A conversation as listed by the backend. Read-only on the client.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Session {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Session {
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => UNTITLED_SESSION,
        }
    }

    /// Calendar date of `created_at` when it parses, the raw value otherwise.
    pub fn created_date(&self) -> Option<String> {
        let raw = self.created_at.as_deref()?;
        Some(
            parse_created_at(raw)
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| raw.to_string()),
        )
    }
}

fn parse_created_at(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    // Backends built on Python datetimes often omit the offset.
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
