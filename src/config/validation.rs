use crate::error::{ChatError, Result};
use reqwest::Url;
use std::env;
use std::sync::OnceLock;

fn env_var_pattern() -> &'static regex::Regex {
    static PATTERN: OnceLock<regex::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex::Regex::new(r"\$\{([^}]+)\}").expect("environment variable pattern is valid")
    })
}

/// Expand environment variables in a string using ${VAR_NAME} syntax.
/// Unset variables are left as written.
pub fn expand_env_var_in_string(value: &str) -> String {
    expand_with(value, |name| env::var(name).ok())
}

pub(crate) fn expand_with<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    env_var_pattern()
        .replace_all(value, |caps: &regex::Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Trim surrounding whitespace and trailing slashes, then require an
/// absolute http(s) URL.
pub fn normalize_api_base(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ChatError::Config("API base URL is empty".to_string()));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| ChatError::Config(format!("Invalid API base URL '{}': {}", trimmed, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        scheme => Err(ChatError::Config(format!(
            "Unsupported scheme '{}' in API base URL '{}'",
            scheme, trimmed
        ))),
    }
}

pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}
