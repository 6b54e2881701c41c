use serde_json::Value;

pub const GENERIC_REQUEST_FAILURE: &str = "Request failed";

/// Extract the user-facing message from an error body's `detail` field.
///
/// String details are returned verbatim. Structured details (validation
/// error lists, objects) are rendered as compact JSON.
pub fn extract_detail(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    match json.get("detail")? {
        Value::Null => None,
        Value::String(detail) if detail.is_empty() => None,
        Value::String(detail) => Some(detail.clone()),
        other => Some(other.to_string()),
    }
}

/// Message for a failed ask-question call.
pub fn failure_message(body: &str) -> String {
    extract_detail(body).unwrap_or_else(|| GENERIC_REQUEST_FAILURE.to_string())
}
