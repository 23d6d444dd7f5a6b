//! Provider response parsing

use serde_json::{json, Map, Value};

use super::provider::ApiStyle;
use super::ScorerError;

/// Human-readable error message from a provider error body
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Whether a non-success response reports an unknown model
pub fn is_model_not_found(status: u16, body: &str) -> bool {
    if status == 404 {
        return true;
    }
    let Ok(v) = serde_json::from_str::<Value>(body) else {
        return false;
    };
    let code = v.pointer("/error/code").and_then(Value::as_str);
    let kind = v.pointer("/error/type").and_then(Value::as_str);
    matches!(code, Some("model_not_found")) || matches!(kind, Some("not_found_error"))
}

/// Map a non-success HTTP status to a scorer error
pub fn status_error(status: u16, body: &str) -> ScorerError {
    let message = error_message(body);
    if is_model_not_found(status, body) {
        ScorerError::ModelNotFound { detail: message }
    } else {
        ScorerError::Request {
            detail: format!("HTTP {}: {}", status, message),
        }
    }
}

/// The model's reply text from a successful response body
pub fn reply_text(api: ApiStyle, body: &Value) -> Option<String> {
    match api {
        ApiStyle::ChatCompletions => body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string),
        ApiStyle::Messages => body
            .get("content")
            .and_then(Value::as_array)
            .and_then(|blocks| {
                blocks
                    .iter()
                    .find(|b| b.get("type").and_then(Value::as_str) == Some("text"))
            })
            .and_then(|b| b.get("text"))
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Parse the JSON judgement object out of a reply, tolerating code fences or prose
fn judgement_object(text: &str) -> Option<Map<String, Value>> {
    if let Ok(Value::Object(obj)) = serde_json::from_str(text.trim()) {
        return Some(obj);
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str(&text[start..=end]) {
        Ok(Value::Object(obj)) => Some(obj),
        _ => None,
    }
}

/// Turn reply text into the scorer's raw result.
///
/// With `return_details` the result is `{"score": f64, "explanation": str, ..}`;
/// otherwise it is the bare score.
pub fn parse_judgement(text: &str, return_details: bool) -> Result<Value, ScorerError> {
    let mut obj = judgement_object(text).ok_or_else(|| ScorerError::Request {
        detail: format!("scorer reply is not a JSON object: {}", text.trim()),
    })?;

    let score = match obj.get("score") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|s| s.is_finite())
    .ok_or_else(|| ScorerError::Request {
        detail: "scorer reply has no numeric score".to_string(),
    })?;

    if !return_details {
        return Ok(json!(score));
    }

    obj.insert("score".to_string(), json!(score));
    if !obj.get("explanation").is_some_and(Value::is_string) {
        obj.insert("explanation".to_string(), json!(""));
    }
    Ok(Value::Object(obj))
}
