//! Dataset records and record selection

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::normalize_text;
use crate::error::{RewardError, Result};

/// One chat message of a recorded conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// A candidate response plus the identifiers used to select it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_str: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_truth: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub rubric_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_input: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<ChatMessage>,
}

/// Identifiers may be written as `"7"` or `7`
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Null) | None => None,
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected string or number identifier, got {}",
                other
            )))
        }
    })
}

impl DatasetRecord {
    /// The candidate text: `solution_str`, or the last assistant message
    pub fn solution(&self) -> Option<String> {
        normalize_text(self.solution_str.as_deref()).or_else(|| {
            self.messages
                .iter()
                .rev()
                .find(|m| m.role.eq_ignore_ascii_case("assistant"))
                .and_then(|m| normalize_text(Some(m.content.as_str())))
        })
    }
}

/// Parse a dataset document: a JSON array, a single JSON object, or JSON lines
pub fn parse_records(content: &str) -> Result<Vec<DatasetRecord>> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    if let Ok(record) = serde_json::from_str::<DatasetRecord>(trimmed) {
        return Ok(vec![record]);
    }

    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|e| {
            RewardError::invalid_value(&format!("dataset record at line {}", idx + 1), e)
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Load all records from a dataset file
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_records(path: &Path) -> Result<Vec<DatasetRecord>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| RewardError::io_operation("read dataset", path.display(), e))?;
    let records = parse_records(&content)?;
    tracing::debug!(count = records.len(), "loaded dataset records");
    Ok(records)
}

/// Pick the first record matching the filters, in original order.
///
/// Records carrying a different `rubric_id` are skipped; records without one
/// match any rubric. When `conversation_id` is given it must match exactly.
pub fn select_record<'a>(
    records: &'a [DatasetRecord],
    rubric_id: Option<&str>,
    conversation_id: Option<&str>,
) -> Result<&'a DatasetRecord> {
    let rubric_id = normalize_text(rubric_id);
    let conversation_id = normalize_text(conversation_id);

    let mut candidates = records.iter().filter(|record| {
        match (
            rubric_id.as_deref(),
            normalize_text(record.rubric_id.as_deref()),
        ) {
            (Some(wanted), Some(have)) => wanted == have,
            _ => true,
        }
    });

    let selected = match conversation_id.as_deref() {
        Some(conversation) => candidates.find(|record| {
            normalize_text(record.conversation_id.as_deref()).as_deref() == Some(conversation)
        }),
        None => candidates.next(),
    };

    selected.ok_or_else(|| {
        let rubric = rubric_id.as_deref().unwrap_or("<any>");
        match conversation_id {
            Some(conversation) => RewardError::not_found(
                "conversation",
                format!("{} (rubric {})", conversation, rubric),
            ),
            None => RewardError::not_found("dataset record for rubric", rubric),
        }
    })
}
