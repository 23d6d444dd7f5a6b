//! Request context assembly and result normalization

use serde::Serialize;
use serde_json::{Map, Value};

use super::config::RubricConfig;
use super::dataset::{ChatMessage, DatasetRecord};
use super::model::ModelSettings;
use super::normalize_text;
use crate::error::{RewardError, Result};

/// Everything the hosted scorer needs for one evaluation.
///
/// Built once per invocation from a [`RubricConfig`] and a [`DatasetRecord`];
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestContext {
    pub rubric_id: String,
    pub rubric_text: String,
    pub score_min: f64,
    pub score_max: f64,
    pub model: ModelSettings,
    pub solution_str: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ground_truth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_input: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<ChatMessage>,
    pub capture_details: bool,
}

/// Merge config, record and resolved model settings into one request.
///
/// String fields are trimmed and blank values dropped. The record's ground
/// truth takes precedence over the config's.
pub fn build_request_context(
    config: &RubricConfig,
    record: &DatasetRecord,
    model: ModelSettings,
    capture_details: bool,
) -> Result<RequestContext> {
    let solution_str = record
        .solution()
        .ok_or_else(|| RewardError::invalid_value("solution_str", "empty after normalization"))?;

    let messages = record
        .messages
        .iter()
        .filter_map(|m| {
            normalize_text(Some(m.content.as_str())).map(|content| ChatMessage {
                role: m.role.trim().to_string(),
                content,
            })
        })
        .collect();

    Ok(RequestContext {
        rubric_id: config.rubric_id.clone(),
        rubric_text: config.rubric_text.clone(),
        score_min: config.score_min,
        score_max: config.score_max,
        model,
        solution_str,
        ground_truth: normalize_text(record.ground_truth.as_deref())
            .or_else(|| config.ground_truth.clone()),
        system_prompt: config.system_prompt.clone(),
        metadata: record.metadata.clone().filter(|m| !m.is_empty()),
        conversation_id: normalize_text(record.conversation_id.as_deref()),
        original_input: normalize_text(record.original_input.as_deref()),
        messages,
        capture_details,
    })
}

/// Final score of one rubric evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreOutcome {
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// The scorer's full structured result, kept when details were requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

fn as_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}

/// Convert the scorer's raw result into a [`ScoreOutcome`].
///
/// With `capture_details` the result must be an object with a numeric
/// `score` and optional `explanation`; otherwise it must be a bare number.
pub fn normalize_result(raw: Value, capture_details: bool) -> Result<ScoreOutcome> {
    if capture_details {
        let score = raw
            .as_object()
            .and_then(|obj| obj.get("score"))
            .and_then(as_score)
            .ok_or_else(|| RewardError::invalid_value("scorer result (expected {score, ...})", &raw))?;
        let explanation = raw
            .get("explanation")
            .and_then(Value::as_str)
            .and_then(|s| normalize_text(Some(s)));
        return Ok(ScoreOutcome {
            score,
            explanation,
            details: Some(raw),
        });
    }

    let score = as_score(&raw)
        .ok_or_else(|| RewardError::invalid_value("scorer result (expected a number)", &raw))?;
    Ok(ScoreOutcome {
        score,
        explanation: None,
        details: None,
    })
}
