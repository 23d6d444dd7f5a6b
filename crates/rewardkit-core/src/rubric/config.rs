//! Rubric configuration loading
//!
//! A config document maps rubric ids to entries:
//!
//! ```yaml
//! support_quality:
//!   rubric: "Reward answers that resolve the customer's issue."
//!   score_min: 0.0
//!   score_max: 1.0
//!   ground_truth: "The refund was issued."
//!   model_info:
//!     provider: openai
//!     model: gpt-5-mini
//! ```
//!
//! A document holding a single rubric may also be written flat, with the
//! entry keys at the top level; its id is the file stem.
//!
//! YAML, JSON and TOML documents are accepted, chosen by file extension.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::model::ModelInfo;
use super::normalize_text;
use crate::bail_usage;
use crate::error::{RewardError, Result};

pub const DEFAULT_SCORE_MIN: f64 = 0.0;
pub const DEFAULT_SCORE_MAX: f64 = 1.0;

/// Serialization format of a config or dataset document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
    Toml,
}

impl DocumentFormat {
    /// Pick the format from the file extension; anything unrecognised is read as YAML
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => DocumentFormat::Json,
            Some("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Yaml,
        }
    }

    pub fn parse<T: DeserializeOwned>(self, content: &str) -> Result<T> {
        Ok(match self {
            DocumentFormat::Yaml => serde_yaml::from_str(content)?,
            DocumentFormat::Json => serde_json::from_str(content)?,
            DocumentFormat::Toml => toml::from_str(content)?,
        })
    }
}

/// One rubric entry as written in the config document
#[derive(Debug, Clone, Default, Deserialize)]
struct RubricEntry {
    #[serde(default)]
    rubric: Option<String>,
    #[serde(default)]
    score_min: Option<f64>,
    #[serde(default)]
    score_max: Option<f64>,
    #[serde(default)]
    ground_truth: Option<String>,
    #[serde(default)]
    model_info: Option<ModelInfo>,
    #[serde(default)]
    default_model_info: Option<ModelInfo>,
    #[serde(default)]
    system_prompt: Option<String>,
}

/// A single resolved rubric, read-only after loading
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RubricConfig {
    pub rubric_id: String,
    pub rubric_text: String,
    pub score_min: f64,
    pub score_max: f64,
    pub ground_truth: Option<String>,
    pub model_info: ModelInfo,
    pub system_prompt: Option<String>,
    pub source_label: String,
}

impl RubricConfig {
    fn from_entry(rubric_id: &str, entry: RubricEntry, source_label: String) -> Result<Self> {
        let rubric_text = normalize_text(entry.rubric.as_deref()).ok_or_else(|| {
            RewardError::invalid_config(source_label.clone(), "missing or empty 'rubric' text")
        })?;

        let score_min = entry.score_min.unwrap_or(DEFAULT_SCORE_MIN);
        let score_max = entry.score_max.unwrap_or(DEFAULT_SCORE_MAX);
        if !score_min.is_finite() || !score_max.is_finite() || score_min >= score_max {
            return Err(RewardError::invalid_config(
                source_label,
                format!("score_min ({score_min}) must be below score_max ({score_max})"),
            ));
        }

        Ok(RubricConfig {
            rubric_id: rubric_id.to_string(),
            rubric_text,
            score_min,
            score_max,
            ground_truth: normalize_text(entry.ground_truth.as_deref()),
            model_info: entry
                .model_info
                .or(entry.default_model_info)
                .unwrap_or_default(),
            system_prompt: normalize_text(entry.system_prompt.as_deref()),
            source_label,
        })
    }
}

/// Whether `document` is a single rubric written at the top level
/// (`rubric: "..."`, `score_min: ...`) rather than a map of rubric ids
fn is_flat_document(document: &Value) -> bool {
    document.get("rubric").is_some_and(Value::is_string)
}

/// Id for a flat document: the explicit id, else the origin's file stem
fn flat_rubric_id(origin: &str, rubric_id: Option<&str>) -> String {
    normalize_text(rubric_id).unwrap_or_else(|| {
        Path::new(origin)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(origin)
            .to_string()
    })
}

/// Parse a config document and pick one rubric from it.
///
/// The document is either a map of rubric id to entry or a single flat entry.
/// For a map without an explicit `rubric_id` it must contain exactly one rubric.
pub fn parse_rubric_config(
    content: &str,
    format: DocumentFormat,
    origin: &str,
    rubric_id: Option<&str>,
) -> Result<RubricConfig> {
    let document: Value = format
        .parse(content)
        .map_err(|e| RewardError::invalid_config(origin, e.to_string()))?;

    if is_flat_document(&document) {
        let rubric_id = flat_rubric_id(origin, rubric_id);
        let entry: RubricEntry = serde_json::from_value(document)
            .map_err(|e| RewardError::invalid_config(origin, e.to_string()))?;
        let source_label = format!("{}#{}", origin, rubric_id);
        return RubricConfig::from_entry(&rubric_id, entry, source_label);
    }

    let mut entries: BTreeMap<String, RubricEntry> = serde_json::from_value(document)
        .map_err(|e| RewardError::invalid_config(origin, e.to_string()))?;

    let rubric_id = match normalize_text(rubric_id) {
        Some(id) => id,
        None => match entries.len() {
            1 => entries.keys().next().cloned().unwrap_or_default(),
            0 => return Err(RewardError::invalid_config(origin, "no rubrics defined")),
            _ => bail_usage!(format!(
                "{} defines several rubrics; choose one with --rubric ({})",
                origin,
                entries.keys().cloned().collect::<Vec<_>>().join(", ")
            )),
        },
    };

    let source_label = format!("{}#{}", origin, rubric_id);
    let entry = entries
        .remove(&rubric_id)
        .ok_or_else(|| RewardError::RubricNotFound {
            rubric_id: rubric_id.clone(),
            source_label: origin.to_string(),
        })?;

    RubricConfig::from_entry(&rubric_id, entry, source_label)
}

/// Load a rubric from a config file
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_rubric_config(path: &Path, rubric_id: Option<&str>) -> Result<RubricConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| RewardError::io_operation("read rubric config", path.display(), e))?;

    let config = parse_rubric_config(
        &content,
        DocumentFormat::from_path(path),
        &path.display().to_string(),
        rubric_id,
    )?;

    tracing::debug!(
        rubric_id = %config.rubric_id,
        score_min = config.score_min,
        score_max = config.score_max,
        "loaded rubric config"
    );
    Ok(config)
}
