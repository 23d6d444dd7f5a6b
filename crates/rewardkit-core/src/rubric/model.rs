//! Model/provider settings and credential resolution

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::normalize_text;
use crate::error::{RewardError, Result};
use crate::scorer::provider;
use crate::settings::{base_url_env_var, EnvSource};

/// `model_info` block as written in a rubric config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Provider options passed through to the request (`temperature`, `max_tokens`, ...)
    #[serde(flatten)]
    pub options: BTreeMap<String, Value>,
}

/// Fully resolved settings for one scorer call
#[derive(Clone, PartialEq, Serialize)]
pub struct ModelSettings {
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub api_key_env: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, Value>,
}

impl fmt::Debug for ModelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSettings")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_key_env", &self.api_key_env)
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish()
    }
}

/// Resolve provider, model and credentials from `model_info`.
///
/// `api_key_env`: explicit value, then the provider's default variable, then
/// `OPENAI_API_KEY`. `api_key`: explicit value, then the variable named by
/// `api_key_env`. A missing key is not an error here; the scorer reports it.
pub fn resolve_model_settings(info: &ModelInfo, env: &dyn EnvSource) -> Result<ModelSettings> {
    let provider = normalize_text(info.provider.as_deref()).ok_or_else(|| {
        RewardError::MissingModelSetting {
            field: "provider".to_string(),
        }
    })?;
    let model =
        normalize_text(info.model.as_deref()).ok_or_else(|| RewardError::MissingModelSetting {
            field: "model".to_string(),
        })?;

    let api_key_env = normalize_text(info.api_key_env.as_deref())
        .unwrap_or_else(|| provider::default_api_key_env(&provider).to_string());

    let api_key = normalize_text(info.api_key.as_deref()).or_else(|| env.non_blank(&api_key_env));

    let base_url = normalize_text(info.base_url.as_deref())
        .or_else(|| env.non_blank(&base_url_env_var(&provider)));

    tracing::debug!(
        provider = %provider,
        model = %model,
        api_key_env = %api_key_env,
        has_api_key = api_key.is_some(),
        base_url = ?base_url,
        "resolved model settings"
    );

    Ok(ModelSettings {
        provider,
        model,
        api_key,
        api_key_env,
        base_url,
        options: info.options.clone(),
    })
}
