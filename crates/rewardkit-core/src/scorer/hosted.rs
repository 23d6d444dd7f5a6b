//! HTTP client for hosted rubric scoring

use std::time::Duration;

use serde_json::Value;

use super::prompt::build_request_body;
use super::provider::{self, ApiStyle};
use super::response::{parse_judgement, reply_text, status_error};
use super::{RubricScorer, ScorerError};
use crate::rubric::RequestContext;
use crate::settings::ScorerSettings;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Scores requests against a hosted model, one HTTP request per call, no retries
#[derive(Debug, Clone, Default)]
pub struct HostedScorer {
    settings: ScorerSettings,
}

impl HostedScorer {
    pub fn new(settings: ScorerSettings) -> Self {
        Self { settings }
    }

    pub fn from_env() -> Self {
        Self::new(ScorerSettings::from_env())
    }

    fn agent(&self) -> ureq::Agent {
        ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(self.settings.timeout_seconds)))
            .http_status_as_error(false)
            .build()
            .into()
    }
}

/// Endpoint URL and wire style for the context's provider
fn endpoint(context: &RequestContext) -> Result<(String, ApiStyle), ScorerError> {
    let spec = provider::lookup(&context.model.provider);
    let api = spec.map(|s| s.api).unwrap_or(ApiStyle::ChatCompletions);

    let base = context
        .model
        .base_url
        .clone()
        .or_else(|| spec.map(|s| s.default_base_url.to_string()))
        .ok_or_else(|| ScorerError::UnsupportedProvider {
            provider: context.model.provider.clone(),
        })?;
    let base = base.trim_end_matches('/');

    let url = match api {
        ApiStyle::ChatCompletions => format!("{}/chat/completions", base),
        ApiStyle::Messages => format!("{}/messages", base),
    };
    Ok((url, api))
}

impl RubricScorer for HostedScorer {
    #[tracing::instrument(skip(self, context), fields(provider = %context.model.provider, model = %context.model.model))]
    fn evaluate(&self, context: &RequestContext) -> Result<Value, ScorerError> {
        let api_key =
            context
                .model
                .api_key
                .as_deref()
                .ok_or_else(|| ScorerError::MissingApiKey {
                    provider: context.model.provider.clone(),
                    env_var: context.model.api_key_env.clone(),
                })?;

        let (url, api) = endpoint(context)?;
        let payload = build_request_body(context, api).to_string();

        tracing::debug!(url = %url, bytes = payload.len(), "sending scorer request");

        let agent = self.agent();
        let request = agent
            .post(url.as_str())
            .header("Content-Type", "application/json");
        let request = match api {
            ApiStyle::ChatCompletions => {
                request.header("Authorization", format!("Bearer {}", api_key))
            }
            ApiStyle::Messages => request
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
        };

        let mut response = request
            .send(payload.as_str())
            .map_err(|e| ScorerError::Request {
                detail: format!("transport error: {}", e),
            })?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ScorerError::Request {
                detail: format!("failed to read response body: {}", e),
            })?;

        tracing::debug!(status, bytes = body.len(), "scorer response");

        if !(200..300).contains(&status) {
            return Err(status_error(status, &body));
        }

        let json: Value = serde_json::from_str(&body).map_err(|e| ScorerError::Request {
            detail: format!("invalid JSON response: {}", e),
        })?;
        let text = reply_text(api, &json).ok_or_else(|| ScorerError::Request {
            detail: "unexpected response format (no reply text)".to_string(),
        })?;

        parse_judgement(&text, context.capture_details)
    }
}
