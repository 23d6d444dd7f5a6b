//! Hosted rubric scorer
//!
//! [`RubricScorer`] is the seam between request building and the network.
//! [`HostedScorer`] implements it over HTTP for OpenAI-compatible and Anthropic
//! endpoints; tests and embedders can substitute their own implementation.

mod hosted;
pub mod prompt;
pub mod provider;
pub mod response;

use serde_json::Value;

use crate::error::RewardError;
use crate::rubric::RequestContext;

pub use hosted::HostedScorer;

/// Evaluates one request context.
///
/// Returns `{"score": .., "explanation": ..}` when `context.capture_details`
/// is set, otherwise the bare numeric score.
pub trait RubricScorer {
    fn evaluate(&self, context: &RequestContext) -> Result<Value, ScorerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ScorerError {
    #[error("no API key for provider '{provider}' (expected in {env_var})")]
    MissingApiKey { provider: String, env_var: String },

    #[error("unsupported provider '{provider}' without base_url")]
    UnsupportedProvider { provider: String },

    #[error("model not found: {detail}")]
    ModelNotFound { detail: String },

    #[error("request failed: {detail}")]
    Request { detail: String },
}

impl From<ScorerError> for RewardError {
    fn from(err: ScorerError) -> Self {
        match err {
            ScorerError::MissingApiKey { provider, env_var } => {
                RewardError::MissingCredential { provider, env_var }
            }
            ScorerError::UnsupportedProvider { provider: name } => {
                RewardError::unsupported("provider", name, provider::supported_names())
            }
            ScorerError::ModelNotFound { detail } => RewardError::ModelNotFound { detail },
            ScorerError::Request { detail } => RewardError::ProviderRequest { detail },
        }
    }
}

#[cfg(test)]
mod tests;
