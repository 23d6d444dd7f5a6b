//! Known hosted-model providers

/// API key variable used when a provider has no entry in [`PROVIDERS`]
pub const GENERIC_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Wire protocol spoken by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStyle {
    /// OpenAI-compatible `POST {base}/chat/completions`
    ChatCompletions,
    /// Anthropic `POST {base}/messages`
    Messages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSpec {
    pub name: &'static str,
    pub api_key_env: &'static str,
    pub default_base_url: &'static str,
    pub api: ApiStyle,
}

pub const PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        name: "openai",
        api_key_env: "OPENAI_API_KEY",
        default_base_url: "https://api.openai.com/v1",
        api: ApiStyle::ChatCompletions,
    },
    ProviderSpec {
        name: "anthropic",
        api_key_env: "ANTHROPIC_API_KEY",
        default_base_url: "https://api.anthropic.com/v1",
        api: ApiStyle::Messages,
    },
    ProviderSpec {
        name: "xai",
        api_key_env: "XAI_API_KEY",
        default_base_url: "https://api.x.ai/v1",
        api: ApiStyle::ChatCompletions,
    },
    ProviderSpec {
        name: "gemini",
        api_key_env: "GOOGLE_API_KEY",
        default_base_url: "https://generativelanguage.googleapis.com/v1beta/openai",
        api: ApiStyle::ChatCompletions,
    },
    ProviderSpec {
        name: "openrouter",
        api_key_env: "OPENROUTER_API_KEY",
        default_base_url: "https://openrouter.ai/api/v1",
        api: ApiStyle::ChatCompletions,
    },
    ProviderSpec {
        name: "cerebras",
        api_key_env: "CEREBRAS_API_KEY",
        default_base_url: "https://api.cerebras.ai/v1",
        api: ApiStyle::ChatCompletions,
    },
];

/// Case-insensitive provider lookup
pub fn lookup(provider: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(provider.trim()))
}

/// Default API key variable for `provider`, falling back to [`GENERIC_API_KEY_ENV`]
pub fn default_api_key_env(provider: &str) -> &'static str {
    lookup(provider)
        .map(|p| p.api_key_env)
        .unwrap_or(GENERIC_API_KEY_ENV)
}

pub fn supported_names() -> String {
    PROVIDERS
        .iter()
        .map(|p| p.name)
        .collect::<Vec<_>>()
        .join(", ")
}
