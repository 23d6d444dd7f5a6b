//! Prompt and request body construction

use serde_json::{json, Value};

use super::provider::ApiStyle;
use crate::rubric::RequestContext;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an impartial evaluator. Score the candidate \
response strictly according to the rubric and the allowed score range. Return your evaluation \
as JSON only.";

/// Default `max_tokens` for providers that require one
pub const DEFAULT_MAX_TOKENS: u64 = 1024;

pub fn system_prompt(context: &RequestContext) -> &str {
    context
        .system_prompt
        .as_deref()
        .unwrap_or(DEFAULT_SYSTEM_PROMPT)
}

pub fn build_user_prompt(context: &RequestContext) -> String {
    let mut sections = vec![
        "Evaluate the candidate response against the rubric.".to_string(),
        format!("# Rubric\n{}", context.rubric_text),
        format!(
            "# Score Range\nReturn a score between {} and {} (inclusive).",
            context.score_min, context.score_max
        ),
    ];

    if let Some(input) = &context.original_input {
        sections.push(format!("# Original Input\n{}", input));
    }

    if !context.messages.is_empty() {
        let transcript = context
            .messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n");
        sections.push(format!("# Conversation\n{}", transcript));
    }

    sections.push(format!("# Candidate Response\n{}", context.solution_str));

    if let Some(truth) = &context.ground_truth {
        sections.push(format!("# Ground Truth\n{}", truth));
    }

    if let Some(metadata) = &context.metadata {
        let rendered = serde_json::to_string_pretty(metadata).unwrap_or_default();
        sections.push(format!("# Metadata\n{}", rendered));
    }

    sections.push(format!(
        r#"# Required Response Format
Return JSON with this exact structure:
{{
  "score": <number between {} and {}>,
  "explanation": "<short justification>"
}}

Provide JSON only, no additional text."#,
        context.score_min, context.score_max
    ));

    sections.join("\n\n")
}

/// Provider request body for `context`
pub fn build_request_body(context: &RequestContext, api: ApiStyle) -> Value {
    let options = &context.model.options;
    let user_prompt = build_user_prompt(context);

    let mut body = match api {
        ApiStyle::ChatCompletions => json!({
            "model": context.model.model,
            "messages": [
                { "role": "system", "content": system_prompt(context) },
                { "role": "user", "content": user_prompt },
            ],
            "response_format": { "type": "json_object" },
        }),
        ApiStyle::Messages => json!({
            "model": context.model.model,
            "system": system_prompt(context),
            "messages": [
                { "role": "user", "content": user_prompt },
            ],
            "max_tokens": options
                .get("max_tokens")
                .and_then(Value::as_u64)
                .unwrap_or(DEFAULT_MAX_TOKENS),
        }),
    };

    for key in ["temperature", "max_tokens", "top_p"] {
        if let Some(value) = options.get(key) {
            body[key] = value.clone();
        }
    }

    body
}
