//! Tests for the scorer module.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

use super::prompt::{build_request_body, build_user_prompt, DEFAULT_MAX_TOKENS, DEFAULT_SYSTEM_PROMPT};
use super::provider::{self, ApiStyle};
use super::response::{parse_judgement, reply_text, status_error};
use super::{HostedScorer, RubricScorer, ScorerError};
use crate::error::RewardError;
use crate::rubric::{ChatMessage, ModelSettings, RequestContext};

fn context(provider: &str, api_key: Option<&str>, base_url: Option<String>) -> RequestContext {
    RequestContext {
        rubric_id: "support".to_string(),
        rubric_text: "Reward answers that resolve the issue.".to_string(),
        score_min: 0.0,
        score_max: 1.0,
        model: ModelSettings {
            provider: provider.to_string(),
            model: "test-model".to_string(),
            api_key: api_key.map(str::to_string),
            api_key_env: provider::default_api_key_env(provider).to_string(),
            base_url,
            options: BTreeMap::new(),
        },
        solution_str: "Your refund has been issued.".to_string(),
        ground_truth: Some("Refund issued".to_string()),
        system_prompt: None,
        metadata: None,
        conversation_id: Some("c-1".to_string()),
        original_input: Some("Where is my refund?".to_string()),
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: "Where is my refund?".to_string(),
        }],
        capture_details: true,
    }
}

#[test]
fn test_provider_table() {
    assert_eq!(provider::default_api_key_env("openai"), "OPENAI_API_KEY");
    assert_eq!(provider::default_api_key_env("Anthropic"), "ANTHROPIC_API_KEY");
    assert_eq!(provider::default_api_key_env("xai"), "XAI_API_KEY");
    assert_eq!(provider::default_api_key_env("my-proxy"), "OPENAI_API_KEY");
    assert_eq!(provider::lookup("anthropic").map(|p| p.api), Some(ApiStyle::Messages));
}

#[test]
fn test_build_user_prompt_sections() {
    let ctx = context("openai", Some("sk"), None);
    let prompt = build_user_prompt(&ctx);

    assert!(prompt.contains("Reward answers that resolve the issue."));
    assert!(prompt.contains("Your refund has been issued."));
    assert!(prompt.contains("# Ground Truth\nRefund issued"));
    assert!(prompt.contains("# Original Input\nWhere is my refund?"));
    assert!(prompt.contains("user: Where is my refund?"));
    assert!(prompt.contains("between 0 and 1"));
    assert!(!prompt.contains("# Metadata"));
}

#[test]
fn test_request_body_shapes() {
    let mut ctx = context("anthropic", Some("sk"), None);
    let body = build_request_body(&ctx, ApiStyle::Messages);
    assert_eq!(body["system"], DEFAULT_SYSTEM_PROMPT);
    assert_eq!(body["max_tokens"], DEFAULT_MAX_TOKENS);
    assert_eq!(body["messages"][0]["role"], "user");

    ctx.model.options.insert("temperature".to_string(), json!(0.2));
    ctx.system_prompt = Some("Be strict.".to_string());
    let body = build_request_body(&ctx, ApiStyle::ChatCompletions);
    assert_eq!(body["model"], "test-model");
    assert_eq!(body["messages"][0]["content"], "Be strict.");
    assert_eq!(body["response_format"]["type"], "json_object");
    assert_eq!(body["temperature"], 0.2);
    assert!(body.get("max_tokens").is_none());
}

#[test]
fn test_parse_judgement_variants() {
    let detailed = parse_judgement(r#"{"score": 0.75, "explanation": "solid"}"#, true).unwrap();
    assert_eq!(detailed["score"], 0.75);
    assert_eq!(detailed["explanation"], "solid");

    let fenced = "```json\n{\"score\": \"0.5\"}\n```";
    assert_eq!(parse_judgement(fenced, false).unwrap(), json!(0.5));
    assert_eq!(parse_judgement(fenced, true).unwrap()["explanation"], "");

    let err = parse_judgement(r#"{"explanation": "no score"}"#, true).unwrap_err();
    assert!(matches!(err, ScorerError::Request { .. }));
    assert!(parse_judgement("not json at all", false).is_err());
}

#[test]
fn test_status_error_mapping() {
    assert!(matches!(
        status_error(404, r#"{"error": {"message": "no such model"}}"#),
        ScorerError::ModelNotFound { detail } if detail == "no such model"
    ));
    assert!(matches!(
        status_error(400, r#"{"error": {"code": "model_not_found", "message": "gone"}}"#),
        ScorerError::ModelNotFound { .. }
    ));
    match status_error(500, "upstream exploded") {
        ScorerError::Request { detail } => assert_eq!(detail, "HTTP 500: upstream exploded"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_reply_text_by_style() {
    let chat = json!({"choices": [{"message": {"content": "{\"score\": 1}"}}]});
    assert_eq!(
        reply_text(ApiStyle::ChatCompletions, &chat).as_deref(),
        Some("{\"score\": 1}")
    );

    let messages = json!({"content": [{"type": "thinking"}, {"type": "text", "text": "{}"}]});
    assert_eq!(reply_text(ApiStyle::Messages, &messages).as_deref(), Some("{}"));
    assert_eq!(reply_text(ApiStyle::Messages, &json!({})), None);
}

#[test]
fn test_missing_api_key_names_env_var() {
    let ctx = context("xai", None, None);
    let err = HostedScorer::default().evaluate(&ctx).unwrap_err();
    assert!(matches!(
        &err,
        ScorerError::MissingApiKey { env_var, .. } if env_var == "XAI_API_KEY"
    ));

    let converted = RewardError::from(err);
    assert!(converted.to_string().contains("XAI_API_KEY"));
}

#[test]
fn test_unknown_provider_requires_base_url() {
    let ctx = context("my-proxy", Some("sk"), None);
    let err = HostedScorer::default().evaluate(&ctx).unwrap_err();
    assert!(matches!(err, ScorerError::UnsupportedProvider { .. }));
}

async fn evaluate_blocking(ctx: RequestContext) -> Result<Value, ScorerError> {
    tokio::task::spawn_blocking(move || HostedScorer::default().evaluate(&ctx))
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_hosted_scorer_chat_completions() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/v1/chat/completions"))
        .and(matchers::header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "{\"score\": 0.8, \"explanation\": \"resolved\"}"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context("openai", Some("sk-test"), Some(format!("{}/v1/", server.uri())));
    let result = evaluate_blocking(ctx).await.unwrap();

    assert_eq!(result["score"], 0.8);
    assert_eq!(result["explanation"], "resolved");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_hosted_scorer_anthropic_bare_score() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/messages"))
        .and(matchers::header("x-api-key", "sk-ant"))
        .and(matchers::header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "{\"score\": 0.4}"}]
        })))
        .mount(&server)
        .await;

    let mut ctx = context("anthropic", Some("sk-ant"), Some(server.uri()));
    ctx.capture_details = false;
    let result = evaluate_blocking(ctx).await.unwrap();

    assert_eq!(result, json!(0.4));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_hosted_scorer_model_not_found() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"error": {"message": "model test-model does not exist"}})),
        )
        .mount(&server)
        .await;

    let ctx = context("openai", Some("sk-test"), Some(server.uri()));
    let err = evaluate_blocking(ctx).await.unwrap_err();

    assert!(matches!(
        err,
        ScorerError::ModelNotFound { detail } if detail.contains("does not exist")
    ));
}
