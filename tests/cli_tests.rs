//! Integration tests for the rewardkit CLI
//!
//! These tests run the rewardkit binary and check output lines and exit codes.

use std::path::Path;

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use serde_json::json;
use tempfile::{tempdir, TempDir};
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

/// Get a Command for rewardkit with scorer-related environment cleared
fn rewardkit() -> Command {
    let mut cmd = cargo_bin_cmd!("rewardkit");
    for var in [
        "OPENAI_API_KEY",
        "ANTHROPIC_API_KEY",
        "REWARDKIT_OPENAI_BASE_URL",
        "REWARDKIT_LOG",
        "REWARDKIT_LOG_LEVEL",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

const CONFIG: &str = r#"
support:
  rubric: "Reward answers that resolve the customer's issue."
  score_min: 0.0
  score_max: 1.0
  model_info:
    provider: openai
    model: gpt-5-mini
"#;

const DATA: &str = r#"{"rubric_id": "support", "conversation_id": "1", "solution_str": "Please wait."}
{"rubric_id": "support", "conversation_id": "2", "solution_str": "Your refund was issued today."}
"#;

fn fixture() -> TempDir {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("rubrics.yaml"), CONFIG).unwrap();
    std::fs::write(dir.path().join("data.jsonl"), DATA).unwrap();
    dir
}

fn rubric_args<'a>(dir: &'a Path, extra: &[&'a str]) -> Vec<String> {
    let mut args = vec![
        "rubric".to_string(),
        "--config".to_string(),
        dir.join("rubrics.yaml").display().to_string(),
        "--data".to_string(),
        dir.join("data.jsonl").display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    args
}

// ============================================================================
// Help and usage
// ============================================================================

#[test]
fn test_help_flag() {
    rewardkit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: rewardkit"))
        .stdout(predicate::str::contains("rubric"))
        .stdout(predicate::str::contains("reward"))
        .stdout(predicate::str::contains("tools"));
}

#[test]
fn test_version_flag() {
    rewardkit()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rewardkit"));
}

#[test]
fn test_missing_subcommand_exit_code_2() {
    rewardkit().assert().code(2);
}

#[test]
fn test_missing_argument_json_envelope() {
    rewardkit()
        .args(["--format", "json", "reward"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"type\":\"usage_error\""));
}

// ============================================================================
// reward
// ============================================================================

#[test]
fn test_reward_empty_solution() {
    rewardkit()
        .args(["reward", "--solution", "", "--ground-truth", "anything"])
        .assert()
        .success()
        .stdout("-1\n");
}

#[test]
fn test_reward_json_and_breakdown() {
    rewardkit()
        .args(["--format", "json", "reward", "--solution", "", "--ground-truth", "x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reward\": -1.0"));

    rewardkit()
        .args([
            "reward",
            "--solution",
            "Paris is the capital of France.",
            "--ground-truth",
            "Paris",
            "--breakdown",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("correctness: "))
        .stdout(predicate::str::contains("appropriateness: "))
        .stdout(predicate::str::contains("total: "));
}

#[test]
fn test_reward_rejects_bad_extra_info() {
    rewardkit()
        .args(["reward", "--solution", "a", "--extra-info", "[1, 2]"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error: invalid --extra-info"));
}

// ============================================================================
// tools
// ============================================================================

#[test]
fn test_tools_list() {
    rewardkit()
        .args(["tools", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("multiply(first_val: number, second_val: number)"))
        .stdout(predicate::str::contains("paginate_results"));
}

#[test]
fn test_tools_call() {
    rewardkit()
        .args(["tools", "call", "multiply", "--args", r#"{"first_val": 2, "second_val": 3}"#])
        .assert()
        .success()
        .stdout("6.0\n");

    rewardkit()
        .args(["--format", "json", "tools", "call", "return_true"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"result\": true"));
}

#[test]
fn test_tools_call_errors() {
    rewardkit()
        .args(["tools", "call", "nope"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("tool not found: nope"));

    rewardkit()
        .args(["tools", "call", "multiply", "--args", r#"{"first_val": 2}"#])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("second_val"));
}

// ============================================================================
// rubric
// ============================================================================

#[test]
fn test_rubric_missing_config_file() {
    let dir = tempdir().unwrap();
    rewardkit()
        .args(rubric_args(dir.path(), &[]))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: failed to read rubric config"));
}

#[test]
fn test_rubric_unknown_rubric_id() {
    let dir = fixture();
    rewardkit()
        .args(rubric_args(dir.path(), &["--rubric", "tone"]))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("rubric not found: tone"));
}

#[test]
fn test_rubric_unknown_conversation() {
    let dir = fixture();
    rewardkit()
        .args(rubric_args(dir.path(), &["--conversation", "9"]))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("conversation not found"));
}

#[test]
fn test_rubric_missing_credential() {
    let dir = fixture();
    rewardkit()
        .args(rubric_args(dir.path(), &[]))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("OPENAI_API_KEY"));

    let mut args = vec!["--format".to_string(), "json".to_string()];
    args.extend(rubric_args(dir.path(), &[]));
    rewardkit()
        .args(args)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("\"type\":\"missing_credential\""))
        .stderr(predicate::str::contains("\"env_var\":\"OPENAI_API_KEY\""));
}

#[test]
fn test_rubric_flat_config_file() {
    let dir = fixture();
    let flat = dir.path().join("reward_rubric_config.yaml");
    std::fs::write(
        &flat,
        "rubric: \"Reward resolved issues.\"\ndefault_model_info:\n  provider: openai\n  model: gpt-5-mini\n",
    )
    .unwrap();

    let data = dir.path().join("data.jsonl");
    let args = [
        "rubric",
        "--config",
        flat.to_str().unwrap(),
        "--data",
        data.to_str().unwrap(),
    ];

    // file stem as rubric id: the fixture records belong to "support"
    rewardkit()
        .args(args)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("reward_rubric_config"));

    rewardkit()
        .args(args)
        .args(["--rubric", "support"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rubric_scores_against_mock_provider() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/chat/completions"))
        .and(matchers::header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "{\"score\": 0.85, \"explanation\": \"Refund confirmed.\"}"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = fixture();
    let args = rubric_args(dir.path(), &["--conversation", "2"]);
    let base_url = server.uri();

    let output = tokio::task::spawn_blocking(move || {
        rewardkit()
            .env("OPENAI_API_KEY", "sk-test")
            .env("REWARDKIT_OPENAI_BASE_URL", base_url)
            .args(args)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        "openai gpt-5-mini score: 0.85 (range 0.0-1.0)\n\
         openai gpt-5-mini explanation: Refund confirmed.\n"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rubric_clamps_score_without_details() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "{\"score\": 7}"}}]
        })))
        .mount(&server)
        .await;

    let dir = fixture();
    let mut args = vec!["--format".to_string(), "json".to_string()];
    args.extend(rubric_args(dir.path(), &["--no-details"]));
    let base_url = server.uri();

    let output = tokio::task::spawn_blocking(move || {
        rewardkit()
            .env("OPENAI_API_KEY", "sk-test")
            .env("REWARDKIT_OPENAI_BASE_URL", base_url)
            .args(args)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["score"], 1.0);
    assert_eq!(result["conversation_id"], "1");
    assert!(result.get("explanation").is_none());
}
