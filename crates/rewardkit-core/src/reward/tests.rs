use super::*;
use serde_json::json;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn extra(value: serde_json::Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_empty_solution_gets_only_flat_penalty() {
    assert_eq!(composite_reward("", "anything", None), -1.0);

    let flags = extra(json!({"inappropriate": true, "off_topic": true, "clarity_score": 0}));
    assert_eq!(composite_reward("", "anything", Some(&flags)), -1.0);
}

#[test]
fn test_exact_match_earns_full_correctness() {
    let breakdown = composite_breakdown("exact match", "exact match", None);
    assert_eq!(breakdown.components[0].name, "correctness");
    assert_eq!(breakdown.components[0].value, 5.0);

    let extra = ExtraInfo::default();
    assert_eq!(correctness("  Exact MATCH ", "exact match", &extra), 5.0);
}

#[test]
fn test_correctness_partial_credit() {
    let extra = ExtraInfo::default();
    assert_eq!(correctness("partial", "this is a partial answer", &extra), 2.5);
    assert_eq!(correctness("this is a partial answer", "partial", &extra), 2.5);
}

#[test]
fn test_empty_ground_truth_earns_no_containment_credit() {
    let none = ExtraInfo::default();
    assert_eq!(correctness("answer", "", &none), 0.0);
    assert_eq!(correctness("answer", "   ", &none), 0.0);

    let map = extra(json!({"key_concepts": ["answer"]}));
    assert_eq!(correctness("answer", "", &ExtraInfo::new(Some(&map))), 1.0);
}

#[test]
fn test_correctness_counts_key_concepts() {
    let map = extra(json!({"key_concepts": ["ownership", "Borrowing", "lifetimes"]}));
    let info = ExtraInfo::new(Some(&map));
    let score = correctness(
        "Ownership and borrowing rule Rust",
        "completely different",
        &info,
    );
    assert_eq!(score, 2.0);
    assert_eq!(
        correctness("unrelated", "completely different", &ExtraInfo::default()),
        0.0
    );
}

#[test]
fn test_engagement_ratio_and_bonus() {
    let map = extra(json!({"engagement_score": 10}));
    let info = ExtraInfo::new(Some(&map));
    assert_close(engagement("abcd", "ab", &info), 1.7);
    assert_close(engagement("hello", "", &ExtraInfo::default()), 0.1);
    assert_eq!(engagement("", "ab", &info), 0.0);
}

#[test]
fn test_explanation_keywords_structure_and_objectives() {
    let map = extra(json!({"learning_objectives": ["ownership", "lifetimes"]}));
    let info = ExtraInfo::new(Some(&map));
    let solution = "This works because of ownership, therefore it is safe. For example, 1. borrow";
    assert_close(explanation(solution, &info), 3.3);

    let capped = "because therefore since due to as a result";
    assert_close(explanation(capped, &ExtraInfo::default()), 2.0);
}

#[test]
fn test_creativity_rules() {
    assert_close(
        creativity("An innovative alternative: imagine another way", "short"),
        3.5,
    );
    assert_eq!(creativity("Answer", "answer"), 0.0);
    assert_close(creativity("another option", "a much longer reference"), 1.0);
}

#[test]
fn test_clarity_rules() {
    let map = extra(json!({"clarity_score": 0.4}));
    let info = ExtraInfo::new(Some(&map));
    let solution = "First we parse the input. Then we validate every field carefully.";
    assert_close(clarity(solution, &info), 2.9);

    assert_eq!(clarity("just three words", &ExtraInfo::default()), 0.0);
}

#[test]
fn test_penalties_are_additive() {
    let none = ExtraInfo::default();
    assert_eq!(appropriateness_penalty("ok", &none), -2.0);
    assert_eq!(appropriateness_penalty("Click here to buy now", &none), -5.0);

    let map = extra(json!({"inappropriate": true, "off_topic": "yes"}));
    let flagged = ExtraInfo::new(Some(&map));
    assert_eq!(
        appropriateness_penalty("Click here to buy now", &flagged),
        -18.0
    );
    assert_eq!(appropriateness_penalty("", &flagged), -1.0);
}

#[test]
fn test_total_is_clamped() {
    let high = extra(json!({"clarity_score": 100}));
    assert_eq!(composite_reward("some answer", "ref", Some(&high)), REWARD_MAX);

    let low = extra(json!({"clarity_score": -100}));
    let breakdown = composite_breakdown("some answer", "ref", Some(&low));
    assert!(breakdown.raw_total < REWARD_MIN);
    assert_eq!(breakdown.total, REWARD_MIN);
}

#[test]
fn test_reward_always_within_bounds() {
    let extras = [
        None,
        Some(extra(json!({"engagement_score": 1e9, "clarity_score": 1e9}))),
        Some(extra(json!({"clarity_score": -1e9, "inappropriate": 1}))),
        Some(extra(json!({"key_concepts": "not a list", "learning_objectives": 3}))),
    ];
    let texts = ["", "a", "spam", "exact", "First, because. Then finally.", "x y z."];

    for extra in &extras {
        for solution in texts {
            for truth in texts {
                let score = composite_reward(solution, truth, extra.as_ref());
                assert!((REWARD_MIN..=REWARD_MAX).contains(&score));
            }
        }
    }
}

#[test]
fn test_request_breakdown_matches_function() {
    let request = RewardRequest {
        solution_str: "exact match".to_string(),
        ground_truth: "exact match".to_string(),
        extra_info: None,
    };
    let breakdown = request.breakdown();
    assert_eq!(breakdown.components.len(), 6);
    assert_eq!(
        breakdown.total,
        composite_reward("exact match", "exact match", None)
    );
}

#[test]
fn test_transition_reward_combines_signals() {
    let state = json!({"task_status": "pending", "task_complexity": 2, "skill_level": 1});
    let action = json!({"type": "collaborate", "collaborators": 2});
    let next = json!({"task_status": "completed", "skill_level": 2, "user_satisfaction": 0.8});
    let meta = json!({"time_taken": 5, "expected_time": 10});

    assert_close(
        compute_transition_reward(&state, &action, &next, Some(&meta)),
        18.1,
    );
}

#[test]
fn test_transition_reward_penalizes_spam_and_clamps() {
    let empty = json!({});
    assert_close(
        compute_transition_reward(&empty, &json!({"type": "spam"}), &empty, None),
        -9.9,
    );

    let next = json!({"learning_outcomes": {"concepts_mastered": 100}});
    assert_eq!(
        compute_transition_reward(&empty, &empty, &next, None),
        REWARD_MAX
    );

    let zero_expected = json!({"time_taken": 0, "expected_time": 0});
    assert_close(
        compute_transition_reward(&empty, &empty, &empty, Some(&zero_expected)),
        0.1,
    );
}

#[test]
fn test_discounted_reward() {
    assert_close(compute_discounted_reward(&[1.0, 1.0, 1.0], 0.5), 1.75);
    assert_eq!(compute_discounted_reward(&[], DEFAULT_DISCOUNT), 0.0);
}
