//! State-transition reward and discounted returns.

use serde_json::Value;

use super::clamp_reward;
use super::extra::{is_truthy, number_or_zero};

pub const DEFAULT_DISCOUNT: f64 = 0.9;

fn field<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.as_object().and_then(|m| m.get(key))
}

fn num(value: &Value, key: &str) -> f64 {
    field(value, key).map(number_or_zero).unwrap_or(0.0)
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    field(value, key).and_then(Value::as_str)
}

/// Reward for one `state --action--> next_state` transition.
///
/// Fields that are absent contribute nothing. The result is clamped to the
/// same [-20.0, 50.0] range as the composite reward.
pub fn compute_transition_reward(
    state: &Value,
    action: &Value,
    next_state: &Value,
    metadata: Option<&Value>,
) -> f64 {
    let mut reward = 0.1;

    if str_field(state, "task_status") == Some("pending")
        && str_field(next_state, "task_status") == Some("completed")
    {
        let complexity = field(state, "task_complexity")
            .map(number_or_zero)
            .unwrap_or(1.0);
        reward += 5.0 * complexity;
    }

    if field(state, "skill_level").is_some() && field(next_state, "skill_level").is_some() {
        reward += (num(next_state, "skill_level") - num(state, "skill_level")) * 2.0;
    }

    match str_field(action, "type") {
        Some("collaborate") => reward += num(action, "collaborators") * 1.5,
        Some("share_knowledge") => reward += num(action, "quality_score") * 3.0,
        _ => {}
    }

    if str_field(action, "type") == Some("spam")
        || field(action, "inappropriate").is_some_and(is_truthy)
    {
        reward -= 10.0;
    }

    if let Some(meta) = metadata {
        if let Some(taken) = field(meta, "time_taken").map(number_or_zero) {
            let expected = field(meta, "expected_time")
                .map(number_or_zero)
                .unwrap_or(taken);
            if taken <= expected && expected != 0.0 {
                reward += (expected - taken) / expected * 2.0;
            }
        }
    }

    if field(next_state, "output_quality").is_some() {
        reward += num(next_state, "output_quality");
    }

    if field(next_state, "user_satisfaction").is_some() {
        reward += num(next_state, "user_satisfaction") * 2.5;
    }

    if let Some(engagement) = field(next_state, "engagement_metrics") {
        reward += (num(engagement, "session_length") * 0.1).min(2.0);
        reward += (num(engagement, "interactions") * 0.2).min(3.0);
    }

    if let Some(outcomes) = field(next_state, "learning_outcomes") {
        reward += num(outcomes, "concepts_mastered");
        reward += num(outcomes, "retention_rate") * 5.0;
    }

    clamp_reward(reward)
}

/// Discounted cumulative reward `sum(r_i * gamma^i)`
pub fn compute_discounted_reward(rewards: &[f64], discount_factor: f64) -> f64 {
    rewards
        .iter()
        .zip(std::iter::successors(Some(1.0_f64), |w| {
            Some(w * discount_factor)
        }))
        .map(|(r, w)| r * w)
        .sum()
}
