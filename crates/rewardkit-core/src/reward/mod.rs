//! Composite reward aggregation
//!
//! Scores a candidate response against a reference by summing six independent
//! heuristic rules (correctness, engagement, explanation, creativity, clarity
//! and an appropriateness penalty), then clamping to [`REWARD_MIN`, `REWARD_MAX`].
//!
//! Every rule degrades to a numeric fallback, so aggregation never fails.

mod components;
pub mod extra;
mod transition;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use components::{
    appropriateness_penalty, clarity, correctness, creativity, engagement, explanation,
};
pub use extra::ExtraInfo;
pub use transition::{compute_discounted_reward, compute_transition_reward, DEFAULT_DISCOUNT};

/// Lower bound of any aggregated reward
pub const REWARD_MIN: f64 = -20.0;
/// Upper bound of any aggregated reward
pub const REWARD_MAX: f64 = 50.0;

/// Input triple for the aggregator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardRequest {
    pub solution_str: String,
    pub ground_truth: String,
    #[serde(default)]
    pub extra_info: Option<Map<String, Value>>,
}

/// One named sub-reward
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub name: &'static str,
    pub value: f64,
}

/// All sub-rewards of one evaluation along with the raw and clamped totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardBreakdown {
    pub components: Vec<ScoreComponent>,
    pub raw_total: f64,
    pub total: f64,
}

pub fn clamp_reward(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(REWARD_MIN, REWARD_MAX)
}

impl RewardRequest {
    pub fn breakdown(&self) -> RewardBreakdown {
        composite_breakdown(
            &self.solution_str,
            &self.ground_truth,
            self.extra_info.as_ref(),
        )
    }
}

/// Compute every sub-reward and the clamped total.
pub fn composite_breakdown(
    solution_str: &str,
    ground_truth: &str,
    extra_info: Option<&Map<String, Value>>,
) -> RewardBreakdown {
    let extra = ExtraInfo::new(extra_info);

    let components = vec![
        ScoreComponent {
            name: "correctness",
            value: correctness(solution_str, ground_truth, &extra),
        },
        ScoreComponent {
            name: "engagement",
            value: engagement(solution_str, ground_truth, &extra),
        },
        ScoreComponent {
            name: "explanation",
            value: explanation(solution_str, &extra),
        },
        ScoreComponent {
            name: "creativity",
            value: creativity(solution_str, ground_truth),
        },
        ScoreComponent {
            name: "clarity",
            value: clarity(solution_str, &extra),
        },
        ScoreComponent {
            name: "appropriateness",
            value: appropriateness_penalty(solution_str, &extra),
        },
    ];

    let raw_total: f64 = components.iter().map(|c| c.value).sum();
    let total = clamp_reward(raw_total);

    tracing::trace!(raw_total, total, "composite_reward");

    RewardBreakdown {
        components,
        raw_total,
        total,
    }
}

/// Score `solution_str` against `ground_truth`; always within [-20.0, 50.0].
pub fn composite_reward(
    solution_str: &str,
    ground_truth: &str,
    extra_info: Option<&Map<String, Value>>,
) -> f64 {
    composite_breakdown(solution_str, ground_truth, extra_info).total
}

#[cfg(test)]
mod tests;
