//! Reward functions exposed as tools

use serde_json::{json, Value};

use super::{ParamKind, ParamSpec, ToolArgs, ToolRegistry, ToolSpec};
use crate::error::{RewardError, Result};
use crate::reward::{
    composite_reward, compute_discounted_reward, compute_transition_reward, DEFAULT_DISCOUNT,
};

pub(super) fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolSpec {
            name: "composite_reward",
            description: "Keyword-heuristic reward for a solution, clamped to [-20, 50]",
            params: vec![
                ParamSpec::required("solution_str", ParamKind::String),
                ParamSpec::required("ground_truth", ParamKind::String),
                ParamSpec::optional("extra_info", ParamKind::Object, None),
            ],
        },
        composite,
    );
    registry.register(
        ToolSpec {
            name: "compute_transition_reward",
            description: "Reward for one state/action/next_state transition",
            params: vec![
                ParamSpec::required("state", ParamKind::Object),
                ParamSpec::required("action", ParamKind::Object),
                ParamSpec::required("next_state", ParamKind::Object),
                ParamSpec::optional("metadata", ParamKind::Object, None),
            ],
        },
        transition,
    );
    registry.register(
        ToolSpec {
            name: "compute_discounted_reward",
            description: "Discounted sum of a reward sequence",
            params: vec![
                ParamSpec::required("rewards", ParamKind::Array),
                ParamSpec::optional(
                    "discount_factor",
                    ParamKind::Number,
                    Some(json!(DEFAULT_DISCOUNT)),
                ),
            ],
        },
        discounted,
    );
}

fn composite(args: &ToolArgs) -> Result<Value> {
    let extra = args.get("extra_info").and_then(Value::as_object);
    Ok(json!(composite_reward(
        args.string("solution_str")?,
        args.string("ground_truth")?,
        extra,
    )))
}

fn transition(args: &ToolArgs) -> Result<Value> {
    Ok(json!(compute_transition_reward(
        args.require("state")?,
        args.require("action")?,
        args.require("next_state")?,
        args.get("metadata"),
    )))
}

fn discounted(args: &ToolArgs) -> Result<Value> {
    let rewards = args.numbers("rewards")?;
    let gamma = args.number("discount_factor")?;
    if !(0.0..=1.0).contains(&gamma) {
        return Err(RewardError::invalid_value(
            "discount_factor",
            format!("{gamma} (must be within 0..=1)"),
        ));
    }
    Ok(json!(compute_discounted_reward(&rewards, gamma)))
}
