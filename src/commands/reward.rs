//! `rewardkit reward` command

use serde_json::{json, Map, Value};

use rewardkit_core::error::{RewardError, Result};
use rewardkit_core::reward::composite_breakdown;

use crate::cli::{Cli, OutputFormat};

fn parse_extra_info(raw: Option<&str>) -> Result<Option<Map<String, Value>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        Ok(Value::Null) => Ok(None),
        Ok(other) => Err(RewardError::invalid_value(
            "--extra-info",
            format!("expected a JSON object, got {}", other),
        )),
        Err(e) => Err(RewardError::invalid_value("--extra-info", e)),
    }
}

pub fn execute(
    cli: &Cli,
    solution: &str,
    ground_truth: &str,
    extra_info: Option<&str>,
    show_breakdown: bool,
) -> Result<()> {
    let extra = parse_extra_info(extra_info)?;
    let breakdown = composite_breakdown(solution, ground_truth, extra.as_ref());

    tracing::debug!(
        raw_total = breakdown.raw_total,
        total = breakdown.total,
        "computed composite reward"
    );

    match cli.format {
        OutputFormat::Json => {
            let output = if show_breakdown {
                serde_json::to_value(&breakdown)?
            } else {
                json!({ "reward": breakdown.total })
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if show_breakdown {
                for component in &breakdown.components {
                    println!("{}: {}", component.name, component.value);
                }
                if breakdown.raw_total != breakdown.total {
                    println!("raw_total: {}", breakdown.raw_total);
                }
                println!("total: {}", breakdown.total);
            } else {
                println!("{}", breakdown.total);
            }
        }
    }
    Ok(())
}
