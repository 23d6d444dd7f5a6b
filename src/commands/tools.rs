//! `rewardkit tools` commands

use serde_json::{json, Value};

use rewardkit_core::error::{RewardError, Result};
use rewardkit_core::tools::{ToolRegistry, ToolSpec};

use crate::cli::{Cli, OutputFormat};

/// One-line signature, e.g. `paginate_results(items: array, page?: integer = 1)`
fn signature(spec: &ToolSpec) -> String {
    let params: Vec<String> = spec
        .params
        .iter()
        .map(|p| {
            let marker = if p.required { "" } else { "?" };
            match &p.default {
                Some(default) => format!("{}{}: {} = {}", p.name, marker, p.kind, default),
                None => format!("{}{}: {}", p.name, marker, p.kind),
            }
        })
        .collect();
    format!("{}({})", spec.name, params.join(", "))
}

pub fn list(cli: &Cli) -> Result<()> {
    let registry = ToolRegistry::builtin();

    match cli.format {
        OutputFormat::Json => {
            let specs: Vec<&ToolSpec> = registry.specs().collect();
            println!("{}", serde_json::to_string_pretty(&specs)?);
        }
        OutputFormat::Human => {
            for spec in registry.specs() {
                if cli.quiet {
                    println!("{}", spec.name);
                } else {
                    println!("{}\n    {}", signature(spec), spec.description);
                }
            }
        }
    }
    Ok(())
}

pub fn call(cli: &Cli, name: &str, raw_args: &str) -> Result<()> {
    let args: Value = serde_json::from_str(raw_args)
        .map_err(|e| RewardError::invalid_value("--args (expected a JSON object)", e))?;

    let registry = ToolRegistry::builtin();
    let result = registry.call(name, &args)?;

    match cli.format {
        OutputFormat::Json => {
            let output = json!({ "tool": name, "result": result });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => match &result {
            Value::String(text) => println!("{}", text),
            other => println!("{}", serde_json::to_string_pretty(other)?),
        },
    }
    Ok(())
}
