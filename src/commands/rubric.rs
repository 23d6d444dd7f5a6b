//! `rewardkit rubric` command

use std::path::Path;

use rewardkit_core::error::Result;
use rewardkit_core::rubric::{run_rubric, RubricOutcome, RubricRun};
use rewardkit_core::scorer::HostedScorer;
use rewardkit_core::settings::ProcessEnv;

use crate::cli::{Cli, OutputFormat};

pub fn execute(
    cli: &Cli,
    config: &Path,
    data: &Path,
    rubric_id: Option<&str>,
    conversation_id: Option<&str>,
    capture_details: bool,
) -> Result<()> {
    let run = RubricRun {
        config_path: config,
        data_path: data,
        rubric_id,
        conversation_id,
        capture_details,
    };
    let outcome = run_rubric(&run, &ProcessEnv, &HostedScorer::from_env())?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
        OutputFormat::Human => {
            for line in human_lines(&outcome, cli.quiet) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Score bounds print with at least one decimal: `0.0`, `1.0`, `2.5`
fn format_bound(value: f64) -> String {
    format!("{:?}", value)
}

fn human_lines(outcome: &RubricOutcome, quiet: bool) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} score: {:.2} (range {}-{})",
        outcome.provider,
        outcome.model,
        outcome.score,
        format_bound(outcome.score_min),
        format_bound(outcome.score_max)
    )];
    if let Some(explanation) = outcome.explanation.as_deref().filter(|_| !quiet) {
        lines.push(format!(
            "{} {} explanation: {}",
            outcome.provider, outcome.model, explanation
        ));
    }
    lines
}
