//! Command dispatch logic for rewardkit

use std::time::Instant;

use crate::cli::{Cli, Commands, ToolCommands};
use crate::commands;
use rewardkit_core::error::Result;
use rewardkit_core::trace_time;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let result = match &cli.command {
        Commands::Rubric {
            config,
            data,
            rubric,
            conversation,
            no_details,
        } => commands::rubric::execute(
            cli,
            config,
            data,
            rubric.as_deref(),
            conversation.as_deref(),
            !*no_details,
        ),

        Commands::Reward {
            solution,
            ground_truth,
            extra_info,
            breakdown,
        } => commands::reward::execute(
            cli,
            solution,
            ground_truth,
            extra_info.as_deref(),
            *breakdown,
        ),

        Commands::Tools { command } => match command {
            ToolCommands::List => commands::tools::list(cli),
            ToolCommands::Call { name, args } => commands::tools::call(cli, name, args),
        },
    };

    trace_time!(start, "command_total");
    result
}
