//! CLI argument parsing for rewardkit
//!
//! Global flags: --format, --quiet, --verbose, --log-level, --log-json

pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

/// Rewardkit - reward heuristics, rubric scoring and evaluation tools
#[derive(Parser, Debug)]
#[command(name = "rewardkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level or filter directive (e.g. `debug`, `rewardkit_core=trace`)
    #[arg(long, global = true, env = "REWARDKIT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score a dataset record against a rubric with a hosted model
    Rubric {
        /// Rubric config document (YAML, JSON or TOML)
        #[arg(long, default_value = "reward_rubric_config.yaml")]
        config: PathBuf,

        /// Dataset of candidate responses (JSON, JSON array or JSON lines)
        #[arg(long, visible_alias = "messages", default_value = "reward_rubric_example.json")]
        data: PathBuf,

        /// Rubric id to score with (required when the config defines several)
        #[arg(long)]
        rubric: Option<String>,

        /// Conversation id of the record to score
        #[arg(long)]
        conversation: Option<String>,

        /// Ask only for a bare score, without an explanation
        #[arg(long, visible_alias = "no-capture-details")]
        no_details: bool,
    },

    /// Compute the composite keyword reward for a solution
    Reward {
        /// Candidate response text
        #[arg(long)]
        solution: String,

        /// Reference answer
        #[arg(long, default_value = "")]
        ground_truth: String,

        /// Extra scoring hints as a JSON object
        #[arg(long)]
        extra_info: Option<String>,

        /// Show each sub-reward
        #[arg(long)]
        breakdown: bool,
    },

    /// List or call built-in tools
    Tools {
        #[command(subcommand)]
        command: ToolCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ToolCommands {
    /// List available tools and their parameters
    List,

    /// Call a tool with JSON arguments
    Call {
        /// Tool name
        name: String,

        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
}
