use clap::ValueEnum;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Human,
    /// JSON on stdout
    Json,
}
