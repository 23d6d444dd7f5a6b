use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Helper macro for logging elapsed time at trace level.
///
/// Usage:
/// ```rust,ignore
/// let start = Instant::now();
/// // ... some work ...
/// trace_time!(start, "operation_name");
/// // Or with additional fields:
/// trace_time!(start, "operation_name", rubric_id = id);
/// ```
#[macro_export]
macro_rules! trace_time {
    ($start:expr, $name:expr) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $name);
    };
    ($start:expr, $name:expr $(, $field:ident = $value:expr)*) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $($field = $value),*, $name);
    };
}

/// Build the filter directive for the given CLI flags.
///
/// A bare level (`debug`) is scoped to the rewardkit targets; a full directive
/// (`rewardkit_core=trace,ureq=debug`) is used verbatim.
pub fn filter_directive(verbose: bool, log_level: Option<&str>) -> String {
    match (verbose, log_level) {
        (_, Some(level)) if level.contains('=') => level.to_string(),
        (_, Some(level)) => format!("rewardkit={level},rewardkit_core={level}"),
        (true, None) => "rewardkit=debug,rewardkit_core=debug".to_string(),
        (false, None) => "rewardkit=warn,rewardkit_core=warn".to_string(),
    }
}

/// Initialize structured logging based on CLI arguments
pub fn init_tracing(
    verbose: bool,
    log_level: Option<&str>,
    log_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let directive = filter_directive(verbose, log_level);

    // Support REWARDKIT_LOG environment variable override
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env("REWARDKIT_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(directive));

    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false)
                    .with_span_events(
                        tracing_subscriber::fmt::format::FmtSpan::NEW
                            | tracing_subscriber::fmt::format::FmtSpan::CLOSE,
                    ),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::filter_directive;

    #[test]
    fn test_filter_directive_defaults() {
        assert_eq!(
            filter_directive(false, None),
            "rewardkit=warn,rewardkit_core=warn"
        );
        assert_eq!(
            filter_directive(true, None),
            "rewardkit=debug,rewardkit_core=debug"
        );
    }

    #[test]
    fn test_filter_directive_explicit_level_wins() {
        assert_eq!(
            filter_directive(true, Some("trace")),
            "rewardkit=trace,rewardkit_core=trace"
        );
        assert_eq!(filter_directive(false, Some("ureq=debug")), "ureq=debug");
    }
}
