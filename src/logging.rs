use tracing_subscriber::EnvFilter;

/// Initialize tracing based on CLI verbosity level.
///
/// Mapping:
/// - 0 (none) -> warn
/// - 1 (-v)   -> info
/// - 2 (-vv)  -> debug
/// - 3+ (-vvv)-> trace
///
/// `RUST_LOG` env var overrides the CLI flag if set. Output goes to stderr so
/// the summary on stdout stays clean.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn default_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    format!("timeslice={level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_verbosity_to_level() {
        assert_eq!(default_filter(0), "timeslice=warn");
        assert_eq!(default_filter(1), "timeslice=info");
        assert_eq!(default_filter(2), "timeslice=debug");
        assert_eq!(default_filter(7), "timeslice=trace");
    }
}
