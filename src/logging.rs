//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV_VAR: &str = "SMART_ORGANIZER_LOG";

/// Installs a stderr `tracing` subscriber.
///
/// The filter comes from `SMART_ORGANIZER_LOG`, then `RUST_LOG`, and otherwise
/// defaults to `warn` (or `debug` when `verbose` is set). Calling this more
/// than once is harmless.
pub fn init_logging(verbose: bool) {
    let filter = std::env::var(LOG_ENV_VAR)
        .or_else(|_| std::env::var("RUST_LOG"))
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "smart_organizer=debug"
    } else {
        "warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "warn");
        assert_eq!(default_directive(true), "smart_organizer=debug");
    }
}
