//! Diagnostic logging setup.
//!
//! Logs go to stderr so they never mix with JSON or CSV on stdout.
//! `RUST_LOG` takes precedence over the verbosity flags.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive implied by the command-line verbosity flags.
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "warn,netvis=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives() {
        assert_eq!(default_directive(false, false), "warn");
        assert_eq!(default_directive(true, false), "warn,netvis=debug");
        assert_eq!(default_directive(true, true), "error");
    }

    #[test]
    fn test_repeated_init_is_harmless() {
        init_logging(false, true);
        init_logging(true, false);
    }
}
