//! Diagnostics setup
//!
//! Results go to stdout; everything tracing emits goes to stderr so output
//! stays pipeable.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Pick the default level from the CLI flags. `--quiet` wins over `--verbose`.
pub fn default_level(verbose: bool, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::ERROR
    } else if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the flags.
pub fn init(verbose: bool, quiet: bool, ansi: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose, quiet).into())
        .from_env_lossy();

    // A subscriber may already be set (e.g. by an embedding host)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(false, false), LevelFilter::WARN);
        assert_eq!(default_level(true, false), LevelFilter::DEBUG);
        assert_eq!(default_level(false, true), LevelFilter::ERROR);
        assert_eq!(default_level(true, true), LevelFilter::ERROR);
    }
}
