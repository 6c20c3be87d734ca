//! Diagnostics for driftset.
//!
//! Everything is reported through `tracing` and written to stderr, keeping
//! stdout for the shell and command output. `RUST_LOG` overrides the
//! `-q`/`-v` flags when set.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much driftset reports about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only (`-q`).
    Quiet,
    /// Database opens and upgrades.
    #[default]
    Normal,
    /// Every store write and screen transition (`-v`).
    Verbose,
    /// Per-field numeric coercions as well (`-vv`).
    Trace,
}

impl Verbosity {
    /// Pick a verbosity from the command-line flags. `quiet` wins over any
    /// number of `-v`.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// The most detailed level shown.
    #[must_use]
    pub fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Filter used when `RUST_LOG` is unset. Only driftset's own events
    /// pass; dependencies stay silent.
    #[must_use]
    pub fn filter(self) -> EnvFilter {
        EnvFilter::new(format!("driftset={}", self.level()))
    }
}

/// Install the stderr subscriber. Later calls keep the first subscriber.
///
/// # Examples
///
/// ```no_run
/// use driftset::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(false, 1));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| verbosity.filter());

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
    fn test_from_flags() {
        assert_eq!(Verbosity::from_flags(false, 0), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(false, 1), Verbosity::Verbose);
        assert_eq!(Verbosity::from_flags(false, 2), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(false, 9), Verbosity::Trace);
        assert_eq!(Verbosity::from_flags(true, 2), Verbosity::Quiet);
    }

    #[test]
    fn test_coercions_only_at_trace() {
        assert!(Verbosity::Trace.level() >= Level::TRACE);
        assert!(Verbosity::Verbose.level() < Level::TRACE);
        assert_eq!(Verbosity::Quiet.level(), Level::ERROR);
    }

    #[test]
    fn test_filter_scopes_to_driftset() {
        assert_eq!(Verbosity::Normal.filter().to_string(), "driftset=info");
        assert_eq!(Verbosity::Verbose.filter().to_string(), "driftset=debug");
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(Verbosity::Quiet);
        init_logging(Verbosity::Trace);
    }
}
