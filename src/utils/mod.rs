//! Utilities: logging setup shared by both binaries.
//!
//! Key items:
//!   derive_level  (-v / -q -> level filter)
//!   init_logging  (tracing subscriber on stderr; `BUSYRS_LOG` overrides)
//!
//! Logs always go to stderr so stdout stays reserved for function results
//! and dumps.

/// Logging helpers.
pub mod logging {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::EnvFilter;

    /// Environment variable holding an `EnvFilter` directive.
    pub const LOG_ENV: &str = "BUSYRS_LOG";

    pub fn derive_level(verbose: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::ERROR;
        }
        match verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    /// Install the global subscriber. A second call is a no-op.
    pub fn init_logging(level: LevelFilter) {
        let filter = EnvFilter::builder()
            .with_default_directive(level.into())
            .with_env_var(LOG_ENV)
            .from_env_lossy();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn quiet_wins_over_verbose() {
            assert_eq!(derive_level(3, true), LevelFilter::ERROR);
        }

        #[test]
        fn verbosity_steps() {
            assert_eq!(derive_level(0, false), LevelFilter::WARN);
            assert_eq!(derive_level(1, false), LevelFilter::INFO);
            assert_eq!(derive_level(2, false), LevelFilter::DEBUG);
            assert_eq!(derive_level(9, false), LevelFilter::TRACE);
        }
    }
}

pub use logging::{derive_level, init_logging};
