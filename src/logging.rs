//! Tracing subscriber setup for the `butler` binary.
//!
//! Logs go to standard error so standard output stays clean for tables and
//! JSON that users pipe into other commands. `RUST_LOG` overrides the default
//! filter.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for the logging system.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LogConfig {
    /// Enable debug output, including one line per HTTP request.
    pub verbose: bool,
}

impl LogConfig {
    /// Level applied to this crate when `RUST_LOG` is unset.
    #[must_use]
    pub const fn default_level(self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn default_directive(self) -> String {
        format!(
            "butler={}",
            self.default_level().as_str().to_ascii_lowercase()
        )
    }
}

/// Installs the global subscriber.
///
/// Calling this more than once leaves the first subscriber in place.
pub fn init(config: LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(false, "butler=info")]
    #[case(true, "butler=debug")]
    fn default_directive_follows_verbosity(#[case] verbose: bool, #[case] expected: &str) {
        assert_eq!(LogConfig { verbose }.default_directive(), expected);
    }
}
