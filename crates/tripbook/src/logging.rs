//! Log subscriber setup.
//!
//! The subscriber is installed before configuration is read, at a bootstrap
//! level, and switched to the configured level once the config is loaded.

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Level used while the config file is being located and read.
pub const BOOTSTRAP_LEVEL: &str = "info";

/// Filter directive: `RUST_LOG` when set, else debug for `-v`, else `level`.
pub fn level_filter(verbose: bool, level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { level })
    })
}

/// Handle to the installed subscriber's filter.
pub struct Logging {
    filter: reload::Handle<EnvFilter, Registry>,
}

impl Logging {
    /// Install the global stderr subscriber at the bootstrap level.
    pub fn init(verbose: bool) -> Self {
        let (filter, handle) = reload::Layer::new(level_filter(verbose, BOOTSTRAP_LEVEL));
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init();
        Self { filter: handle }
    }

    /// Switch to the level from `[logging].level`.
    pub fn apply_level(&self, verbose: bool, level: &str) -> Result<()> {
        self.filter
            .reload(level_filter(verbose, level))
            .context("Failed to apply log level")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tracing::Level;

    #[test]
    #[serial]
    fn verbose_wins_over_configured_level() {
        std::env::remove_var("RUST_LOG");
        assert_eq!(level_filter(true, "warn").to_string(), "debug");
        assert_eq!(level_filter(false, "warn").to_string(), "warn");
    }

    #[test]
    #[serial]
    fn events_before_and_after_config_use_their_own_level() {
        std::env::remove_var("RUST_LOG");
        let (filter, handle) = reload::Layer::new(level_filter(false, BOOTSTRAP_LEVEL));
        let _guard = tracing_subscriber::registry().with(filter).set_default();
        let logging = Logging { filter: handle };

        // Config loading logs at info; the bootstrap level lets it through.
        assert!(tracing::enabled!(Level::INFO));
        assert!(!tracing::enabled!(Level::DEBUG));

        logging.apply_level(false, "error").unwrap();
        assert!(!tracing::enabled!(Level::INFO));
    }
}
