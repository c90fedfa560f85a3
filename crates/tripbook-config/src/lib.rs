//! Configuration for tripbook.
//!
//! - [`config`]: the `tripbook.toml` layers and environment overrides
//! - [`trip`]: baseline trip loading (`.json`, `.toml` or the bundled sample)
//! - [`access`]: the passcode gate and its remembered unlock state

pub mod access;
pub mod config;
pub mod error;
pub mod trip;

pub use access::PasscodeGate;
pub use config::{
    AccessConfig, AppConfig, LoggingConfig, SearchConfig, SyncConfig, TripConfig, CONFIG_ENV,
    CONFIG_FILE_NAME, FEED_ENV, PASSCODE_ENV,
};
pub use error::{AccessError, ConfigError, Result};
pub use trip::{bundled_trip, load_trip};
