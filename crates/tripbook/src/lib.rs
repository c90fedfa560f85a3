//! The `tripbook` command-line front end.

pub mod cli;
pub mod logging;
pub mod render;

pub use cli::{run, Cli, Command};
