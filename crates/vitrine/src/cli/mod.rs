//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the vitrine binary.

mod commands;
mod config;
mod upload;

pub use commands::{Cli, Commands};
pub use config::show_config;
pub use upload::run_upload;
