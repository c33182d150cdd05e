//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the vellum binary.

mod commands;
mod ingest;
mod output;
mod session;

pub use commands::{Cli, Commands};
pub use ingest::{check_files, link_url, normalize_url, show_config, upload_files};
pub use session::handle_session_command;
