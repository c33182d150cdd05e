//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Vellum - validate, upload, and link media as canonical URL references
#[derive(Parser, Debug)]
#[command(name = "vellum")]
#[command(about = "Validate, upload, and link media as canonical URL references", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Export spans to stdout through OpenTelemetry
    #[arg(long, global = true)]
    pub trace: bool,

    /// Configuration file to use instead of the layered defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the embeddable form of a URL
    Normalize {
        /// URL to normalize
        url: String,
    },

    /// Validate files against the accept policy without sending them
    Check {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Validate and upload files
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Upload every file even if the widget is configured for a single file
        #[arg(long)]
        multiple: bool,
    },

    /// Attach an external media link
    Link {
        /// URL to attach
        url: String,
    },

    /// Print the effective configuration as TOML
    Config,

    /// Manage the stored session used for authenticated uploads
    #[command(subcommand)]
    Session(SessionCommands),
}

/// Session management subcommands
#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// Store a bearer token
    SetToken {
        /// Token to attach to uploads
        token: String,
    },

    /// Remove the stored session
    Clear,

    /// Report whether a token is stored
    Status,
}
