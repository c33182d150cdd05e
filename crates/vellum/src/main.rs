//! Vellum CLI binary.
//!
//! This binary provides command-line access to Vellum's ingestion pipeline:
//! - Normalize and attach external media links
//! - Validate and upload local files
//! - Inspect configuration and manage the stored session

use clap::Parser;
use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, check_files, handle_session_command, link_url, normalize_url, show_config,
        upload_files,
    };

    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    if cli.trace {
        vellum::init_telemetry()?;
    } else {
        vellum::init_logging(cli.verbose)?;
    }

    let config = match &cli.config {
        Some(path) => vellum::VellumConfig::from_file(path)?,
        None => vellum::VellumConfig::load()?,
    };

    // Execute the requested command
    let success = match cli.command {
        Commands::Normalize { url } => normalize_url(&url)?,
        Commands::Check { files } => check_files(&config, &files).await?,
        Commands::Upload { files, multiple } => upload_files(&config, files, multiple).await?,
        Commands::Link { url } => link_url(&config, &url)?,
        Commands::Config => show_config(&config)?,
        Commands::Session(session_cmd) => handle_session_command(&config, session_cmd).await?,
    };

    if cli.trace {
        vellum::shutdown_telemetry();
    }

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
