//! Session management command handlers.

use vellum::{
    ConfigError, CredentialProvider, JsonFileStore, SessionCredentials, VellumConfig, VellumResult,
};

use super::commands::SessionCommands;
use super::output::print_json;

/// Handle session management commands.
pub async fn handle_session_command(
    config: &VellumConfig,
    cmd: SessionCommands,
) -> VellumResult<bool> {
    let path = config.credentials.resolved_store_path().ok_or_else(|| {
        ConfigError::new("No credential store path configured and no user data directory found")
    })?;
    let credentials = SessionCredentials::from_config(JsonFileStore::new(&path), &config.credentials);

    match cmd {
        SessionCommands::SetToken { token } => {
            credentials.save_token(&token).await?;
            eprintln!("Token stored in {}", path.display());
        }
        SessionCommands::Clear => {
            credentials.clear().await?;
            eprintln!("Session removed from {}", path.display());
        }
        SessionCommands::Status => {
            print_json(&serde_json::json!({
                "store": path.display().to_string(),
                "authenticated": credentials.bearer_token().await.is_some(),
            }))?;
        }
    }

    Ok(true)
}
