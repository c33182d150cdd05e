//! Configuration structures for the ingestion widget.
//!
//! This module provides TOML-based configuration. The configuration system supports:
//! - Bundled defaults (include_str! from vellum.toml)
//! - User overrides (./vellum.toml or ~/.config/vellum/vellum.toml)
//! - `VELLUM__SECTION__KEY` environment variables, highest precedence

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, instrument};
use url::Url;
use vellum_core::{AcceptPolicy, DEFAULT_MAX_BYTES, join_origin};
use vellum_error::{ConfigError, VellumError, VellumResult};

fn default_api_origin() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

fn default_upload_path() -> String {
    "/upload".to_string()
}

fn default_field_name() -> String {
    "file".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_bytes() -> u64 {
    DEFAULT_MAX_BYTES
}

fn default_accept() -> String {
    "image/*,video/*,audio/*,application/pdf".to_string()
}

fn default_session_key() -> String {
    "session".to_string()
}

fn default_token_field() -> String {
    "token".to_string()
}

/// Strips a trailing API prefix from an API origin.
///
/// # Examples
///
/// ```
/// use vellum_config::derive_static_origin;
///
/// assert_eq!(derive_static_origin("https://example.com/api/", "/api"), "https://example.com");
/// assert_eq!(derive_static_origin("https://example.com", "/api"), "https://example.com");
/// ```
pub fn derive_static_origin(api_origin: &str, api_prefix: &str) -> String {
    let origin = api_origin.trim().trim_end_matches('/');
    let prefix = api_prefix.trim().trim_end_matches('/');

    if prefix.is_empty() {
        return origin.to_string();
    }

    match origin.strip_suffix(prefix) {
        Some(stripped) => stripped.trim_end_matches('/').to_string(),
        None => origin.to_string(),
    }
}

/// Where uploads go and where uploaded files are served from.
///
/// ```toml
/// [origin]
/// api_origin = "https://records.example.com/api"
/// api_prefix = "/api"
/// upload_path = "/upload"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OriginConfig {
    /// Base URL of the API
    #[serde(default = "default_api_origin")]
    pub api_origin: String,

    /// Suffix removed from `api_origin` to derive the static-asset origin
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Path of the transfer endpoint below `api_origin`
    #[serde(default = "default_upload_path")]
    pub upload_path: String,

    /// Multipart field carrying the file
    #[serde(default = "default_field_name")]
    pub field_name: String,

    /// Explicit static-asset origin, replacing the derived one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_origin: Option<String>,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            api_origin: default_api_origin(),
            api_prefix: default_api_prefix(),
            upload_path: default_upload_path(),
            field_name: default_field_name(),
            static_origin: None,
        }
    }
}

impl OriginConfig {
    /// Origin that relative paths returned by the transfer endpoint resolve against.
    pub fn static_origin(&self) -> String {
        match &self.static_origin {
            Some(explicit) => explicit.trim().trim_end_matches('/').to_string(),
            None => derive_static_origin(&self.api_origin, &self.api_prefix),
        }
    }

    /// Full URL of the transfer endpoint.
    pub fn upload_endpoint(&self) -> String {
        join_origin(&self.api_origin, &self.upload_path)
    }

    /// Checks that both origins are absolute URLs.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` naming the offending value.
    pub fn validate(&self) -> VellumResult<()> {
        for (name, value) in [
            ("origin.api_origin", self.api_origin.clone()),
            ("origin.static_origin", self.static_origin()),
        ] {
            let parsed = Url::parse(&value).map_err(|e| {
                VellumError::from(ConfigError::new(format!(
                    "{} '{}' is not an absolute URL: {}",
                    name, value, e
                )))
            })?;
            if !parsed.has_host() {
                return Err(ConfigError::new(format!("{} '{}' has no host", name, value)).into());
            }
        }

        if self.field_name.trim().is_empty() {
            return Err(ConfigError::new("origin.field_name must not be empty").into());
        }

        Ok(())
    }
}

/// Capability flags and acceptance rules of a widget instance.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WidgetConfig {
    /// Whether the URL input mode is available
    #[serde(default = "default_true")]
    pub allow_external_url: bool,

    /// Whether several files may be submitted and uploaded at once
    #[serde(default)]
    pub multiple: bool,

    /// Size ceiling in bytes
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    /// Accept list in HTML `accept` syntax
    #[serde(default = "default_accept")]
    pub accept: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            allow_external_url: true,
            multiple: false,
            max_bytes: default_max_bytes(),
            accept: default_accept(),
        }
    }
}

impl WidgetConfig {
    /// Builds the accept policy described by this section.
    pub fn accept_policy(&self) -> AcceptPolicy {
        AcceptPolicy::from_accept_list(&self.accept, self.max_bytes)
    }
}

/// Location and layout of the stored session.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CredentialConfig {
    /// JSON file backing the key-value store (defaults to the user data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,

    /// Key holding the serialized session object
    #[serde(default = "default_session_key")]
    pub session_key: String,

    /// Field of the session object holding the bearer token
    #[serde(default = "default_token_field")]
    pub token_field: String,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            store_path: None,
            session_key: default_session_key(),
            token_field: default_token_field(),
        }
    }
}

impl CredentialConfig {
    /// Configured store path, or `<data dir>/vellum/session.json`.
    pub fn resolved_store_path(&self) -> Option<PathBuf> {
        self.store_path
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("vellum").join("session.json")))
    }
}

/// Top-level Vellum configuration.
///
/// # Example
///
/// ```no_run
/// use vellum_config::VellumConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = VellumConfig::load()?;
/// println!("Uploading to {}", config.origin.upload_endpoint());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct VellumConfig {
    /// Endpoint and asset origins
    #[serde(default)]
    pub origin: OriginConfig,

    /// Widget capabilities and accept policy
    #[serde(default)]
    pub widget: WidgetConfig,

    /// Credential store layout
    #[serde(default)]
    pub credentials: CredentialConfig,
}

impl VellumConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> VellumResult<Self> {
        debug!("Loading configuration from file");

        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                VellumError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                VellumError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.origin.validate()?;
        Ok(config)
    }

    /// Load configuration with precedence: environment > user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (vellum.toml shipped with the library)
    /// 2. User config in home directory (~/.config/vellum/vellum.toml)
    /// 3. User config in current directory (./vellum.toml)
    /// 4. `VELLUM__SECTION__KEY` environment variables
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> VellumResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled");

        const DEFAULT_CONFIG: &str = include_str!("../../../vellum.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/vellum/vellum.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("vellum").required(false))
            .add_source(
                Environment::with_prefix("VELLUM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder
            .build()
            .map_err(|e| {
                VellumError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                VellumError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.origin.validate()?;
        Ok(config)
    }

    /// Renders the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> VellumResult<String> {
        toml::to_string_pretty(self).map_err(|e| {
            VellumError::from(ConfigError::new(format!(
                "Failed to serialize configuration: {}",
                e
            )))
        })
    }
}
