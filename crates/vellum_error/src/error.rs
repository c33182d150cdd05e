//! Top-level error wrapper types.

use crate::{ConfigError, CredentialError, HttpError, IngestError, JsonError};

/// Every error a Vellum crate can surface.
///
/// # Examples
///
/// ```
/// use vellum_error::{VellumError, ConfigError};
///
/// let config_err = ConfigError::new("Missing origin");
/// let err: VellumError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VellumErrorKind {
    /// Ingestion (validation or transfer) error
    #[from(IngestError)]
    Ingest(IngestError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// HTTP client error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Credential store error
    #[from(CredentialError)]
    Credential(CredentialError),
}

/// Vellum error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Vellum Error: {}", _0)]
pub struct VellumError(Box<VellumErrorKind>);

impl VellumError {
    /// Create a new error from a kind.
    pub fn new(kind: VellumErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VellumErrorKind {
        &self.0
    }
}

impl<T> From<T> for VellumError
where
    T: Into<VellumErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Vellum operations.
///
/// # Examples
///
/// ```
/// use vellum_error::{VellumResult, ConfigError};
///
/// fn load() -> VellumResult<()> {
///     Err(ConfigError::new("no config"))?
/// }
///
/// assert!(load().is_err());
/// ```
pub type VellumResult<T> = std::result::Result<T, VellumError>;
