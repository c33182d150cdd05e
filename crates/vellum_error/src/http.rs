//! HTTP error types.

/// HTTP client error (building a client, unreachable endpoint) with source location.
///
/// Failures of an individual upload are reported as [`crate::IngestError`] instead;
/// this type covers transport setup that happens outside a transfer.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error: {} at line {} in {}", message, line, file)]
pub struct HttpError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Create a new HttpError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use vellum_error::HttpError;
    ///
    /// let err = HttpError::new("Failed to build client");
    /// assert!(err.message.contains("build client"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
