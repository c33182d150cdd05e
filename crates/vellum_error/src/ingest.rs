//! Media ingestion error types.

/// Reasons a candidate or an upload was not turned into a media reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum IngestErrorKind {
    /// Candidate is larger than the policy allows
    #[display("File is {} bytes, which exceeds the {} byte limit", size_bytes, max_bytes)]
    SizeExceeded {
        /// Declared size of the candidate
        size_bytes: u64,
        /// Policy ceiling
        max_bytes: u64,
    },

    /// No accept matcher was satisfied
    #[display("File type '{}' of '{}' is not accepted", media_type, file_name)]
    UnsupportedType {
        /// Declared media type of the candidate
        media_type: String,
        /// File name of the candidate
        file_name: String,
    },

    /// Input failed URL syntax checks, or a resolved URL was not absolute
    #[display("Invalid URL: {}", _0)]
    InvalidUrl(String),

    /// Transfer failed without a usable server explanation
    #[display("Network failure: {}", _0)]
    NetworkFailure(String),

    /// Server rejected the transfer with a message
    #[display("{}", _0)]
    ServerError(String),

    /// Local file could not be read before the transfer
    #[display("Failed to read file: {}", _0)]
    FileRead(String),

    /// Operation does not apply to the widget's current input mode
    #[display("{}", _0)]
    ModeMismatch(String),
}

impl IngestErrorKind {
    /// Whether this error is detected synchronously before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            IngestErrorKind::SizeExceeded { .. }
                | IngestErrorKind::UnsupportedType { .. }
                | IngestErrorKind::InvalidUrl(_)
        )
    }

    /// Whether this error happened while a transfer was in flight.
    pub fn is_transfer(&self) -> bool {
        matches!(
            self,
            IngestErrorKind::NetworkFailure(_) | IngestErrorKind::ServerError(_)
        )
    }
}

/// Ingestion error with location tracking.
///
/// # Examples
///
/// ```
/// use vellum_error::{IngestError, IngestErrorKind};
///
/// let err = IngestError::new(IngestErrorKind::InvalidUrl("not a url".to_string()));
/// assert!(err.kind().is_validation());
/// assert_eq!(err.message(), "Invalid URL: not a url");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Ingest Error: {} at line {} in {}", kind, line, file)]
pub struct IngestError {
    /// The specific error kind
    pub kind: IngestErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl IngestError {
    /// Create a new ingest error with location tracking.
    #[track_caller]
    pub fn new(kind: IngestErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &IngestErrorKind {
        &self.kind
    }

    /// Human-readable reason, suitable for a dismissible message.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl From<IngestErrorKind> for IngestError {
    #[track_caller]
    fn from(kind: IngestErrorKind) -> Self {
        IngestError::new(kind)
    }
}

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;
