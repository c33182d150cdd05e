//! Credential store error types.

/// Kinds of credential store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CredentialErrorKind {
    /// Store could not be read
    #[display("Failed to read credential store: {}", _0)]
    StoreRead(String),
    /// Store could not be written
    #[display("Failed to write credential store: {}", _0)]
    StoreWrite(String),
    /// Store contents are not what we expect
    #[display("Malformed credential store: {}", _0)]
    Malformed(String),
}

/// Credential error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Credential Error: {} at line {} in {}", kind, line, file)]
pub struct CredentialError {
    /// The kind of error that occurred
    pub kind: CredentialErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CredentialError {
    /// Create a new credential error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CredentialErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
