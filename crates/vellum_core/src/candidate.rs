//! Candidate descriptions handed to the validator.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// What the validator knows about a file before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Candidate {
    /// File name as picked or dropped
    file_name: String,
    /// Declared media type
    media_type: String,
    /// Size in bytes
    size_bytes: u64,
}

impl Candidate {
    /// Creates a candidate description.
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            size_bytes,
        }
    }
}
