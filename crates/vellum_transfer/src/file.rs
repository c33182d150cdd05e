//! Local files selected for upload.

use bytes::Bytes;
use derive_getters::Getters;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};
use vellum_core::Candidate;
use vellum_error::{IngestError, IngestErrorKind, IngestResult};

/// Guess a media type from a file name, falling back to `application/octet-stream`.
///
/// # Examples
///
/// ```
/// use vellum_transfer::guess_media_type;
///
/// assert_eq!(guess_media_type("photo.PNG"), "image/png");
/// assert_eq!(guess_media_type("blob"), "application/octet-stream");
/// ```
pub fn guess_media_type(file_name: impl AsRef<Path>) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// A file picked or dropped by the user, held in memory until sent.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct LocalFile {
    /// Name shown to the user and sent as the multipart file name
    file_name: String,
    /// Declared media type
    media_type: String,
    /// File contents
    bytes: Bytes,
}

impl LocalFile {
    /// Wraps in-memory contents.
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, guessing its media type from the extension.
    ///
    /// Prefer [`PendingFile::inspect`] when the file still has to be validated,
    /// so rejected files are never loaded.
    ///
    /// # Errors
    ///
    /// Returns `FileRead` if the path has no file name or cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> IngestResult<Self> {
        PendingFile::inspect(path).await?.read().await
    }

    /// Size of the contents in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// What the validator needs to know about this file.
    pub fn candidate(&self) -> Candidate {
        Candidate::new(self.file_name.clone(), self.media_type.clone(), self.size_bytes())
    }
}

fn file_read(path: &Path, reason: impl std::fmt::Display) -> IngestError {
    IngestError::new(IngestErrorKind::FileRead(format!(
        "{}: {}",
        path.display(),
        reason
    )))
}

/// A file on disk described from its metadata, before any contents are read.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct PendingFile {
    /// Where the file lives
    path: PathBuf,
    /// Name shown to the user and sent as the multipart file name
    file_name: String,
    /// Media type guessed from the extension
    media_type: String,
    /// Size reported by the file system
    size_bytes: u64,
}

impl PendingFile {
    /// Looks the file up without reading it.
    ///
    /// # Errors
    ///
    /// Returns `FileRead` if the path has no file name, does not exist, or is
    /// not a regular file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn inspect(path: impl AsRef<Path>) -> IngestResult<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| file_read(path, "not a file name"))?
            .to_string();

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| file_read(path, e))?;
        if !metadata.is_file() {
            return Err(file_read(path, "not a regular file"));
        }

        let media_type = guess_media_type(&file_name);
        debug!(file = %file_name, media_type = %media_type, size = metadata.len(), "Inspected local file");

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            media_type,
            size_bytes: metadata.len(),
        })
    }

    /// What the validator needs to know about this file.
    pub fn candidate(&self) -> Candidate {
        Candidate::new(self.file_name.clone(), self.media_type.clone(), self.size_bytes)
    }

    /// Loads the contents.
    ///
    /// # Errors
    ///
    /// Returns `FileRead` if the file cannot be read.
    #[instrument(skip(self), fields(file = %self.file_name))]
    pub async fn read(self) -> IngestResult<LocalFile> {
        let contents = tokio::fs::read(&self.path)
            .await
            .map_err(|e| file_read(&self.path, e))?;
        debug!(size = contents.len(), "Read local file");
        Ok(LocalFile::new(self.file_name, self.media_type, contents))
    }
}
