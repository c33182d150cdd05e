//! Media reference types.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;
use vellum_error::{IngestError, IngestErrorKind, IngestResult};

/// Media type recorded for every externally hosted reference.
pub const EXTERNAL_URL_MEDIA_TYPE: &str = "external/url";

/// Display label recorded for every externally hosted reference.
pub const EXTERNAL_URL_LABEL: &str = "External link";

/// How a reference entered the registry.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// File uploaded through the transfer endpoint
    #[display("local_upload")]
    LocalUpload,
    /// URL pasted by the user
    #[display("external_url")]
    ExternalUrl,
}

/// Hosting family recognized by the URL normalizer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum UrlProvider {
    /// `file/d/{id}` style file-hosting links
    #[display("file_hosting")]
    FileHosting,
    /// `watch?v={id}` and short-link video-hosting URLs
    #[display("video_hosting")]
    VideoHosting,
    /// Anything else, kept as entered
    #[display("direct")]
    Direct,
}

/// Absolute, dereferenceable URL of an attached piece of media.
///
/// The wrapped string is kept exactly as resolved (after trimming), so embed URLs
/// are not rewritten by URL serialization.
///
/// # Examples
///
/// ```
/// use vellum_core::CanonicalUrl;
///
/// let url = CanonicalUrl::parse("https://cdn.example.com/uploads/a.png").unwrap();
/// assert_eq!(url.as_str(), "https://cdn.example.com/uploads/a.png");
///
/// assert!(CanonicalUrl::parse("").is_err());
/// assert!(CanonicalUrl::parse("/uploads/a.png").is_err());
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "String", into = "String")]
#[display("{}", _0)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    /// Parse an absolute URL with a host.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUrl` for empty input, relative references, or URLs without a host.
    #[track_caller]
    pub fn parse(raw: impl AsRef<str>) -> IngestResult<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IngestError::new(IngestErrorKind::InvalidUrl(
                "URL must not be empty".to_string(),
            )));
        }

        let parsed = Url::parse(trimmed).map_err(|e| {
            IngestError::new(IngestErrorKind::InvalidUrl(format!("{}: {}", trimmed, e)))
        })?;

        if !parsed.has_host() {
            return Err(IngestError::new(IngestErrorKind::InvalidUrl(format!(
                "{}: URL has no host",
                trimmed
            ))));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CanonicalUrl {
    type Error = IngestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CanonicalUrl::parse(value)
    }
}

impl From<CanonicalUrl> for String {
    fn from(url: CanonicalUrl) -> Self {
        url.0
    }
}

/// Joins an origin and a path with exactly one `/` between them.
///
/// # Examples
///
/// ```
/// use vellum_core::join_origin;
///
/// assert_eq!(join_origin("https://example.com/", "/uploads/a.png"), "https://example.com/uploads/a.png");
/// assert_eq!(join_origin("https://example.com", "uploads/a.png"), "https://example.com/uploads/a.png");
/// ```
pub fn join_origin(origin: &str, path: &str) -> String {
    let origin = origin.trim().trim_end_matches('/');
    let path = path.trim().trim_start_matches('/');
    format!("{}/{}", origin, path)
}

/// A file that went through the transfer endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct UploadedMedia {
    /// Upload session that produced this reference
    session_id: Uuid,
    /// Source file name
    original_name: String,
    /// Size of the uploaded file in bytes
    size_bytes: u64,
    /// Declared media type, e.g. "image/png"
    media_type: String,
    /// Origin-resolved location of the stored file
    canonical_url: CanonicalUrl,
}

impl UploadedMedia {
    /// Creates a reference to an uploaded file.
    pub fn new(
        session_id: Uuid,
        original_name: impl Into<String>,
        size_bytes: u64,
        media_type: impl Into<String>,
        canonical_url: CanonicalUrl,
    ) -> Self {
        Self {
            session_id,
            original_name: original_name.into(),
            size_bytes,
            media_type: media_type.into(),
            canonical_url,
        }
    }
}

/// An externally hosted piece of media, referenced by URL only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct ExternalMedia {
    /// Hosting family the normalizer recognized
    provider: UrlProvider,
    /// Always [`EXTERNAL_URL_LABEL`]
    original_name: String,
    /// Always `0`
    size_bytes: u64,
    /// Always [`EXTERNAL_URL_MEDIA_TYPE`]
    media_type: String,
    /// Normalized, embeddable URL
    canonical_url: CanonicalUrl,
}

impl ExternalMedia {
    /// Creates a reference to an external URL.
    pub fn new(provider: UrlProvider, canonical_url: CanonicalUrl) -> Self {
        Self {
            provider,
            original_name: EXTERNAL_URL_LABEL.to_string(),
            size_bytes: 0,
            media_type: EXTERNAL_URL_MEDIA_TYPE.to_string(),
            canonical_url,
        }
    }
}

/// A registered, canonical pointer to attached media.
///
/// # Examples
///
/// ```
/// use vellum_core::{CanonicalUrl, ExternalMedia, MediaReference, SourceKind, UrlProvider};
///
/// let url = CanonicalUrl::parse("https://www.youtube.com/embed/abc123").unwrap();
/// let reference = MediaReference::ExternalUrl(ExternalMedia::new(UrlProvider::VideoHosting, url));
///
/// assert_eq!(reference.source_kind(), SourceKind::ExternalUrl);
/// assert_eq!(reference.size_bytes(), 0);
/// assert_eq!(reference.media_type(), "external/url");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::From)]
#[serde(tag = "source_kind", rename_all = "snake_case")]
pub enum MediaReference {
    /// Uploaded file
    LocalUpload(UploadedMedia),
    /// External URL
    ExternalUrl(ExternalMedia),
}

impl MediaReference {
    /// Which pipeline produced this reference.
    pub fn source_kind(&self) -> SourceKind {
        match self {
            MediaReference::LocalUpload(_) => SourceKind::LocalUpload,
            MediaReference::ExternalUrl(_) => SourceKind::ExternalUrl,
        }
    }

    /// Display label.
    pub fn original_name(&self) -> &str {
        match self {
            MediaReference::LocalUpload(media) => media.original_name(),
            MediaReference::ExternalUrl(media) => media.original_name(),
        }
    }

    /// Size in bytes, `0` when not applicable.
    pub fn size_bytes(&self) -> u64 {
        match self {
            MediaReference::LocalUpload(media) => *media.size_bytes(),
            MediaReference::ExternalUrl(media) => *media.size_bytes(),
        }
    }

    /// Declared media type, or the external sentinel.
    pub fn media_type(&self) -> &str {
        match self {
            MediaReference::LocalUpload(media) => media.media_type(),
            MediaReference::ExternalUrl(media) => media.media_type(),
        }
    }

    /// Canonical URL of the media.
    pub fn canonical_url(&self) -> &CanonicalUrl {
        match self {
            MediaReference::LocalUpload(media) => media.canonical_url(),
            MediaReference::ExternalUrl(media) => media.canonical_url(),
        }
    }
}
