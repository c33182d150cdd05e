//! The seam between the transfer manager and the network.

use async_trait::async_trait;
use bytes::Bytes;
use derive_getters::Getters;
use serde_json::Value;
use vellum_error::{IngestError, IngestErrorKind, IngestResult};

use crate::ProgressReporter;

/// One file to send, with the token to authenticate it.
#[derive(Clone)]
pub struct UploadRequest {
    /// Multipart file name
    pub file_name: String,
    /// Multipart content type
    pub media_type: String,
    /// File contents
    pub bytes: Bytes,
    /// Bearer token, when the credential provider had one
    pub bearer: Option<String>,
}

impl std::fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadRequest")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("size", &self.bytes.len())
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Keys holding the stored location, most specific first.
const PATH_KEYS: &[&str] = &[
    "path",
    "url",
    "filePath",
    "file_path",
    "relativePath",
    "relative_path",
];
/// Keys holding the user-facing file name. Multer's `filename` is the stored name, so it comes last.
const NAME_KEYS: &[&str] = &[
    "originalName",
    "original_name",
    "originalname",
    "name",
    "filename",
];
const SIZE_KEYS: &[&str] = &["size", "sizeBytes", "size_bytes"];
const TYPE_KEYS: &[&str] = &[
    "mimetype",
    "mimeType",
    "mediaType",
    "media_type",
    "contentType",
    "content_type",
];
/// Envelopes some endpoints wrap the description in.
const ENVELOPE_KEYS: &[&str] = &["data", "file"];

/// What the transfer endpoint says about a stored file.
///
/// Only `path` is required; missing metadata falls back to the local file.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ServerUpload {
    /// Stored location, usually relative to the static origin
    pub(crate) path: String,
    /// File name the server recorded
    pub(crate) original_name: Option<String>,
    /// Size the server recorded
    pub(crate) size_bytes: Option<u64>,
    /// Media type the server recorded
    pub(crate) media_type: Option<String>,
}

impl ServerUpload {
    /// A response carrying only a path.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            original_name: None,
            size_bytes: None,
            media_type: None,
        }
    }

    /// Sets the recorded file name.
    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = Some(name.into());
        self
    }

    /// Sets the recorded size.
    pub fn with_size_bytes(mut self, size: u64) -> Self {
        self.size_bytes = Some(size);
        self
    }

    /// Sets the recorded media type.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }
}

/// Sends one file to the transfer endpoint.
///
/// Implementations call [`ProgressReporter::report`] as bytes go out and
/// return the server's description of the stored file.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Sends `request`, reporting progress along the way.
    async fn send(
        &self,
        request: UploadRequest,
        progress: ProgressReporter,
    ) -> IngestResult<ServerUpload>;
}

/// Parses a 2xx response body.
///
/// Every field may appear under several names; when more than one is present
/// the first name in a fixed precedence order wins. A description nested
/// under `data` or `file` is accepted when the top level has no path.
pub fn parse_success_body(body: &str) -> IngestResult<ServerUpload> {
    let payload: Value = serde_json::from_str(body).map_err(|e| {
        IngestError::new(IngestErrorKind::NetworkFailure(format!(
            "Unreadable upload response: {}",
            e
        )))
    })?;

    let described = std::iter::once(&payload)
        .chain(ENVELOPE_KEYS.iter().filter_map(|key| payload.get(*key)))
        .find(|object| first_string(object, PATH_KEYS).is_some());

    let Some(object) = described else {
        return Err(IngestError::new(IngestErrorKind::NetworkFailure(
            "Upload response did not include a file path".to_string(),
        )));
    };

    Ok(ServerUpload {
        path: first_string(object, PATH_KEYS).unwrap_or_default(),
        original_name: first_string(object, NAME_KEYS),
        size_bytes: first_size(object),
        media_type: first_string(object, TYPE_KEYS),
    })
}

fn first_string(object: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn first_size(object: &Value) -> Option<u64> {
    SIZE_KEYS.iter().find_map(|key| match object.get(*key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Turns a non-2xx response into an error.
///
/// A `message` or `error` string in a JSON body becomes a `ServerError`;
/// anything else is a `NetworkFailure` naming the status.
pub fn failure_from_response(status: u16, body: &str) -> IngestError {
    match server_error_message(body) {
        Some(message) => IngestError::new(IngestErrorKind::ServerError(message)),
        None => IngestError::new(IngestErrorKind::NetworkFailure(format!(
            "Upload failed with HTTP status {}",
            status
        ))),
    }
}

fn server_error_message(body: &str) -> Option<String> {
    let payload: Value = serde_json::from_str(body).ok()?;
    let message = payload
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| payload.get("error").and_then(Value::as_str))
        .or_else(|| payload.pointer("/error/message").and_then(Value::as_str))?;
    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}
