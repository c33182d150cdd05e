//! Multipart transfers over HTTP.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use tracing::{debug, error, instrument};
use vellum_config::OriginConfig;
use vellum_error::{HttpError, IngestError, IngestErrorKind, IngestResult, VellumResult};

use crate::transport::{failure_from_response, parse_success_body};
use crate::{ProgressReporter, ServerUpload, UploadRequest, UploadTransport};

/// Default multipart field name.
pub const DEFAULT_FIELD_NAME: &str = "file";

/// Bytes handed to the connection between progress reports.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Posts files as `multipart/form-data` and streams the body so progress can be observed.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    field_name: String,
    chunk_size: usize,
}

impl HttpTransport {
    /// Sends to `endpoint` with a fresh client.
    pub fn new(endpoint: impl Into<String>) -> VellumResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Sends to `endpoint` with an existing client.
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            field_name: DEFAULT_FIELD_NAME.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Sends to the configured upload endpoint with the configured field name.
    pub fn from_config(origin: &OriginConfig) -> VellumResult<Self> {
        Ok(Self::new(origin.upload_endpoint())?.with_field_name(origin.field_name.clone()))
    }

    /// Overrides the multipart field name.
    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    /// Overrides the chunk size. Zero is treated as one byte.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Transfer endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Multipart field name.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    fn file_part(&self, request: &UploadRequest, progress: ProgressReporter) -> IngestResult<Part> {
        let total = request.bytes.len() as u64;
        let chunks = split_chunks(&request.bytes, self.chunk_size);

        let mut sent = 0u64;
        let body = futures_util::stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len() as u64;
            progress.report(sent, Some(total));
            Ok::<Bytes, std::io::Error>(chunk)
        }));

        Part::stream_with_length(Body::wrap_stream(body), total)
            .file_name(request.file_name.clone())
            .mime_str(&request.media_type)
            .map_err(|e| {
                IngestError::new(IngestErrorKind::NetworkFailure(format!(
                    "Invalid media type '{}': {}",
                    request.media_type, e
                )))
            })
    }
}

fn split_chunks(bytes: &Bytes, chunk_size: usize) -> Vec<Bytes> {
    let mut chunks = Vec::with_capacity(bytes.len().div_ceil(chunk_size.max(1)));
    let mut offset = 0;
    while offset < bytes.len() {
        let end = (offset + chunk_size).min(bytes.len());
        chunks.push(bytes.slice(offset..end));
        offset = end;
    }
    chunks
}

#[async_trait]
impl UploadTransport for HttpTransport {
    #[instrument(
        skip(self, request, progress),
        fields(endpoint = %self.endpoint, file = %request.file_name, size = request.bytes.len())
    )]
    async fn send(
        &self,
        request: UploadRequest,
        progress: ProgressReporter,
    ) -> IngestResult<ServerUpload> {
        let part = self.file_part(&request, progress)?;
        let form = Form::new().part(self.field_name.clone(), part);

        let mut req = self.client.post(&self.endpoint).multipart(form);
        if let Some(token) = &request.bearer {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = req.send().await.map_err(|e| {
            error!("Upload request failed: {}", e);
            IngestError::new(IngestErrorKind::NetworkFailure(e.to_string()))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read upload response: {}", e);
            IngestError::new(IngestErrorKind::NetworkFailure(e.to_string()))
        })?;

        if !status.is_success() {
            error!(status = status.as_u16(), "Upload rejected");
            return Err(failure_from_response(status.as_u16(), &body));
        }

        debug!(status = status.as_u16(), "Upload accepted");
        parse_success_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_chunks_covers_every_byte() {
        let bytes = Bytes::from(vec![7u8; 10]);
        let chunks = split_chunks(&bytes, 4);
        let sizes: Vec<usize> = chunks.iter().map(Bytes::len).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
    }

    #[test]
    fn test_split_chunks_empty_body() {
        assert!(split_chunks(&Bytes::new(), 4).is_empty());
    }

    #[test]
    fn test_from_config_uses_endpoint_and_field() {
        let mut origin = OriginConfig::default();
        origin.api_origin = "https://api.example.com/api".to_string();
        origin.field_name = "media".to_string();
        let transport = HttpTransport::from_config(&origin).expect("client builds");
        assert_eq!(transport.endpoint(), origin.upload_endpoint());
        assert_eq!(transport.field_name(), "media");
    }
}
