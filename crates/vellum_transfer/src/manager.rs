//! Runs transfers and turns server responses into media references.

use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};
use url::Url;
use uuid::Uuid;
use vellum_config::VellumConfig;
use vellum_core::{CanonicalUrl, MediaReference, UploadSession, UploadedMedia, join_origin};
use vellum_error::{IngestError, IngestErrorKind, IngestResult, VellumResult};

use crate::{
    CredentialProvider, HttpTransport, JsonFileStore, LocalFile, NoCredentials, ProgressReporter,
    ServerUpload, SessionCredentials, TransferEvent, TransferOutcome, UploadRequest,
    UploadTransport,
};

/// Resolves a server-reported path against the static-asset origin.
///
/// Absolute `http(s)` paths are kept as they are.
///
/// # Examples
///
/// ```
/// use vellum_transfer::resolve_server_path;
///
/// let url = resolve_server_path("https://api.example.com", "/uploads/abc.png").unwrap();
/// assert_eq!(url.as_str(), "https://api.example.com/uploads/abc.png");
///
/// let url = resolve_server_path("https://api.example.com", "https://cdn.example.com/x.png").unwrap();
/// assert_eq!(url.as_str(), "https://cdn.example.com/x.png");
/// ```
pub fn resolve_server_path(static_origin: &str, path: &str) -> IngestResult<CanonicalUrl> {
    let path = path.trim();
    if path.is_empty() {
        return Err(IngestError::new(IngestErrorKind::NetworkFailure(
            "Upload response did not include a file path".to_string(),
        )));
    }

    let is_absolute = Url::parse(path)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false);

    if is_absolute {
        CanonicalUrl::parse(path)
    } else {
        CanonicalUrl::parse(join_origin(static_origin, path))
    }
}

/// Sends local files through an [`UploadTransport`] and builds references from the responses.
///
/// Cheap to clone; clones share the transport and credential provider.
#[derive(Clone)]
pub struct TransferManager {
    transport: Arc<dyn UploadTransport>,
    credentials: Arc<dyn CredentialProvider>,
    static_origin: String,
}

impl std::fmt::Debug for TransferManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferManager")
            .field("static_origin", &self.static_origin)
            .finish_non_exhaustive()
    }
}

impl TransferManager {
    /// Creates a manager resolving paths against `static_origin`.
    pub fn new(
        transport: Arc<dyn UploadTransport>,
        credentials: Arc<dyn CredentialProvider>,
        static_origin: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            credentials,
            static_origin: static_origin.into(),
        }
    }

    /// HTTP transport and file-backed session credentials, as configured.
    pub fn from_config(config: &VellumConfig) -> VellumResult<Self> {
        let transport = HttpTransport::from_config(&config.origin)?;
        let credentials: Arc<dyn CredentialProvider> =
            match config.credentials.resolved_store_path() {
                Some(path) => Arc::new(SessionCredentials::from_config(
                    JsonFileStore::new(path),
                    &config.credentials,
                )),
                None => {
                    warn!("No data directory for the credential store, uploads are unauthenticated");
                    Arc::new(NoCredentials)
                }
            };
        Ok(Self::new(
            Arc::new(transport),
            credentials,
            config.origin.static_origin(),
        ))
    }

    /// Origin relative paths resolve against.
    pub fn static_origin(&self) -> &str {
        &self.static_origin
    }

    /// Sends one file and waits for the outcome.
    ///
    /// Events for the transfer go to `events` when given: `Progress(0)` first,
    /// rising percentages, then exactly one `Succeeded` or `Failed`.
    pub async fn upload(
        &self,
        file: LocalFile,
        events: Option<UnboundedSender<TransferEvent>>,
    ) -> TransferOutcome {
        let session = UploadSession::new(file.file_name().clone());
        self.run(ProgressReporter::new(session, events), file).await
    }

    /// Starts a transfer in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(&self, file: LocalFile) -> TransferHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let reporter = ProgressReporter::new(UploadSession::new(file.file_name().clone()), Some(tx));
        let session_id = reporter.session_id();
        let manager = self.clone();
        let join = tokio::spawn(async move { manager.run(reporter, file).await });
        TransferHandle {
            session_id,
            events: rx,
            join,
        }
    }

    #[instrument(
        skip(self, reporter, file),
        fields(session = %reporter.session_id(), file = %file.file_name(), size = file.size_bytes())
    )]
    async fn run(&self, reporter: ProgressReporter, file: LocalFile) -> TransferOutcome {
        reporter.start();

        let request = UploadRequest {
            file_name: file.file_name().clone(),
            media_type: file.media_type().clone(),
            bytes: file.bytes().clone(),
            bearer: self.credentials.bearer_token().await,
        };

        let result = match self.transport.send(request, reporter.clone()).await {
            Ok(server) => self.reference_for(reporter.session_id(), &file, server),
            Err(e) => Err(e),
        };

        match result {
            Ok(reference) => {
                info!(url = %reference.canonical_url(), "Transfer succeeded");
                reporter.succeed(&reference);
                TransferOutcome::Succeeded(reference)
            }
            Err(error) => {
                warn!(error = %error, "Transfer failed");
                reporter.fail(&error);
                TransferOutcome::Failed(error)
            }
        }
    }

    fn reference_for(
        &self,
        session_id: Uuid,
        file: &LocalFile,
        server: ServerUpload,
    ) -> IngestResult<MediaReference> {
        let canonical_url = resolve_server_path(&self.static_origin, server.path())?;
        let ServerUpload {
            original_name,
            size_bytes,
            media_type,
            ..
        } = server;
        Ok(UploadedMedia::new(
            session_id,
            original_name.unwrap_or_else(|| file.file_name().clone()),
            size_bytes.unwrap_or_else(|| file.size_bytes()),
            media_type.unwrap_or_else(|| file.media_type().clone()),
            canonical_url,
        )
        .into())
    }
}

/// A transfer running on the Tokio runtime.
#[derive(Debug)]
pub struct TransferHandle {
    session_id: Uuid,
    events: UnboundedReceiver<TransferEvent>,
    join: JoinHandle<TransferOutcome>,
}

impl TransferHandle {
    /// Session of the running transfer.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Next event, or `None` once the transfer has finished and every event was read.
    pub async fn next_event(&mut self) -> Option<TransferEvent> {
        self.events.recv().await
    }

    /// Waits for the transfer and returns its outcome with the events not yet read.
    pub async fn finish(mut self) -> (TransferOutcome, Vec<TransferEvent>) {
        let outcome = match (&mut self.join).await {
            Ok(outcome) => outcome,
            Err(e) => TransferOutcome::Failed(IngestError::new(IngestErrorKind::NetworkFailure(
                format!("Transfer task ended unexpectedly: {}", e),
            ))),
        };

        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        (outcome, events)
    }
}
