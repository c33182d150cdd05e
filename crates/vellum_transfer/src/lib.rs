//! File transfers for Vellum.
//!
//! [`TransferManager`] sends a [`LocalFile`] through an [`UploadTransport`],
//! attaches a bearer token from a [`CredentialProvider`], reports progress
//! as [`TransferEvent`]s and resolves the server's answer into a
//! [`vellum_core::MediaReference`].
//!
//! [`HttpTransport`] is the production transport; tests substitute their own.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod credentials;
mod file;
mod http;
mod manager;
mod progress;
mod transport;

pub use credentials::{
    CredentialProvider, JsonFileStore, KeyValueStore, MemoryStore, NoCredentials,
    SessionCredentials, StaticToken,
};
pub use file::{LocalFile, PendingFile, guess_media_type};
pub use http::{DEFAULT_CHUNK_SIZE, DEFAULT_FIELD_NAME, HttpTransport};
pub use manager::{TransferHandle, TransferManager, resolve_server_path};
pub use progress::{ProgressReporter, TransferEvent, TransferOutcome};
pub use transport::{
    ServerUpload, UploadRequest, UploadTransport, failure_from_response, parse_success_body,
};
