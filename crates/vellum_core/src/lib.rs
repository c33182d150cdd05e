//! Core data types for Vellum media ingestion.
//!
//! This crate defines what every other crate exchanges: media references,
//! accept policies, validator candidates, and upload session state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod candidate;
mod media;
mod policy;
mod session;
mod telemetry;

pub use candidate::Candidate;
pub use media::{
    CanonicalUrl, EXTERNAL_URL_LABEL, EXTERNAL_URL_MEDIA_TYPE, ExternalMedia, MediaReference,
    SourceKind, UploadedMedia, UrlProvider, join_origin,
};
pub use policy::{AcceptPolicy, AcceptPolicyBuilder, DEFAULT_MAX_BYTES, TypeMatcher};
pub use session::{UploadSession, UploadStatus, progress_percent};
pub use telemetry::{init_logging, init_telemetry, shutdown_telemetry};
