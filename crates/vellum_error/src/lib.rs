//! Error types for Vellum.
//!
//! This crate provides the error types shared by every crate in the workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! Ingestion code works with [`IngestResult`] so callers can match on
//! [`IngestErrorKind`] directly; everything else returns [`VellumResult`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod credential;
mod error;
mod http;
mod ingest;
mod json;

pub use config::ConfigError;
pub use credential::{CredentialError, CredentialErrorKind};
pub use error::{VellumError, VellumErrorKind, VellumResult};
pub use http::HttpError;
pub use ingest::{IngestError, IngestErrorKind, IngestResult};
pub use json::JsonError;
