//! Vellum - Media Ingestion Core
//!
//! Vellum turns user-supplied media into canonical, dereferenceable URL
//! references. Local files are validated against an accept policy and sent
//! to a transfer endpoint; pasted links to known hosting services are
//! rewritten into their embeddable form. Every attached item ends up as a
//! [`MediaReference`] in an ordered registry, and the owning context is
//! notified once per item.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use vellum::{LocalFile, MediaWidget, VellumConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = VellumConfig::load()?;
//!     let mut widget = MediaWidget::from_config(&config)?;
//!
//!     let file = LocalFile::from_path("photo.png").await?;
//!     for result in widget.submit_files(vec![file]).await? {
//!         println!("{}", result?.canonical_url());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `vellum_error` - Error types
//! - `vellum_core` - Media references, accept policy, upload sessions, telemetry
//! - `vellum_config` - Layered configuration
//! - `vellum_transfer` - Transfer manager, transports, credentials
//! - `vellum_ingest` - Validator, normalizer, mode controller, registry, widget
//!
//! This crate (`vellum`) re-exports everything for convenience.

pub use vellum_config::*;
pub use vellum_core::*;
pub use vellum_error::*;
pub use vellum_ingest::*;
pub use vellum_transfer::*;
