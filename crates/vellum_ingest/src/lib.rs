//! Media ingestion for Vellum.
//!
//! - [`validate`] / [`validate_url`]: synchronous admission checks
//! - [`normalize`] / [`classify`]: embeddable forms of hosting links
//! - [`ModeController`]: local-upload vs. external-URL input
//! - [`ReferenceRegistry`]: ordered attached media with an observer
//! - [`MediaWidget`]: all of the above plus a [`vellum_transfer::TransferManager`]

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod mode;
mod normalizer;
mod observer;
mod registry;
mod validator;
mod widget;

pub use mode::{InputMode, ModeController};
pub use normalizer::{NormalizedUrl, classify, normalize};
pub use observer::MediaAttachedObserver;
pub use registry::{Attached, ReferenceRegistry};
pub use validator::{validate, validate_url};
pub use widget::{MediaWidget, WidgetOptions};
