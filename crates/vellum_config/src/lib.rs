//! Layered configuration for Vellum.
//!
//! The widget needs three things from its owning context: where to send files,
//! which files to accept, and where the stored session lives. All three are read
//! from TOML with the `config` crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod settings;

pub use settings::{
    CredentialConfig, OriginConfig, VellumConfig, WidgetConfig, derive_static_origin,
};
