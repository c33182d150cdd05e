//! Which input surface the widget presents.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;
use vellum_error::{IngestError, IngestErrorKind, IngestResult};
use vellum_transfer::TransferEvent;

/// Active input surface.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Pick or drop local files
    #[default]
    #[display("local_upload")]
    LocalUpload,
    /// Paste a link to externally hosted media
    #[display("external_url")]
    ExternalUrl,
}

/// Holds the input mode and the transient state tied to it.
///
/// Only an explicit [`toggle`](Self::toggle) changes the mode; transfer
/// outcomes never do.
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    mode: InputMode,
    allow_external_url: bool,
    url_draft: String,
    error: Option<IngestError>,
    transfers: HashMap<Uuid, TransferProgress>,
}

/// Last known state of one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TransferProgress {
    percent: u8,
    finished: bool,
}

impl ModeController {
    /// Starts in `LocalUpload`.
    pub fn new(allow_external_url: bool) -> Self {
        Self {
            allow_external_url,
            ..Self::default()
        }
    }

    /// Current mode.
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Whether URL mode can be entered at all.
    pub fn allows_external_url(&self) -> bool {
        self.allow_external_url
    }

    /// Switches mode and clears the error, progress, and URL draft.
    ///
    /// Returns `false` without changing anything when URL mode is disabled.
    pub fn toggle(&mut self) -> bool {
        if !self.allow_external_url {
            debug!("External URLs disabled, ignoring mode toggle");
            return false;
        }
        self.mode = match self.mode {
            InputMode::LocalUpload => InputMode::ExternalUrl,
            InputMode::ExternalUrl => InputMode::LocalUpload,
        };
        self.url_draft.clear();
        self.error = None;
        self.transfers.clear();
        debug!(mode = %self.mode, "Input mode toggled");
        true
    }

    /// Fails with `ModeMismatch` unless the controller is in `expected` mode.
    pub fn require(&self, expected: InputMode) -> IngestResult<()> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(IngestError::new(IngestErrorKind::ModeMismatch(format!(
                "Widget is in {} mode, {} required",
                self.mode, expected
            ))))
        }
    }

    /// Partially entered URL text.
    pub fn url_draft(&self) -> &str {
        &self.url_draft
    }

    /// Replaces the URL text. Only valid in `ExternalUrl` mode.
    pub fn set_url_draft(&mut self, text: impl Into<String>) -> IngestResult<()> {
        self.require(InputMode::ExternalUrl)?;
        self.url_draft = text.into();
        Ok(())
    }

    /// Clears the URL text.
    pub fn clear_url_draft(&mut self) {
        self.url_draft.clear();
    }

    /// Pending error, if any.
    pub fn error(&self) -> Option<&IngestError> {
        self.error.as_ref()
    }

    /// Shows `error` until dismissed or replaced.
    pub fn set_error(&mut self, error: IngestError) {
        self.error = Some(error);
    }

    /// Clears and returns the pending error.
    pub fn dismiss_error(&mut self) -> Option<IngestError> {
        self.error.take()
    }

    /// Combined percentage of the current batch while any transfer is running.
    ///
    /// Each transfer counts equally and finished transfers count as complete,
    /// so the value never decreases within a batch.
    pub fn progress(&self) -> Option<u8> {
        if self.transfers.is_empty() {
            return None;
        }
        let total: u32 = self
            .transfers
            .values()
            .map(|transfer| u32::from(transfer.percent))
            .sum();
        u8::try_from(total / self.transfers.len() as u32).ok()
    }

    /// Updates transient state from a transfer event.
    ///
    /// Progress is tracked per session and only moves forward. Once every
    /// transfer of the batch has ended the progress clears. A failure becomes
    /// the pending error.
    pub fn observe(&mut self, event: &TransferEvent) {
        let entry = self
            .transfers
            .entry(event.session_id())
            .or_insert(TransferProgress {
                percent: 0,
                finished: false,
            });
        match event {
            TransferEvent::Progress { percent, .. } => {
                if !entry.finished {
                    entry.percent = entry.percent.max((*percent).min(100));
                }
            }
            TransferEvent::Succeeded { .. } => {
                *entry = TransferProgress {
                    percent: 100,
                    finished: true,
                };
            }
            TransferEvent::Failed { error, .. } => {
                *entry = TransferProgress {
                    percent: 100,
                    finished: true,
                };
                self.error = Some(error.clone());
            }
        }
        if self.transfers.values().all(|transfer| transfer.finished) {
            self.transfers.clear();
        }
    }
}
