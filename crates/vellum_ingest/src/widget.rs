//! The media widget: validation, transfers, URL links, and the registry in one place.

use futures::future::join_all;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};
use vellum_config::VellumConfig;
use vellum_core::{AcceptPolicy, CanonicalUrl, ExternalMedia, MediaReference};
use vellum_error::{IngestError, IngestResult, VellumResult};
use vellum_transfer::{LocalFile, TransferEvent, TransferManager, TransferOutcome};

use crate::{
    InputMode, MediaAttachedObserver, ModeController, ReferenceRegistry, classify, validate,
    validate_url,
};

/// Capability flags fixed for the widget's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetOptions {
    /// Offer the URL input mode
    pub allow_external_url: bool,
    /// Accept several files per submission
    pub multiple: bool,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            allow_external_url: true,
            multiple: false,
        }
    }
}

/// One widget instance.
///
/// The registry is shared behind a mutex that is never held across an
/// await, so concurrent transfers can complete in any order.
#[derive(Debug)]
pub struct MediaWidget {
    options: WidgetOptions,
    policy: AcceptPolicy,
    manager: TransferManager,
    controller: ModeController,
    registry: Arc<Mutex<ReferenceRegistry>>,
}

impl MediaWidget {
    /// Creates a widget in `LocalUpload` mode with an empty registry.
    pub fn new(options: WidgetOptions, policy: AcceptPolicy, manager: TransferManager) -> Self {
        Self {
            options,
            policy,
            manager,
            controller: ModeController::new(options.allow_external_url),
            registry: Arc::new(Mutex::new(ReferenceRegistry::new())),
        }
    }

    /// Builds the widget, transfer manager, and policy from configuration.
    pub fn from_config(config: &VellumConfig) -> VellumResult<Self> {
        let options = WidgetOptions {
            allow_external_url: config.widget.allow_external_url,
            multiple: config.widget.multiple,
        };
        Ok(Self::new(
            options,
            config.widget.accept_policy(),
            TransferManager::from_config(config)?,
        ))
    }

    /// Notifies `observer` of every attached reference.
    pub fn with_observer(self, observer: Arc<dyn MediaAttachedObserver>) -> Self {
        self.lock_registry().set_observer(observer);
        self
    }

    fn lock_registry(&self) -> MutexGuard<'_, ReferenceRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Capability flags.
    pub fn options(&self) -> WidgetOptions {
        self.options
    }

    /// Accept policy.
    pub fn policy(&self) -> &AcceptPolicy {
        &self.policy
    }

    /// Current input mode.
    pub fn mode(&self) -> InputMode {
        self.controller.mode()
    }

    /// Mode and transient state.
    pub fn controller(&self) -> &ModeController {
        &self.controller
    }

    /// Shared handle to the registry.
    pub fn registry(&self) -> Arc<Mutex<ReferenceRegistry>> {
        Arc::clone(&self.registry)
    }

    /// Snapshot of the attached references.
    pub fn references(&self) -> Vec<MediaReference> {
        self.lock_registry().entries().to_vec()
    }

    /// Pending error.
    pub fn error(&self) -> Option<&IngestError> {
        self.controller.error()
    }

    /// Clears and returns the pending error.
    pub fn dismiss_error(&mut self) -> Option<IngestError> {
        self.controller.dismiss_error()
    }

    /// Combined percentage of the running transfers.
    pub fn progress(&self) -> Option<u8> {
        self.controller.progress()
    }

    /// Switches input mode. Returns `false` when URL mode is disabled.
    pub fn toggle_mode(&mut self) -> bool {
        self.controller.toggle()
    }

    /// Removes the entry at `index` without notifying the observer.
    pub fn remove(&self, index: usize) -> Option<MediaReference> {
        self.lock_registry().remove(index)
    }

    /// Validates and sends picked or dropped files.
    ///
    /// Only the first file is taken unless the widget accepts several. Every
    /// file is validated before any transfer starts; accepted files are sent
    /// concurrently and each success is added to the registry. Results are
    /// returned in input order and the last failure becomes the pending error.
    ///
    /// # Errors
    ///
    /// `ModeMismatch` outside `LocalUpload` mode.
    #[instrument(skip(self, files), fields(count = files.len(), multiple = self.options.multiple))]
    pub async fn submit_files(
        &mut self,
        mut files: Vec<LocalFile>,
    ) -> IngestResult<Vec<IngestResult<MediaReference>>> {
        self.controller.require(InputMode::LocalUpload)?;

        if !self.options.multiple && files.len() > 1 {
            warn!(dropped = files.len() - 1, "Single-file widget, ignoring extra files");
            files.truncate(1);
        }

        let checked: Vec<IngestResult<LocalFile>> = files
            .into_iter()
            .map(|file| validate(&file.candidate(), &self.policy).map(|()| file))
            .collect();

        let (tx, mut rx) = mpsc::unbounded_channel::<TransferEvent>();
        let mut results: Vec<Option<IngestResult<MediaReference>>> = Vec::with_capacity(checked.len());
        let mut transfers = Vec::new();

        for (index, checked) in checked.into_iter().enumerate() {
            match checked {
                Ok(file) => {
                    results.push(None);
                    let manager = &self.manager;
                    let registry = Arc::clone(&self.registry);
                    let events = tx.clone();
                    transfers.push(async move {
                        let outcome = manager.upload(file, Some(events)).await;
                        if let TransferOutcome::Succeeded(reference) = &outcome {
                            let attached = registry
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .insert(reference.clone());
                            attached.notify();
                        }
                        (index, outcome)
                    });
                }
                Err(error) => {
                    warn!(error = %error, "Candidate rejected");
                    results.push(Some(Err(error)));
                }
            }
        }
        drop(tx);

        let controller = &mut self.controller;
        let all = join_all(transfers);
        tokio::pin!(all);
        let outcomes = loop {
            tokio::select! {
                outcomes = &mut all => break outcomes,
                Some(event) = rx.recv() => controller.observe(&event),
            }
        };
        while let Ok(event) = rx.try_recv() {
            controller.observe(&event);
        }

        for (index, outcome) in outcomes {
            results[index] = Some(outcome.into_result());
        }

        let results: Vec<IngestResult<MediaReference>> = results.into_iter().flatten().collect();
        if let Some(Err(error)) = results.iter().rev().find(|result| result.is_err()) {
            self.controller.set_error(error.clone());
        }
        Ok(results)
    }

    /// Replaces the URL text. Only valid in `ExternalUrl` mode.
    pub fn set_url_draft(&mut self, text: impl Into<String>) -> IngestResult<()> {
        self.controller.set_url_draft(text)
    }

    /// Validates, normalizes, and attaches the URL draft.
    ///
    /// On success the draft and any pending error are cleared. On failure the
    /// draft is kept and nothing is attached.
    ///
    /// # Errors
    ///
    /// `ModeMismatch` outside `ExternalUrl` mode, `InvalidUrl` for malformed input.
    #[instrument(skip(self), fields(draft = %self.controller.url_draft()))]
    pub fn submit_url(&mut self) -> IngestResult<MediaReference> {
        self.controller.require(InputMode::ExternalUrl)?;

        let reference = match self.link(self.controller.url_draft()) {
            Ok(reference) => reference,
            Err(error) => {
                warn!(error = %error, "URL rejected");
                self.controller.set_error(error.clone());
                return Err(error);
            }
        };

        let attached = self.lock_registry().insert(reference.clone());
        attached.notify();
        self.controller.clear_url_draft();
        self.controller.dismiss_error();
        info!(url = %reference.canonical_url(), "External link attached");
        Ok(reference)
    }

    fn link(&self, raw: &str) -> IngestResult<MediaReference> {
        let valid = validate_url(raw)?;
        let normalized = classify(&valid);
        let canonical_url = CanonicalUrl::parse(&normalized.url)?;
        Ok(ExternalMedia::new(normalized.provider, canonical_url).into())
    }
}
