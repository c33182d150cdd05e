//! Ordered collection of attached media.

use std::sync::Arc;
use tracing::{debug, info};
use vellum_core::MediaReference;

use crate::MediaAttachedObserver;

/// References attached by the widget, in the order they were added.
///
/// Adding notifies the observer; removing does not.
#[derive(Default)]
pub struct ReferenceRegistry {
    entries: Vec<MediaReference>,
    observer: Option<Arc<dyn MediaAttachedObserver>>,
}

impl std::fmt::Debug for ReferenceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceRegistry")
            .field("entries", &self.entries)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl ReferenceRegistry {
    /// An empty registry without an observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty registry notifying `observer`.
    pub fn with_observer(observer: Arc<dyn MediaAttachedObserver>) -> Self {
        Self {
            entries: Vec::new(),
            observer: Some(observer),
        }
    }

    /// Replaces the observer.
    pub fn set_observer(&mut self, observer: Arc<dyn MediaAttachedObserver>) {
        self.observer = Some(observer);
    }

    /// Appends a reference and notifies the observer.
    ///
    /// Duplicates are kept. Callers sharing the registry behind a lock should
    /// use [`ReferenceRegistry::insert`] and notify after releasing it.
    pub fn add(&mut self, reference: MediaReference) {
        self.insert(reference).notify();
    }

    /// Appends a reference and returns the notification still owed for it.
    pub fn insert(&mut self, reference: MediaReference) -> Attached {
        info!(
            kind = %reference.source_kind(),
            url = %reference.canonical_url(),
            "Media attached"
        );
        self.entries.push(reference.clone());
        Attached {
            reference,
            observer: self.observer.clone(),
        }
    }

    /// Removes the entry at `index`, keeping the others in order.
    ///
    /// Returns `None` for an out-of-range index.
    pub fn remove(&mut self, index: usize) -> Option<MediaReference> {
        if index >= self.entries.len() {
            debug!(index, len = self.entries.len(), "Ignoring out-of-range removal");
            return None;
        }
        let removed = self.entries.remove(index);
        debug!(index, url = %removed.canonical_url(), "Media removed");
        Some(removed)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[MediaReference] {
        &self.entries
    }

    /// Entry at `index`.
    pub fn get(&self, index: usize) -> Option<&MediaReference> {
        self.entries.get(index)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A reference already in the registry whose observer has not been told yet.
#[must_use = "the observer is only notified by `notify`"]
pub struct Attached {
    reference: MediaReference,
    observer: Option<Arc<dyn MediaAttachedObserver>>,
}

impl std::fmt::Debug for Attached {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attached")
            .field("reference", &self.reference)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl Attached {
    /// The reference that was appended.
    pub fn reference(&self) -> &MediaReference {
        &self.reference
    }

    /// Notifies the observer, if any, and hands back the reference.
    pub fn notify(self) -> MediaReference {
        if let Some(observer) = &self.observer {
            observer.on_media_attached(self.reference.canonical_url(), &self.reference);
        }
        self.reference
    }
}
