//! Notification of the owning context when media is attached.

use vellum_core::{CanonicalUrl, MediaReference};

/// Receives every reference added to a [`crate::ReferenceRegistry`].
pub trait MediaAttachedObserver: Send + Sync {
    /// Called exactly once per added reference.
    fn on_media_attached(&self, canonical_url: &CanonicalUrl, reference: &MediaReference);
}

impl<F> MediaAttachedObserver for F
where
    F: Fn(&CanonicalUrl, &MediaReference) + Send + Sync,
{
    fn on_media_attached(&self, canonical_url: &CanonicalUrl, reference: &MediaReference) {
        self(canonical_url, reference)
    }
}
