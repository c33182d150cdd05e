//! Transfer events and the progress sink handed to transports.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;
use uuid::Uuid;
use vellum_core::{MediaReference, UploadSession};
use vellum_error::{IngestError, IngestResult};

/// Something observable that happened during a transfer.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum TransferEvent {
    /// Percentage sent increased
    #[display("{} progress {}%", session_id, percent)]
    Progress {
        /// Transfer the event belongs to
        session_id: Uuid,
        /// New percentage, 0..=100
        percent: u8,
    },
    /// Server accepted the file
    #[display("{} succeeded", session_id)]
    Succeeded {
        /// Transfer the event belongs to
        session_id: Uuid,
        /// Reference built from the server response
        reference: MediaReference,
    },
    /// Transfer ended with an error
    #[display("{} failed: {}", session_id, error)]
    Failed {
        /// Transfer the event belongs to
        session_id: Uuid,
        /// Why it failed
        error: IngestError,
    },
}

impl TransferEvent {
    /// Transfer the event belongs to.
    pub fn session_id(&self) -> Uuid {
        match self {
            TransferEvent::Progress { session_id, .. }
            | TransferEvent::Succeeded { session_id, .. }
            | TransferEvent::Failed { session_id, .. } => *session_id,
        }
    }

    /// Whether no further events follow for this transfer.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransferEvent::Progress { .. })
    }
}

/// Final result of one transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Reference to the stored file
    Succeeded(MediaReference),
    /// Why the transfer failed
    Failed(IngestError),
}

impl TransferOutcome {
    /// Converts into a `Result`.
    pub fn into_result(self) -> IngestResult<MediaReference> {
        match self {
            TransferOutcome::Succeeded(reference) => Ok(reference),
            TransferOutcome::Failed(error) => Err(error),
        }
    }

    /// Whether the transfer succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Succeeded(_))
    }
}

/// Records progress on an [`UploadSession`] and forwards events to an optional listener.
///
/// Cloning shares the session. Events are dropped silently once the
/// listener goes away.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    session: Arc<Mutex<UploadSession>>,
    events: Option<UnboundedSender<TransferEvent>>,
}

impl ProgressReporter {
    /// Wraps a session.
    pub fn new(session: UploadSession, events: Option<UnboundedSender<TransferEvent>>) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            events,
        }
    }

    /// A reporter with no listener, for driving a transport directly.
    pub fn detached(file_name: impl Into<String>) -> Self {
        Self::new(UploadSession::new(file_name), None)
    }

    fn lock(&self) -> MutexGuard<'_, UploadSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Identifier of the underlying session.
    pub fn session_id(&self) -> Uuid {
        *self.lock().id()
    }

    /// Copy of the current session state.
    pub fn snapshot(&self) -> UploadSession {
        self.lock().clone()
    }

    /// Reports `sent` bytes out of `total`. Emits only when the percentage rises.
    pub fn report(&self, sent: u64, total: Option<u64>) {
        let advanced = {
            let mut session = self.lock();
            session.advance(sent, total).map(|percent| (*session.id(), percent))
        };
        if let Some((session_id, percent)) = advanced {
            trace!(session = %session_id, percent, "Transfer progress");
            self.emit(TransferEvent::Progress {
                session_id,
                percent,
            });
        }
    }

    pub(crate) fn start(&self) {
        let started = {
            let mut session = self.lock();
            session.start().then(|| *session.id())
        };
        if let Some(session_id) = started {
            self.emit(TransferEvent::Progress {
                session_id,
                percent: 0,
            });
        }
    }

    pub(crate) fn succeed(&self, reference: &MediaReference) {
        let finished = {
            let mut session = self.lock();
            session.succeed().then(|| *session.id())
        };
        if let Some(session_id) = finished {
            self.emit(TransferEvent::Succeeded {
                session_id,
                reference: reference.clone(),
            });
        }
    }

    pub(crate) fn fail(&self, error: &IngestError) {
        let finished = {
            let mut session = self.lock();
            session.fail().then(|| *session.id())
        };
        if let Some(session_id) = finished {
            self.emit(TransferEvent::Failed {
                session_id,
                error: error.clone(),
            });
        }
    }

    fn emit(&self, event: TransferEvent) {
        if let Some(events) = &self.events {
            // A closed channel means nobody is listening anymore.
            let _ = events.send(event);
        }
    }
}
