//! Per-transfer upload session state.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Lifecycle of one transfer.
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
pub enum UploadStatus {
    /// Created, nothing sent yet
    #[default]
    #[display("idle")]
    Idle,
    /// Bytes are being sent
    #[display("in_progress")]
    InProgress,
    /// Server accepted the file
    #[display("succeeded")]
    Succeeded,
    /// Transfer ended with an error
    #[display("failed")]
    Failed,
}

impl UploadStatus {
    /// Terminal states never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, UploadStatus::Succeeded | UploadStatus::Failed)
    }
}

/// Percentage of `sent` over `total`, clamped to `0..=100`.
///
/// Unknown or zero totals report `0`.
///
/// # Examples
///
/// ```
/// use vellum_core::progress_percent;
///
/// assert_eq!(progress_percent(512, Some(1024)), 50);
/// assert_eq!(progress_percent(4096, Some(1024)), 100);
/// assert_eq!(progress_percent(4096, None), 0);
/// ```
pub fn progress_percent(sent: u64, total: Option<u64>) -> u8 {
    match total {
        Some(total) if total > 0 => {
            let percent = (u128::from(sent) * 100) / u128::from(total);
            percent.min(100) as u8
        }
        _ => 0,
    }
}

/// State of one in-flight transfer.
///
/// Owned by a single transfer invocation. Progress only moves forward and
/// terminal states are final; out-of-order calls are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct UploadSession {
    /// Session identifier
    id: Uuid,
    /// File being sent
    file_name: String,
    /// Last reported percentage
    progress_percent: u8,
    /// Current lifecycle state
    status: UploadStatus,
}

impl UploadSession {
    /// Creates an idle session for a file.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            progress_percent: 0,
            status: UploadStatus::Idle,
        }
    }

    /// `Idle -> InProgress`. Returns whether the transition happened.
    pub fn start(&mut self) -> bool {
        if self.status != UploadStatus::Idle {
            warn!(session = %self.id, status = %self.status, "Ignoring start of non-idle session");
            return false;
        }
        self.status = UploadStatus::InProgress;
        true
    }

    /// Records bytes sent and returns the new percentage when it increased.
    pub fn advance(&mut self, sent: u64, total: Option<u64>) -> Option<u8> {
        if self.status != UploadStatus::InProgress {
            return None;
        }
        let percent = progress_percent(sent, total);
        if percent > self.progress_percent {
            self.progress_percent = percent;
            Some(percent)
        } else {
            None
        }
    }

    /// `InProgress -> Succeeded`. Returns whether the transition happened.
    pub fn succeed(&mut self) -> bool {
        if self.status != UploadStatus::InProgress {
            warn!(session = %self.id, status = %self.status, "Ignoring success of inactive session");
            return false;
        }
        self.status = UploadStatus::Succeeded;
        self.progress_percent = 100;
        true
    }

    /// `InProgress -> Failed`. Returns whether the transition happened.
    pub fn fail(&mut self) -> bool {
        if self.status != UploadStatus::InProgress {
            warn!(session = %self.id, status = %self.status, "Ignoring failure of inactive session");
            return false;
        }
        self.status = UploadStatus::Failed;
        true
    }
}
