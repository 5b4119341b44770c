//! Plagiarism flag models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::submission::Submission;

/// Status of a plagiarism flag.
///
/// # Examples
///
/// ```
/// use coursework_model::PlagiarismStatus;
///
/// assert!(PlagiarismStatus::Investigation.blocks_release());
/// assert!(!PlagiarismStatus::Cleared.blocks_release());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PlagiarismStatus {
    /// Under investigation; grades are held back
    Investigation,
    /// Investigation closed, grades released as they are
    Released,
    /// No plagiarism found
    Cleared,
    /// Plagiarism confirmed; grades are held back
    NotCleared,
}

impl PlagiarismStatus {
    /// Check if this status holds back the release of grades.
    pub fn blocks_release(&self) -> bool {
        matches!(self, Self::Investigation | Self::NotCleared)
    }

    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Investigation => "investigation",
            Self::Released => "released",
            Self::Cleared => "cleared",
            Self::NotCleared => "not_cleared",
        }
    }
}

/// A plagiarism flag raised on a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlagiarismFlag {
    /// Flag ID (None until saved)
    pub id: Option<Uuid>,

    /// The flagged submission
    pub submission: Arc<Submission>,

    /// Current status
    pub status: PlagiarismStatus,

    /// Investigator's comment
    pub comment: Option<String>,

    /// Who raised the flag
    pub created_by: Uuid,

    /// When the flag was raised
    pub created_at: DateTime<Utc>,
}

impl PlagiarismFlag {
    /// Creates a new unsaved flag under investigation.
    pub fn new(submission: Arc<Submission>, created_by: Uuid) -> Self {
        Self {
            id: None,
            submission,
            status: PlagiarismStatus::Investigation,
            comment: None,
            created_by,
            created_at: Utc::now(),
        }
    }

    /// Check if the flag has been saved.
    pub fn persisted(&self) -> bool {
        self.id.is_some()
    }
}
