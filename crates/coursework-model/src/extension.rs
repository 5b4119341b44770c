//! Deadline extension and personal deadline models
//!
//! Both adjust when an allocatable has to submit by. An extension pushes the
//! applicable deadline back; a personal deadline replaces the general one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::allocatable::{Actor, Allocatable};
use crate::coursework::Coursework;
use crate::submission::SubmissionState;

/// An extension to the deadline for one allocatable.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chrono::{Duration, Utc};
/// use uuid::Uuid;
/// use coursework_model::{Actor, Allocatable, Coursework, DeadlineExtension};
///
/// let coursework = Arc::new(Coursework::new("Essay", Uuid::now_v7()));
/// let student = Actor::new(Uuid::now_v7(), "Student");
/// let extension = DeadlineExtension::new(
///     coursework,
///     Allocatable::User(student.id),
///     Utc::now() + Duration::days(3),
/// );
/// assert!(extension.belongs_to(&student));
/// assert!(!extension.submission_finalised());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadlineExtension {
    /// Extension ID (None until saved)
    pub id: Option<Uuid>,

    /// Coursework the extension applies to
    pub coursework: Arc<Coursework>,

    /// Who the extension is for
    pub allocatable: Allocatable,

    /// New deadline
    pub extended_deadline: DateTime<Utc>,

    /// Reason given
    pub reason: Option<String>,

    /// State of the allocatable's submission, if one exists
    pub submission_state: Option<SubmissionState>,
}

impl DeadlineExtension {
    /// Creates a new unsaved extension.
    pub fn new(coursework: Arc<Coursework>, allocatable: Allocatable, extended_deadline: DateTime<Utc>) -> Self {
        Self {
            id: None,
            coursework,
            allocatable,
            extended_deadline,
            reason: None,
            submission_state: None,
        }
    }

    /// Check if the extension has been saved.
    pub fn persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Check if the extension is for the actor (directly or via a group).
    pub fn belongs_to(&self, actor: &Actor) -> bool {
        self.allocatable.includes(actor.id)
    }

    /// Check if the allocatable's submission is already finalised.
    pub fn submission_finalised(&self) -> bool {
        self.submission_state
            .map_or(false, |state| state >= SubmissionState::Finalised)
    }
}

/// A personal deadline replacing the general deadline for one allocatable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalDeadline {
    /// Personal deadline ID (None until saved)
    pub id: Option<Uuid>,

    /// Coursework the deadline applies to
    pub coursework: Arc<Coursework>,

    /// Who the deadline is for
    pub allocatable: Allocatable,

    /// The deadline
    pub deadline: DateTime<Utc>,

    /// State of the allocatable's submission, if one exists
    pub submission_state: Option<SubmissionState>,
}

impl PersonalDeadline {
    /// Creates a new unsaved personal deadline.
    pub fn new(coursework: Arc<Coursework>, allocatable: Allocatable, deadline: DateTime<Utc>) -> Self {
        Self {
            id: None,
            coursework,
            allocatable,
            deadline,
            submission_state: None,
        }
    }

    /// Check if the personal deadline has been saved.
    pub fn persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Check if the deadline is for the actor (directly or via a group).
    pub fn belongs_to(&self, actor: &Actor) -> bool {
        self.allocatable.includes(actor.id)
    }

    /// Check if the allocatable's submission is already finalised.
    pub fn submission_finalised(&self) -> bool {
        self.submission_state
            .map_or(false, |state| state >= SubmissionState::Finalised)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_finalised() {
        let coursework = Arc::new(Coursework::new("Essay", Uuid::now_v7()));
        let mut deadline = PersonalDeadline::new(coursework, Allocatable::User(Uuid::now_v7()), Utc::now());
        assert!(!deadline.submission_finalised());

        deadline.submission_state = Some(SubmissionState::FullyGraded);
        assert!(!deadline.submission_finalised());

        deadline.submission_state = Some(SubmissionState::Published);
        assert!(deadline.submission_finalised());
    }
}
