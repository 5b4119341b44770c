//! Feedback and moderation models
//!
//! Feedback is one assessor's mark and comments at one stage of a
//! submission. A moderation records a moderator's agreement or disagreement
//! with a finalised piece of feedback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::allocatable::Actor;
use crate::coursework::Coursework;
use crate::stage::Stage;
use crate::submission::{Submission, SubmissionState};

/// Snapshot of feedback already given on a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSummary {
    /// Stage the feedback was given at
    pub stage: Stage,

    /// Who gave it
    pub assessor_id: Uuid,

    /// The mark is final for this stage
    #[serde(default)]
    pub finalised: bool,

    /// When it was created
    pub created_at: DateTime<Utc>,
}

/// An assessor's feedback at one stage of a submission.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use uuid::Uuid;
/// use coursework_model::{Actor, Allocatable, Coursework, Feedback, Stage, Submission};
///
/// let coursework = Arc::new(Coursework::new("Essay", Uuid::now_v7()));
/// let marker = Actor::new(Uuid::now_v7(), "Marker");
/// let student = Uuid::now_v7();
/// let submission = Arc::new(Submission::new(coursework, Allocatable::User(student), student));
///
/// let feedback = Feedback::new(submission, Stage::Assessor(1), marker.id);
/// assert!(feedback.is_initial());
/// assert!(feedback.authored_by(&marker));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    /// Feedback ID (None until saved)
    pub id: Option<Uuid>,

    /// The submission marked
    pub submission: Arc<Submission>,

    /// Stage the feedback is for
    pub stage: Stage,

    /// Who gave it
    pub assessor_id: Uuid,

    /// Mark awarded
    pub grade: Option<f64>,

    /// Feedback comment
    pub comment: Option<String>,

    /// The mark is final for this stage (otherwise a draft)
    #[serde(default)]
    pub finalised: bool,

    /// A moderation exists for this feedback
    #[serde(default)]
    pub has_moderation: bool,

    /// When it was created
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    /// Creates a new unsaved draft.
    pub fn new(submission: Arc<Submission>, stage: Stage, assessor_id: Uuid) -> Self {
        Self {
            id: None,
            submission,
            stage,
            assessor_id,
            grade: None,
            comment: None,
            finalised: false,
            has_moderation: false,
            created_at: Utc::now(),
        }
    }

    /// Check if the feedback has been saved.
    pub fn persisted(&self) -> bool {
        self.id.is_some()
    }

    /// The coursework of the marked submission.
    pub fn coursework(&self) -> &Coursework {
        &self.submission.coursework
    }

    /// Check if this is an initial assessor's feedback.
    pub fn is_initial(&self) -> bool {
        self.stage.is_initial()
    }

    /// Check if this is the agreed grade.
    pub fn is_agreed(&self) -> bool {
        self.stage.is_agreed()
    }

    /// Check if the actor wrote this feedback.
    pub fn authored_by(&self, actor: &Actor) -> bool {
        self.assessor_id == actor.id
    }

    /// Check if the marked submission has been released to the student.
    pub fn is_published(&self) -> bool {
        self.submission.state == SubmissionState::Published
    }

    /// Seconds since the feedback was created.
    pub fn age_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_seconds()
    }
}

/// Outcome of a moderation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAgreement {
    /// The moderator agrees with the mark
    Agreed,
    /// The moderator disputes the mark
    Disagreed,
}

/// A moderator's verdict on a finalised piece of feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Moderation {
    /// Moderation ID (None until saved)
    pub id: Option<Uuid>,

    /// The moderated feedback
    pub feedback: Arc<Feedback>,

    /// Who moderated
    pub moderator_id: Uuid,

    /// Agreement outcome
    pub agreement: ModerationAgreement,

    /// Moderator's comment
    pub comment: Option<String>,
}

impl Moderation {
    /// Creates a new unsaved moderation.
    pub fn new(feedback: Arc<Feedback>, moderator_id: Uuid, agreement: ModerationAgreement) -> Self {
        Self {
            id: None,
            feedback,
            moderator_id,
            agreement,
            comment: None,
        }
    }

    /// Check if the moderation has been saved.
    pub fn persisted(&self) -> bool {
        self.id.is_some()
    }

    /// The submission the moderated feedback is on.
    pub fn submission(&self) -> &Submission {
        &self.feedback.submission
    }

    /// Check if the actor is the moderator.
    pub fn moderated_by(&self, actor: &Actor) -> bool {
        self.moderator_id == actor.id
    }
}
