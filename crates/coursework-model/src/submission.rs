//! Submission domain models
//!
//! This module provides the Submission entity, its lifecycle state and the
//! group-aware decorator hosts use when presenting a group's submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;
use uuid::Uuid;

use crate::allocatable::{Actor, Allocatable, Group};
use crate::allocation::StageAssignment;
use crate::coursework::Coursework;
use crate::feedback::FeedbackSummary;
use crate::plagiarism::PlagiarismStatus;
use crate::stage::Stage;

/// Lifecycle of a submission.
///
/// States only move forward. The order is significant: rules ask whether a
/// submission is "at least this far along" with `>=`.
///
/// `New < Submitted < PartiallyGraded < FullyGraded < Finalised < Published`
///
/// # Examples
///
/// ```
/// use coursework_model::SubmissionState;
///
/// assert!(SubmissionState::Finalised >= SubmissionState::PartiallyGraded);
/// assert!(SubmissionState::Published.is_terminal());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    /// Not yet saved
    New = 0,

    /// Files uploaded, still a draft
    Submitted = 1,

    /// Some but not all marks are in
    PartiallyGraded = 2,

    /// All marks for the required stages are in
    FullyGraded = 3,

    /// Locked; no further changes by the student
    Finalised = 4,

    /// Grades released to the student
    Published = 5,
}

impl SubmissionState {
    /// Get string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Submitted => "submitted",
            Self::PartiallyGraded => "partially_graded",
            Self::FullyGraded => "fully_graded",
            Self::Finalised => "finalised",
            Self::Published => "published",
        }
    }

    /// Check if this is the terminal state.
    pub fn is_terminal(&self) -> bool {
        *self == Self::Published
    }
}

impl Default for SubmissionState {
    fn default() -> Self {
        Self::New
    }
}

/// A student's (or group's) submission to a coursework.
///
/// The submission carries read-only snapshots of its relations (existing
/// feedback, stage allocations, sampling) so authorization rules can query
/// them without a database.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use uuid::Uuid;
/// use coursework_model::{Actor, Allocatable, Coursework, Submission, SubmissionState};
///
/// let coursework = Arc::new(Coursework::new("Essay", Uuid::now_v7()));
/// let student = Actor::new(Uuid::now_v7(), "Student");
///
/// let submission = Submission::new(coursework, Allocatable::User(student.id), student.id);
/// assert!(!submission.persisted());
/// assert!(submission.belongs_to(&student));
/// assert_eq!(submission.state, SubmissionState::New);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Submission ID (None until saved)
    pub id: Option<Uuid>,

    /// The coursework this submission belongs to
    pub coursework: Arc<Coursework>,

    /// Who the submission is for
    pub allocatable: Allocatable,

    /// Who created the submission (may be staff submitting on behalf)
    pub created_by: Uuid,

    /// Lifecycle state
    #[serde(default)]
    pub state: SubmissionState,

    /// Files are attached
    #[serde(default)]
    pub has_files: bool,

    /// Existing feedback, one per stage
    #[serde(default)]
    pub feedbacks: Vec<FeedbackSummary>,

    /// Markers allocated to this submission's allocatable
    #[serde(default)]
    pub allocations: Vec<StageAssignment>,

    /// Later stages this submission was sampled into
    #[serde(default)]
    pub sampled_stages: Vec<Stage>,

    /// Plagiarism flag status, if flagged
    pub plagiarism: Option<PlagiarismStatus>,

    /// When the submission was last changed
    pub updated_at: DateTime<Utc>,
}

impl Submission {
    /// Creates a new unsaved submission.
    ///
    /// # Arguments
    ///
    /// * `coursework` - The coursework submitted to
    /// * `allocatable` - Who the submission is for
    /// * `created_by` - Who is creating it
    pub fn new(coursework: Arc<Coursework>, allocatable: Allocatable, created_by: Uuid) -> Self {
        Self {
            id: None,
            coursework,
            allocatable,
            created_by,
            state: SubmissionState::New,
            has_files: false,
            feedbacks: Vec::new(),
            allocations: Vec::new(),
            sampled_stages: Vec::new(),
            plagiarism: None,
            updated_at: Utc::now(),
        }
    }

    /// Check if the submission has been saved.
    pub fn persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Check if the submission belongs to the actor (directly or via a group).
    pub fn belongs_to(&self, actor: &Actor) -> bool {
        self.allocatable.includes(actor.id)
    }

    /// Get the feedback given at a stage, if any.
    pub fn feedback_for(&self, stage: Stage) -> Option<&FeedbackSummary> {
        self.feedbacks.iter().find(|f| f.stage == stage)
    }

    /// Check if any feedback exists.
    pub fn has_feedback(&self) -> bool {
        !self.feedbacks.is_empty()
    }

    /// Check if an agreed grade exists.
    pub fn has_final_feedback(&self) -> bool {
        self.feedback_for(Stage::FinalAgreed).is_some()
    }

    /// Check if the submission is in the sample for a stage.
    ///
    /// The first assessor stage always marks everything; later stages only
    /// mark sampled submissions when sampling is enabled.
    pub fn in_sample(&self, stage: Stage) -> bool {
        if !self.coursework.marking.sampling_enabled || stage == Stage::Assessor(1) {
            return true;
        }
        !stage.is_initial() || self.sampled_stages.contains(&stage)
    }

    /// Initial stages this submission has to be marked at.
    pub fn required_initial_stages(&self) -> Vec<Stage> {
        self.coursework
            .marking
            .initial_stages()
            .into_iter()
            .filter(|stage| self.in_sample(*stage))
            .collect()
    }

    /// Check if every required initial stage has finalised feedback.
    pub fn initial_feedback_complete(&self) -> bool {
        self.required_initial_stages().iter().all(|stage| {
            self.feedback_for(*stage)
                .map_or(false, |feedback| feedback.finalised)
        })
    }

    /// Check if the actor is allocated to a stage of this submission.
    pub fn is_allocated(&self, actor: &Actor, stage: Stage) -> bool {
        self.allocations
            .iter()
            .any(|a| a.stage == stage && a.assessor_id == actor.id)
    }

    /// Check if the actor is allocated to any stage of this submission.
    pub fn is_allocated_to_any_stage(&self, actor: &Actor) -> bool {
        self.allocations.iter().any(|a| a.assessor_id == actor.id)
    }

    /// Check if the actor already marked an initial stage other than `stage`.
    pub fn has_marked_other_initial_stage(&self, actor: &Actor, stage: Stage) -> bool {
        self.feedbacks
            .iter()
            .any(|f| f.stage.is_initial() && f.stage != stage && f.assessor_id == actor.id)
    }

    /// Check if the actor gave one of the initial marks.
    pub fn is_initial_assessor(&self, actor: &Actor) -> bool {
        self.feedbacks
            .iter()
            .any(|f| f.stage.is_initial() && f.assessor_id == actor.id)
    }

    /// Check if a plagiarism flag stops grades from being released.
    pub fn release_blocked_by_plagiarism(&self) -> bool {
        self.plagiarism.map_or(false, |status| status.blocks_release())
    }

    /// Check if a plagiarism investigation is still open.
    pub fn under_plagiarism_investigation(&self) -> bool {
        self.plagiarism == Some(PlagiarismStatus::Investigation)
    }
}

/// Group-aware view of a submission.
///
/// Hosts wrap a group's submission in this decorator when presenting it; it
/// forwards everything to the underlying submission and adds group helpers.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use uuid::Uuid;
/// use coursework_model::{Allocatable, Coursework, Group, GroupSubmission, Submission};
///
/// let member = Uuid::now_v7();
/// let coursework = Arc::new(Coursework::new("Group project", Uuid::now_v7()));
/// let group = Group::new("Team 1", vec![member]);
/// let submission = Submission::new(coursework, Allocatable::Group(group), member);
///
/// let wrapped = GroupSubmission::new(Arc::new(submission));
/// assert_eq!(wrapped.group().map(|g| g.name.as_str()), Some("Team 1"));
/// assert!(wrapped.allocatable.includes(member));
/// ```
#[derive(Debug, Clone)]
pub struct GroupSubmission {
    inner: Arc<Submission>,
}

impl GroupSubmission {
    /// Wrap a submission.
    pub fn new(inner: Arc<Submission>) -> Self {
        Self { inner }
    }

    /// The wrapped submission.
    pub fn submission(&self) -> &Submission {
        &self.inner
    }

    /// The group the submission belongs to, if it is a group submission.
    pub fn group(&self) -> Option<&Group> {
        match &self.inner.allocatable {
            Allocatable::Group(group) => Some(group),
            Allocatable::User(_) => None,
        }
    }

    /// Member user IDs (the single student for individual submissions).
    pub fn member_ids(&self) -> Vec<Uuid> {
        match &self.inner.allocatable {
            Allocatable::Group(group) => group.members.clone(),
            Allocatable::User(id) => vec![*id],
        }
    }
}

impl Deref for GroupSubmission {
    type Target = Submission;

    fn deref(&self) -> &Submission {
        &self.inner
    }
}
