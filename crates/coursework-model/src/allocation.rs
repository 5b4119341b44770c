//! Marker allocation models
//!
//! Allocations assign an assessor to a stage for an allocatable. Submissions
//! and grading table rows carry lightweight `StageAssignment` snapshots; the
//! `Allocation` entity is what gets created and edited.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::allocatable::{Actor, Allocatable};
use crate::coursework::Coursework;
use crate::stage::Stage;

/// Snapshot of one marker allocated to one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StageAssignment {
    /// Stage the assessor marks
    pub stage: Stage,

    /// Allocated assessor
    pub assessor_id: Uuid,
}

impl StageAssignment {
    /// Creates a new stage assignment.
    pub fn new(stage: Stage, assessor_id: Uuid) -> Self {
        Self { stage, assessor_id }
    }
}

/// Allocation of an assessor to a stage for an allocatable.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use uuid::Uuid;
/// use coursework_model::{Actor, Allocatable, Allocation, Coursework, Stage};
///
/// let coursework = Arc::new(Coursework::new("Essay", Uuid::now_v7()));
/// let marker = Actor::new(Uuid::now_v7(), "Marker");
/// let allocation = Allocation::new(
///     coursework,
///     Allocatable::User(Uuid::now_v7()),
///     Stage::Assessor(1),
///     marker.id,
/// );
/// assert!(allocation.is_assessor(&marker));
/// assert!(!allocation.persisted());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    /// Allocation ID (None until saved)
    pub id: Option<Uuid>,

    /// Coursework the allocation belongs to
    pub coursework: Arc<Coursework>,

    /// Who is being marked
    pub allocatable: Allocatable,

    /// Stage the assessor marks
    pub stage: Stage,

    /// Allocated assessor
    pub assessor_id: Uuid,

    /// Pinned allocations survive automatic reallocation
    #[serde(default)]
    pub pinned: bool,

    /// Feedback already exists for this stage and allocatable
    #[serde(default)]
    pub marking_started: bool,

    /// When the allocation was made
    pub created_at: DateTime<Utc>,
}

impl Allocation {
    /// Creates a new unsaved allocation.
    pub fn new(coursework: Arc<Coursework>, allocatable: Allocatable, stage: Stage, assessor_id: Uuid) -> Self {
        Self {
            id: None,
            coursework,
            allocatable,
            stage,
            assessor_id,
            pinned: false,
            marking_started: false,
            created_at: Utc::now(),
        }
    }

    /// Check if the allocation has been saved.
    pub fn persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Check if the actor is the allocated assessor.
    pub fn is_assessor(&self, actor: &Actor) -> bool {
        self.assessor_id == actor.id
    }

    /// Snapshot of this allocation.
    pub fn assignment(&self) -> StageAssignment {
        StageAssignment::new(self.stage, self.assessor_id)
    }
}
