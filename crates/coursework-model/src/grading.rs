//! Grading table rows
//!
//! One row of the marker-facing grading table: an allocatable, its
//! submission if there is one, and who is allocated to mark it.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::allocatable::{Actor, Allocatable};
use crate::allocation::StageAssignment;
use crate::coursework::Coursework;
use crate::submission::Submission;

/// Layout of the grading table a row belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RowMode {
    /// Single marking: one grade column
    Single,
    /// Multiple marking: one column per stage plus the agreed grade
    Multi,
}

/// A row of the grading table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingTableRow {
    /// Coursework the table is for
    pub coursework: Arc<Coursework>,

    /// Who the row is for
    pub allocatable: Allocatable,

    /// The allocatable's submission, if any
    pub submission: Option<Arc<Submission>>,

    /// Markers allocated to this allocatable
    #[serde(default)]
    pub allocations: Vec<StageAssignment>,

    /// Table layout
    pub mode: RowMode,
}

impl GradingTableRow {
    /// Creates a row, choosing the layout from the marking settings.
    pub fn new(coursework: Arc<Coursework>, allocatable: Allocatable) -> Self {
        let mode = if coursework.marking.has_multiple_markers() {
            RowMode::Multi
        } else {
            RowMode::Single
        };
        Self {
            coursework,
            allocatable,
            submission: None,
            allocations: Vec::new(),
            mode,
        }
    }

    /// Check if the actor is allocated to any stage for this row.
    pub fn is_allocated_to_any_stage(&self, actor: &Actor) -> bool {
        self.allocations.iter().any(|a| a.assessor_id == actor.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Stage;
    use uuid::Uuid;

    #[test]
    fn test_row_mode_follows_marking_settings() {
        let single = Arc::new(Coursework::new("Essay", Uuid::now_v7()));
        assert_eq!(GradingTableRow::new(single, Allocatable::User(Uuid::now_v7())).mode, RowMode::Single);

        let mut coursework = Coursework::new("Essay", Uuid::now_v7());
        coursework.marking.number_of_initial_assessors = 2;
        let row = GradingTableRow::new(Arc::new(coursework), Allocatable::User(Uuid::now_v7()));
        assert_eq!(row.mode, RowMode::Multi);
    }

    #[test]
    fn test_row_allocation() {
        let coursework = Arc::new(Coursework::new("Essay", Uuid::now_v7()));
        let marker = Actor::new(Uuid::now_v7(), "Marker");
        let mut row = GradingTableRow::new(coursework, Allocatable::User(Uuid::now_v7()));
        assert!(!row.is_allocated_to_any_stage(&marker));

        row.allocations.push(StageAssignment::new(Stage::Assessor(1), marker.id));
        assert!(row.is_allocated_to_any_stage(&marker));
    }
}
