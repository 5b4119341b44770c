//! # Coursework Model
//!
//! This crate provides the read-only coursework domain model consumed by
//! the `coursework-ability` authorization engine.
//!
//! ## Overview
//!
//! The coursework-model crate handles:
//! - **Coursework**: Deadlines, feature switches and per-allocatable records
//! - **Stages**: Initial assessor stages, the agreed grade, moderation
//! - **Submissions**: Lifecycle state, feedback, allocations, sampling
//! - **Feedback & Moderation**: Marks per stage and moderator agreement
//! - **Allocations**: Which assessor marks which allocatable at which stage
//! - **Extensions & Personal Deadlines**: Per-allocatable deadline changes
//! - **Plagiarism Flags**: Investigation status that can hold back grades
//! - **Grading Table Rows**: The marker-facing table
//!
//! ## Architecture
//!
//! ```text
//! Coursework
//!   ├─ MarkingSettings (stages, allocation, sampling, moderation)
//!   ├─ Records per allocatable (submission, extension, personal deadline)
//!   └─ Submission ─→ Allocatable (User | Group)
//!         ├─ FeedbackSummary per stage
//!         ├─ StageAssignment per allocated marker
//!         └─ PlagiarismStatus
//! ```
//!
//! Relations are `Arc` snapshots: nothing here talks to a database, and
//! nothing is mutated by the authorization engine.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use uuid::Uuid;
//! use coursework_model::{Actor, Allocatable, Coursework, Submission};
//!
//! let coursework = Arc::new(Coursework::new("Essay 1", Uuid::now_v7()));
//! let student = Actor::new(Uuid::now_v7(), "Student");
//! let submission = Submission::new(coursework, Allocatable::User(student.id), student.id);
//! assert!(submission.belongs_to(&student));
//! ```

pub mod allocatable;
pub mod allocation;
pub mod coursework;
pub mod extension;
pub mod feedback;
pub mod grading;
pub mod plagiarism;
pub mod settings;
pub mod stage;
pub mod submission;

// Re-export main types for convenience
pub use allocatable::{Actor, Allocatable, AllocatableKey, Group};
pub use allocation::{Allocation, StageAssignment};
pub use coursework::{AllocatableRecord, Coursework};
pub use extension::{DeadlineExtension, PersonalDeadline};
pub use feedback::{Feedback, FeedbackSummary, Moderation, ModerationAgreement};
pub use grading::{GradingTableRow, RowMode};
pub use plagiarism::{PlagiarismFlag, PlagiarismStatus};
pub use settings::MarkingSettings;
pub use stage::Stage;
pub use submission::{GroupSubmission, Submission, SubmissionState};
