//! Coursework domain model
//!
//! This module provides the Coursework entity: the assignment students submit
//! to, its deadlines, the switches that enable extensions, personal deadlines
//! and plagiarism flagging, and a snapshot of per-allocatable records the
//! authorization rules consult (existing submissions, granted extensions and
//! personal deadlines).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::allocatable::Allocatable;
use crate::settings::MarkingSettings;

/// A coursework assignment.
///
/// # Architecture
///
/// ```text
/// Coursework
///   ├─ Deadlines (general, personal, extensions)
///   ├─ MarkingSettings (stages, allocation, sampling, moderation)
///   └─ Records per allocatable (submission exists, extension, personal deadline)
/// ```
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use uuid::Uuid;
/// use coursework_model::{Allocatable, Coursework};
///
/// let now = Utc::now();
/// let mut coursework = Coursework::new("Essay 1", Uuid::now_v7());
/// coursework.deadline = Some(now + Duration::days(7));
///
/// let student = Allocatable::User(Uuid::now_v7());
/// assert!(!coursework.deadline_has_passed_for(&student, now));
/// assert!(!coursework.has_submission_for(&student));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coursework {
    /// Unique identifier for the coursework
    pub id: Uuid,

    /// Capability context the coursework lives in (course module)
    pub context_id: Uuid,

    /// Human-readable name
    pub name: String,

    /// Submissions are not accepted before this date
    pub start_date: Option<DateTime<Utc>>,

    /// General submission deadline (None = no deadline)
    pub deadline: Option<DateTime<Utc>>,

    /// Students may still submit after the deadline
    #[serde(default)]
    pub allow_late_submissions: bool,

    /// Students may finalise before the deadline
    #[serde(default)]
    pub allow_early_finalisation: bool,

    /// Students submit as groups
    #[serde(default)]
    pub use_groups: bool,

    /// Individual deadline extensions may be granted
    #[serde(default)]
    pub extensions_enabled: bool,

    /// Individual personal deadlines replace the general deadline
    #[serde(default)]
    pub personal_deadlines_enabled: bool,

    /// Submissions may be flagged for plagiarism
    #[serde(default)]
    pub plagiarism_flagging_enabled: bool,

    /// Students may see plagiarism reports on their own submissions
    #[serde(default)]
    pub show_plagiarism_to_students: bool,

    /// Marking workflow settings
    #[serde(default)]
    pub marking: MarkingSettings,

    /// Snapshot of per-allocatable records, keyed by `AllocatableKey` string
    #[serde(default)]
    pub records: HashMap<String, AllocatableRecord>,

    /// When the coursework was created
    pub created_at: DateTime<Utc>,

    /// Custom metadata for extensibility
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// What is known about one allocatable within a coursework.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatableRecord {
    /// A submission already exists for this allocatable
    #[serde(default)]
    pub has_submission: bool,

    /// Extended deadline, if an extension was granted
    pub extended_deadline: Option<DateTime<Utc>>,

    /// Personal deadline, if one was set
    pub personal_deadline: Option<DateTime<Utc>>,
}

impl Coursework {
    /// Creates a new coursework with default settings.
    ///
    /// The coursework is created with:
    /// - A newly generated UUID v7 ID
    /// - No start date and no deadline
    /// - Single marking, no allocation, no sampling
    /// - Extensions, personal deadlines and plagiarism flagging switched off
    ///
    /// # Arguments
    ///
    /// * `name` - The coursework name
    /// * `context_id` - Capability context the coursework lives in
    pub fn new(name: impl Into<String>, context_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            context_id,
            name: name.into(),
            start_date: None,
            deadline: None,
            allow_late_submissions: false,
            allow_early_finalisation: false,
            use_groups: false,
            extensions_enabled: false,
            personal_deadlines_enabled: false,
            plagiarism_flagging_enabled: false,
            show_plagiarism_to_students: false,
            marking: MarkingSettings::default(),
            records: HashMap::new(),
            created_at: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Check if the coursework has a general deadline.
    pub fn has_deadline(&self) -> bool {
        self.deadline.is_some()
    }

    /// Check if the coursework accepts submissions yet.
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.start_date.map_or(true, |start| start <= now)
    }

    fn record(&self, allocatable: &Allocatable) -> Option<&AllocatableRecord> {
        self.records.get(&allocatable.key().to_string())
    }

    fn record_mut(&mut self, allocatable: &Allocatable) -> &mut AllocatableRecord {
        self.records
            .entry(allocatable.key().to_string())
            .or_default()
    }

    /// Get the deadline that applies to an allocatable.
    ///
    /// A personal deadline replaces the general one when personal deadlines
    /// are enabled and one was set.
    pub fn deadline_for(&self, allocatable: &Allocatable) -> Option<DateTime<Utc>> {
        if self.personal_deadlines_enabled {
            if let Some(personal) = self.personal_deadline_for(allocatable) {
                return Some(personal);
            }
        }
        self.deadline
    }

    /// Check if the deadline that applies to an allocatable has passed.
    ///
    /// Without any deadline this is always `false`.
    pub fn deadline_has_passed_for(&self, allocatable: &Allocatable, now: DateTime<Utc>) -> bool {
        self.deadline_for(allocatable)
            .map_or(false, |deadline| deadline < now)
    }

    /// Get the extended deadline granted to an allocatable, if any.
    pub fn extension_for(&self, allocatable: &Allocatable) -> Option<DateTime<Utc>> {
        self.record(allocatable).and_then(|r| r.extended_deadline)
    }

    /// Check if an allocatable holds an extension that has not run out.
    ///
    /// Extensions only count while extensions are enabled on the coursework.
    pub fn has_active_extension(&self, allocatable: &Allocatable, now: DateTime<Utc>) -> bool {
        self.extensions_enabled
            && self
                .extension_for(allocatable)
                .map_or(false, |extended| extended >= now)
    }

    /// Get the personal deadline set for an allocatable, if any.
    pub fn personal_deadline_for(&self, allocatable: &Allocatable) -> Option<DateTime<Utc>> {
        self.record(allocatable).and_then(|r| r.personal_deadline)
    }

    /// Check if a submission already exists for an allocatable.
    pub fn has_submission_for(&self, allocatable: &Allocatable) -> bool {
        self.record(allocatable).map_or(false, |r| r.has_submission)
    }

    /// Record that a submission exists for an allocatable.
    pub fn record_submission(&mut self, allocatable: &Allocatable) {
        self.record_mut(allocatable).has_submission = true;
    }

    /// Record an extension granted to an allocatable.
    pub fn record_extension(&mut self, allocatable: &Allocatable, extended_deadline: DateTime<Utc>) {
        self.record_mut(allocatable).extended_deadline = Some(extended_deadline);
    }

    /// Record a personal deadline set for an allocatable.
    pub fn record_personal_deadline(&mut self, allocatable: &Allocatable, deadline: DateTime<Utc>) {
        self.record_mut(allocatable).personal_deadline = Some(deadline);
    }
}
