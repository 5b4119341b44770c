//! # Resource Types
//!
//! Defines the canonical resource kinds rules are registered against, and the
//! [`Resource`] trait every authorizable value implements.
//!
//! A resource reports a raw type tag. Decorators report their own tag and
//! hand out the value they wrap through [`Resource::delegate`]; the
//! [`TypeResolver`](crate::resolver::TypeResolver) walks that chain to find the
//! canonical kind.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

use coursework_model::{
    Allocation, DeadlineExtension, Feedback, GradingTableRow, GroupSubmission, Moderation,
    PersonalDeadline, PlagiarismFlag, RowMode, Submission,
};

/// Canonical resource kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A student's or group's submission.
    Submission,
    /// An assessor's feedback at one stage.
    Feedback,
    /// A moderator's agreement on feedback.
    Moderation,
    /// An assessor allocated to a stage.
    Allocation,
    /// An extension to an allocatable's deadline.
    DeadlineExtension,
    /// A plagiarism flag on a submission.
    PlagiarismFlag,
    /// A personal deadline for an allocatable.
    PersonalDeadline,
    /// A row of the grading table.
    GradingTableRow,
}

impl ResourceKind {
    /// Get the string representation of the resource kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Submission => "submission",
            ResourceKind::Feedback => "feedback",
            ResourceKind::Moderation => "moderation",
            ResourceKind::Allocation => "allocation",
            ResourceKind::DeadlineExtension => "deadline_extension",
            ResourceKind::PlagiarismFlag => "plagiarism_flag",
            ResourceKind::PersonalDeadline => "personal_deadline",
            ResourceKind::GradingTableRow => "grading_table_row",
        }
    }

    /// Parse a resource kind from its canonical string.
    ///
    /// Aliases are not accepted here; they are the resolver's business.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "submission" => Some(ResourceKind::Submission),
            "feedback" => Some(ResourceKind::Feedback),
            "moderation" => Some(ResourceKind::Moderation),
            "allocation" => Some(ResourceKind::Allocation),
            "deadline_extension" => Some(ResourceKind::DeadlineExtension),
            "plagiarism_flag" => Some(ResourceKind::PlagiarismFlag),
            "personal_deadline" => Some(ResourceKind::PersonalDeadline),
            "grading_table_row" => Some(ResourceKind::GradingTableRow),
            _ => None,
        }
    }

    /// Get all resource kinds.
    pub fn all() -> Vec<Self> {
        vec![
            ResourceKind::Submission,
            ResourceKind::Feedback,
            ResourceKind::Moderation,
            ResourceKind::Allocation,
            ResourceKind::DeadlineExtension,
            ResourceKind::PlagiarismFlag,
            ResourceKind::PersonalDeadline,
            ResourceKind::GradingTableRow,
        ]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value that can be passed to [`Ability::can`](crate::Ability::can).
///
/// # Example
///
/// A decorator only needs a tag of its own and a delegate:
///
/// ```
/// use std::any::Any;
/// use coursework_ability::resources::Resource;
/// use coursework_model::Submission;
///
/// struct Highlighted {
///     submission: Submission,
/// }
///
/// impl Resource for Highlighted {
///     fn type_tag(&self) -> &'static str {
///         "highlighted_submission"
///     }
///
///     fn delegate(&self) -> Option<&dyn Resource> {
///         Some(&self.submission)
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
/// ```
pub trait Resource: Any {
    /// Raw type tag, possibly an alias or a decorator's own tag.
    fn type_tag(&self) -> &'static str;

    /// The wrapped resource, for decorators.
    fn delegate(&self) -> Option<&dyn Resource> {
        None
    }

    /// Upcast for typed access by rule predicates.
    fn as_any(&self) -> &dyn Any;
}

/// A base resource type rules can be registered against.
pub trait Authorizable: Resource {
    /// Canonical kind of this type.
    const KIND: ResourceKind;
}

/// Find the `T` a resource is, or wraps, by walking the delegate chain.
pub fn find<T: Authorizable>(resource: &dyn Resource) -> Option<&T> {
    let mut current = Some(resource);
    while let Some(candidate) = current {
        if let Some(found) = candidate.as_any().downcast_ref::<T>() {
            return Some(found);
        }
        current = candidate.delegate();
    }
    None
}

macro_rules! base_resource {
    ($ty:ty, $kind:expr) => {
        impl Resource for $ty {
            fn type_tag(&self) -> &'static str {
                $kind.as_str()
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        impl Authorizable for $ty {
            const KIND: ResourceKind = $kind;
        }
    };
}

base_resource!(Submission, ResourceKind::Submission);
base_resource!(Feedback, ResourceKind::Feedback);
base_resource!(Moderation, ResourceKind::Moderation);
base_resource!(Allocation, ResourceKind::Allocation);
base_resource!(DeadlineExtension, ResourceKind::DeadlineExtension);
base_resource!(PlagiarismFlag, ResourceKind::PlagiarismFlag);
base_resource!(PersonalDeadline, ResourceKind::PersonalDeadline);

// The row's tag depends on the table layout; both resolve through aliases.
impl Resource for GradingTableRow {
    fn type_tag(&self) -> &'static str {
        match self.mode {
            RowMode::Single => "grading_table_row_single",
            RowMode::Multi => "grading_table_row_multi",
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Authorizable for GradingTableRow {
    const KIND: ResourceKind = ResourceKind::GradingTableRow;
}

impl Resource for GroupSubmission {
    fn type_tag(&self) -> &'static str {
        "group_submission"
    }

    fn delegate(&self) -> Option<&dyn Resource> {
        Some(self.submission())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursework_model::{Allocatable, Coursework};
    use std::sync::Arc;
    use uuid::Uuid;

    fn submission() -> Submission {
        let coursework = Arc::new(Coursework::new("Essay", Uuid::now_v7()));
        let student = Uuid::now_v7();
        Submission::new(coursework, Allocatable::User(student), student)
    }

    #[test]
    fn test_resource_kind_parsing() {
        assert_eq!(ResourceKind::parse("submission"), Some(ResourceKind::Submission));
        assert_eq!(ResourceKind::parse("DEADLINE_EXTENSION"), Some(ResourceKind::DeadlineExtension));
        assert_eq!(ResourceKind::parse("group_submission"), None);

        for kind in ResourceKind::all() {
            assert_eq!(ResourceKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_base_tags_are_canonical() {
        let submission = submission();
        assert_eq!(submission.type_tag(), "submission");
        assert!(submission.delegate().is_none());
        assert_eq!(<Submission as Authorizable>::KIND, ResourceKind::Submission);
    }

    #[test]
    fn test_grading_row_tag_follows_mode() {
        let coursework = Arc::new(Coursework::new("Essay", Uuid::now_v7()));
        let mut row = GradingTableRow::new(coursework, Allocatable::User(Uuid::now_v7()));
        assert_eq!(row.type_tag(), "grading_table_row_single");

        row.mode = RowMode::Multi;
        assert_eq!(row.type_tag(), "grading_table_row_multi");
    }

    #[test]
    fn test_find_walks_delegate_chain() {
        let inner = submission();
        let id = inner.allocatable.id();
        let wrapped = GroupSubmission::new(Arc::new(inner));

        let found = find::<Submission>(&wrapped);
        assert_eq!(found.map(|s| s.allocatable.id()), Some(id));
        assert!(find::<Feedback>(&wrapped).is_none());
    }
}
