//! Resource type resolution
//!
//! Maps a resource's raw type tag to the canonical [`ResourceKind`] rules are
//! registered against, unwrapping decorators until a known tag is found.

use std::collections::HashMap;
use tracing::trace;

use crate::error::{AbilityError, AbilityResult};
use crate::resources::{Resource, ResourceKind};

/// Raw tags that name a base kind under a different spelling.
const ALIASES: &[(&str, ResourceKind)] = &[
    ("group_submission", ResourceKind::Submission),
    ("grading_table_row_single", ResourceKind::GradingTableRow),
    ("grading_table_row_multi", ResourceKind::GradingTableRow),
];

/// Resolves resources to their canonical kind.
///
/// The table holds every canonical tag plus a fixed set of aliases. A tag
/// that is in neither makes the resolver descend into
/// [`Resource::delegate`]; a resource with an unknown tag and nothing to
/// delegate to is an error.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use uuid::Uuid;
/// use coursework_ability::{ResourceKind, TypeResolver};
/// use coursework_model::{Allocatable, Coursework, GroupSubmission, Submission};
///
/// let coursework = Arc::new(Coursework::new("Essay", Uuid::now_v7()));
/// let student = Uuid::now_v7();
/// let submission = Arc::new(Submission::new(coursework, Allocatable::User(student), student));
///
/// let resolver = TypeResolver::new();
/// assert_eq!(resolver.resolve(submission.as_ref()).unwrap(), ResourceKind::Submission);
/// assert_eq!(resolver.resolve(&GroupSubmission::new(submission)).unwrap(), ResourceKind::Submission);
/// ```
#[derive(Debug, Clone)]
pub struct TypeResolver {
    table: HashMap<&'static str, ResourceKind>,
}

impl TypeResolver {
    /// Create a resolver with the canonical tags and the fixed aliases.
    pub fn new() -> Self {
        let mut table = HashMap::new();
        for kind in ResourceKind::all() {
            table.insert(kind.as_str(), kind);
        }
        for (alias, kind) in ALIASES {
            table.insert(*alias, *kind);
        }
        Self { table }
    }

    /// Look up a single tag without unwrapping.
    pub fn lookup(&self, tag: &str) -> Option<ResourceKind> {
        self.table.get(tag).copied()
    }

    /// Resolve a resource to its canonical kind.
    ///
    /// # Errors
    ///
    /// Returns [`AbilityError::UnknownResourceType`] with the outermost tag
    /// when neither the resource nor anything it wraps has a known tag.
    pub fn resolve(&self, resource: &dyn Resource) -> AbilityResult<ResourceKind> {
        let mut current = resource;
        loop {
            let tag = current.type_tag();
            if let Some(kind) = self.lookup(tag) {
                return Ok(kind);
            }
            match current.delegate() {
                Some(inner) => {
                    trace!(tag = tag, "Unwrapping resource decorator");
                    current = inner;
                }
                None => {
                    return Err(AbilityError::UnknownResourceType(
                        resource.type_tag().to_string(),
                    ))
                }
            }
        }
    }
}

impl Default for TypeResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursework_model::{Allocatable, Coursework, GradingTableRow, GroupSubmission, RowMode, Submission};
    use std::any::Any;
    use std::sync::Arc;
    use uuid::Uuid;

    struct Opaque;

    impl Resource for Opaque {
        fn type_tag(&self) -> &'static str {
            "opaque"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct Wrapper<R: Resource> {
        inner: R,
    }

    impl<R: Resource> Resource for Wrapper<R> {
        fn type_tag(&self) -> &'static str {
            "wrapper"
        }

        fn delegate(&self) -> Option<&dyn Resource> {
            Some(&self.inner)
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn submission() -> Submission {
        let coursework = Arc::new(Coursework::new("Essay", Uuid::now_v7()));
        let student = Uuid::now_v7();
        Submission::new(coursework, Allocatable::User(student), student)
    }

    #[test]
    fn test_canonical_tags_resolve_to_themselves() {
        let resolver = TypeResolver::new();
        for kind in ResourceKind::all() {
            assert_eq!(resolver.lookup(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_aliases() {
        let resolver = TypeResolver::new();
        assert_eq!(resolver.lookup("group_submission"), Some(ResourceKind::Submission));
        assert_eq!(resolver.lookup("grading_table_row_multi"), Some(ResourceKind::GradingTableRow));
        assert_eq!(resolver.lookup("wrapper"), None);
    }

    #[test]
    fn test_resolve_group_submission() {
        let resolver = TypeResolver::new();
        let wrapped = GroupSubmission::new(Arc::new(submission()));
        assert_eq!(resolver.resolve(&wrapped).unwrap(), ResourceKind::Submission);
    }

    #[test]
    fn test_resolve_grading_rows_in_both_modes() {
        let resolver = TypeResolver::new();
        let coursework = Arc::new(Coursework::new("Essay", Uuid::now_v7()));
        let mut row = GradingTableRow::new(coursework, Allocatable::User(Uuid::now_v7()));
        assert_eq!(resolver.resolve(&row).unwrap(), ResourceKind::GradingTableRow);

        row.mode = RowMode::Multi;
        assert_eq!(resolver.resolve(&row).unwrap(), ResourceKind::GradingTableRow);
    }

    #[test]
    fn test_resolve_unwraps_nested_decorators() {
        let resolver = TypeResolver::new();
        let nested = Wrapper {
            inner: Wrapper {
                inner: GroupSubmission::new(Arc::new(submission())),
            },
        };
        assert_eq!(resolver.resolve(&nested).unwrap(), ResourceKind::Submission);
    }

    #[test]
    fn test_unknown_type_fails_loudly() {
        let resolver = TypeResolver::new();
        let err = resolver.resolve(&Wrapper { inner: Opaque }).unwrap_err();
        assert!(matches!(err, AbilityError::UnknownResourceType(ref tag) if tag == "wrapper"));
    }
}
