//! # Capabilities
//!
//! Capability names the coursework policy asks about, the
//! [`CapabilityChecker`] seam hosts implement to answer those questions, and
//! an in-memory [`CapabilitySet`] for hosts without their own role system.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use coursework_model::Actor;

const PREFIX: &str = "mod/coursework:";

/// Capabilities consulted by the coursework policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Submit work for oneself.
    Submit,
    /// Submit, edit and finalise on behalf of students.
    SubmitOnBehalfOf,
    /// Add initial assessor feedback.
    AddInitialGrade,
    /// Edit one's own finalised initial feedback.
    EditInitialGrade,
    /// Add the agreed grade.
    AddAgreedGrade,
    /// Edit the agreed grade.
    EditAgreedGrade,
    /// Add the agreed grade as one of the initial assessors.
    AddAllocatedAgreedGrade,
    /// Edit the agreed grade as one of the initial assessors.
    EditAllocatedAgreedGrade,
    /// Override most marking restrictions.
    AdministerGrades,
    /// See every grade at any time.
    ViewAllGradesAtAllTimes,
    /// Release grades to students.
    Publish,
    /// Unlock finalised submissions.
    RevertFinalised,
    /// Allocate markers.
    Allocate,
    /// Moderate feedback.
    Moderate,
    /// Grant deadline extensions.
    GrantExtensions,
    /// See granted extensions.
    ViewExtensions,
    /// Set personal deadlines.
    EditPersonalDeadline,
    /// Raise plagiarism flags.
    AddPlagiarismFlag,
    /// Change plagiarism flags.
    UpdatePlagiarismFlag,
}

impl Capability {
    /// Get the external capability name, e.g. `mod/coursework:submit`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Submit => "mod/coursework:submit",
            Capability::SubmitOnBehalfOf => "mod/coursework:submitonbehalfof",
            Capability::AddInitialGrade => "mod/coursework:addinitialgrade",
            Capability::EditInitialGrade => "mod/coursework:editinitialgrade",
            Capability::AddAgreedGrade => "mod/coursework:addagreedgrade",
            Capability::EditAgreedGrade => "mod/coursework:editagreedgrade",
            Capability::AddAllocatedAgreedGrade => "mod/coursework:addallocatedagreedgrade",
            Capability::EditAllocatedAgreedGrade => "mod/coursework:editallocatedagreedgrade",
            Capability::AdministerGrades => "mod/coursework:administergrades",
            Capability::ViewAllGradesAtAllTimes => "mod/coursework:viewallgradesatalltimes",
            Capability::Publish => "mod/coursework:publish",
            Capability::RevertFinalised => "mod/coursework:revertfinalised",
            Capability::Allocate => "mod/coursework:allocate",
            Capability::Moderate => "mod/coursework:moderate",
            Capability::GrantExtensions => "mod/coursework:grantextensions",
            Capability::ViewExtensions => "mod/coursework:viewextensions",
            Capability::EditPersonalDeadline => "mod/coursework:editpersonaldeadline",
            Capability::AddPlagiarismFlag => "mod/coursework:addplagiarismflag",
            Capability::UpdatePlagiarismFlag => "mod/coursework:updateplagiarismflag",
        }
    }

    /// Parse a capability from its external name.
    ///
    /// The `mod/coursework:` prefix is optional.
    ///
    /// # Example
    ///
    /// ```
    /// use coursework_ability::capabilities::Capability;
    ///
    /// assert_eq!(Capability::parse("mod/coursework:submit"), Some(Capability::Submit));
    /// assert_eq!(Capability::parse("allocate"), Some(Capability::Allocate));
    /// assert_eq!(Capability::parse("mod/forum:post"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        let short = lower.strip_prefix(PREFIX).unwrap_or(lower.as_str());
        Self::all()
            .into_iter()
            .find(|capability| &capability.as_str()[PREFIX.len()..] == short)
    }

    /// Get all capabilities.
    pub fn all() -> Vec<Self> {
        vec![
            Capability::Submit,
            Capability::SubmitOnBehalfOf,
            Capability::AddInitialGrade,
            Capability::EditInitialGrade,
            Capability::AddAgreedGrade,
            Capability::EditAgreedGrade,
            Capability::AddAllocatedAgreedGrade,
            Capability::EditAllocatedAgreedGrade,
            Capability::AdministerGrades,
            Capability::ViewAllGradesAtAllTimes,
            Capability::Publish,
            Capability::RevertFinalised,
            Capability::Allocate,
            Capability::Moderate,
            Capability::GrantExtensions,
            Capability::ViewExtensions,
            Capability::EditPersonalDeadline,
            Capability::AddPlagiarismFlag,
            Capability::UpdatePlagiarismFlag,
        ]
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answers whether an actor holds a capability in a context.
///
/// This is the host's role system. Implementations must be read-only; they
/// may block.
pub trait CapabilityChecker: Send + Sync {
    /// Check a capability for an actor in a context.
    fn has_capability(&self, capability: Capability, context_id: Uuid, actor: &Actor) -> bool;
}

impl<F> CapabilityChecker for F
where
    F: Fn(Capability, Uuid, &Actor) -> bool + Send + Sync,
{
    fn has_capability(&self, capability: Capability, context_id: Uuid, actor: &Actor) -> bool {
        self(capability, context_id, actor)
    }
}

/// A capability held in one context, or in every context.
///
/// # Example
///
/// ```
/// use uuid::Uuid;
/// use coursework_ability::capabilities::{Capability, CapabilityGrant};
///
/// let grant = CapabilityGrant::global(Capability::Submit);
/// assert_eq!(grant.to_string(), "mod/coursework:submit");
///
/// let context = Uuid::nil();
/// let grant = CapabilityGrant::in_context(Capability::Submit, context);
/// assert_eq!(
///     grant.to_string(),
///     "mod/coursework:submit@00000000-0000-0000-0000-000000000000"
/// );
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CapabilityGrant {
    /// The capability granted.
    pub capability: Capability,
    /// Context the grant is limited to. If None, applies everywhere.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<Uuid>,
}

impl CapabilityGrant {
    /// Create a grant that applies in every context.
    pub fn global(capability: Capability) -> Self {
        Self {
            capability,
            context_id: None,
        }
    }

    /// Create a grant limited to one context.
    pub fn in_context(capability: Capability, context_id: Uuid) -> Self {
        Self {
            capability,
            context_id: Some(context_id),
        }
    }

    /// Parse from string (e.g., "mod/coursework:submit" or "mod/coursework:submit@<uuid>").
    pub fn from_string(s: &str) -> Option<Self> {
        match s.split_once('@') {
            Some((capability, context)) => Some(Self::in_context(
                Capability::parse(capability)?,
                Uuid::parse_str(context).ok()?,
            )),
            None => Some(Self::global(Capability::parse(s)?)),
        }
    }

    /// Check if this grant covers `capability` in `context_id`.
    pub fn covers(&self, capability: Capability, context_id: Uuid) -> bool {
        self.capability == capability && self.context_id.map_or(true, |id| id == context_id)
    }

    /// Check if this grant applies in every context.
    pub fn is_global(&self) -> bool {
        self.context_id.is_none()
    }
}

impl fmt::Display for CapabilityGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.context_id {
            Some(id) => write!(f, "{}@{}", self.capability, id),
            None => write!(f, "{}", self.capability),
        }
    }
}

/// The capability grants of one session's actor.
///
/// Uses internal string representation for storage and comparison, so a
/// set loaded from configuration and one built in code compare equal.
///
/// # Example
///
/// ```
/// use uuid::Uuid;
/// use coursework_ability::capabilities::{Capability, CapabilityGrant, CapabilitySet};
///
/// let course = Uuid::now_v7();
/// let mut set = CapabilitySet::new();
/// set.add(CapabilityGrant::in_context(Capability::AddInitialGrade, course));
/// set.add(CapabilityGrant::global(Capability::Submit));
///
/// assert!(set.covers(Capability::AddInitialGrade, course));
/// assert!(!set.covers(Capability::AddInitialGrade, Uuid::now_v7()));
/// assert!(set.covers(Capability::Submit, Uuid::now_v7()));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapabilitySet {
    grants: HashSet<String>,
}

impl CapabilitySet {
    /// Create a new empty capability set.
    pub fn new() -> Self {
        Self {
            grants: HashSet::new(),
        }
    }

    /// Create a set holding global grants for each capability given.
    pub fn global(capabilities: &[Capability]) -> Self {
        let mut set = Self::new();
        for capability in capabilities {
            set.add(CapabilityGrant::global(*capability));
        }
        set
    }

    /// Create a set holding each capability given in one context.
    pub fn in_context(context_id: Uuid, capabilities: &[Capability]) -> Self {
        let mut set = Self::new();
        for capability in capabilities {
            set.add(CapabilityGrant::in_context(*capability, context_id));
        }
        set
    }

    /// Add a grant to the set.
    pub fn add(&mut self, grant: CapabilityGrant) {
        self.grants.insert(grant.to_string());
    }

    /// Remove a grant from the set.
    pub fn remove(&mut self, grant: &CapabilityGrant) {
        self.grants.remove(&grant.to_string());
    }

    /// Check if the set contains exactly this grant.
    pub fn contains(&self, grant: &CapabilityGrant) -> bool {
        self.grants.contains(&grant.to_string())
    }

    /// Check if the set covers a capability in a context.
    ///
    /// A global grant covers every context.
    pub fn covers(&self, capability: Capability, context_id: Uuid) -> bool {
        self.contains(&CapabilityGrant::in_context(capability, context_id))
            || self.contains(&CapabilityGrant::global(capability))
    }

    /// Get all grants in the set.
    pub fn grants(&self) -> Vec<CapabilityGrant> {
        self.grants
            .iter()
            .filter_map(|s| CapabilityGrant::from_string(s))
            .collect()
    }

    /// Get the number of grants.
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Merge another set into this one.
    pub fn merge(&mut self, other: &CapabilitySet) {
        self.grants.extend(other.grants.iter().cloned());
    }

    /// Create from grant strings, skipping any that do not parse.
    pub fn from_strings(grants: &[&str]) -> Self {
        let mut set = Self::new();
        for grant in grants.iter().filter_map(|s| CapabilityGrant::from_string(s)) {
            set.add(grant);
        }
        set
    }
}

impl CapabilityChecker for CapabilitySet {
    fn has_capability(&self, capability: Capability, context_id: Uuid, _actor: &Actor) -> bool {
        self.covers(capability, context_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_names() {
        assert_eq!(Capability::Submit.as_str(), "mod/coursework:submit");
        assert_eq!(
            Capability::ViewAllGradesAtAllTimes.to_string(),
            "mod/coursework:viewallgradesatalltimes"
        );
    }

    #[test]
    fn test_capability_parse_round_trips() {
        for capability in Capability::all() {
            assert_eq!(Capability::parse(capability.as_str()), Some(capability));
        }
        assert_eq!(Capability::parse("MOD/COURSEWORK:PUBLISH"), Some(Capability::Publish));
        assert_eq!(Capability::parse("mod/coursework:"), None);
    }

    #[test]
    fn test_grant_from_string() {
        let context = Uuid::now_v7();
        let grant = CapabilityGrant::from_string(&format!("mod/coursework:moderate@{}", context)).unwrap();
        assert_eq!(grant, CapabilityGrant::in_context(Capability::Moderate, context));
        assert!(!grant.is_global());

        let grant = CapabilityGrant::from_string("mod/coursework:moderate").unwrap();
        assert!(grant.is_global());

        assert!(CapabilityGrant::from_string("mod/coursework:moderate@not-a-uuid").is_none());
        assert!(CapabilityGrant::from_string("mod/coursework:fly").is_none());
    }

    #[test]
    fn test_grant_covers() {
        let context = Uuid::now_v7();
        let scoped = CapabilityGrant::in_context(Capability::Allocate, context);
        assert!(scoped.covers(Capability::Allocate, context));
        assert!(!scoped.covers(Capability::Allocate, Uuid::now_v7()));
        assert!(!scoped.covers(Capability::Moderate, context));

        let global = CapabilityGrant::global(Capability::Allocate);
        assert!(global.covers(Capability::Allocate, Uuid::now_v7()));
    }

    #[test]
    fn test_capability_set_operations() {
        let context = Uuid::now_v7();
        let mut set = CapabilitySet::new();
        assert!(set.is_empty());

        set.add(CapabilityGrant::in_context(Capability::Submit, context));
        set.add(CapabilityGrant::in_context(Capability::Submit, context));
        assert_eq!(set.len(), 1);

        set.remove(&CapabilityGrant::in_context(Capability::Submit, context));
        assert!(set.is_empty());
    }

    #[test]
    fn test_capability_set_merge() {
        let mut students = CapabilitySet::global(&[Capability::Submit]);
        let markers = CapabilitySet::global(&[Capability::AddInitialGrade]);
        students.merge(&markers);

        assert_eq!(students.len(), 2);
        assert!(students.covers(Capability::AddInitialGrade, Uuid::now_v7()));
    }

    #[test]
    fn test_capability_set_from_strings() {
        let set = CapabilitySet::from_strings(&["mod/coursework:publish", "bogus", "allocate"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.grants().len(), 2);
    }

    #[test]
    fn test_grant_serialization() {
        let json = serde_json::to_value(CapabilityGrant::global(Capability::AddInitialGrade)).unwrap();
        assert_eq!(json, serde_json::json!({ "capability": "add_initial_grade" }));

        let context = Uuid::now_v7();
        let grant = CapabilityGrant::in_context(Capability::Moderate, context);
        let parsed: CapabilityGrant = serde_json::from_str(&serde_json::to_string(&grant).unwrap()).unwrap();
        assert_eq!(parsed, grant);
    }

    #[test]
    fn test_closure_checker() {
        let actor = Actor::new(Uuid::now_v7(), "Marker");
        let checker = |capability: Capability, _context: Uuid, _actor: &Actor| {
            capability == Capability::AddInitialGrade
        };

        assert!(checker.has_capability(Capability::AddInitialGrade, Uuid::now_v7(), &actor));
        assert!(!checker.has_capability(Capability::Publish, Uuid::now_v7(), &actor));
    }

    #[test]
    fn test_set_checker_uses_context() {
        let actor = Actor::new(Uuid::now_v7(), "Student");
        let context = Uuid::now_v7();
        let set = CapabilitySet::in_context(context, &[Capability::Submit]);

        assert!(set.has_capability(Capability::Submit, context, &actor));
        assert!(!set.has_capability(Capability::Submit, Uuid::now_v7(), &actor));
    }
}
