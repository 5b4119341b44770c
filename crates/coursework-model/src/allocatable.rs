//! Allocatables and actors
//!
//! An allocatable is whoever a submission belongs to: an individual student,
//! or a group of students when the coursework is a group assignment. An
//! actor is the user an authorization decision is being made for.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A group of students submitting together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group ID
    pub id: Uuid,

    /// Group name
    pub name: String,

    /// Member user IDs
    #[serde(default)]
    pub members: Vec<Uuid>,
}

impl Group {
    /// Creates a new group with the given members.
    pub fn new(name: impl Into<String>, members: Vec<Uuid>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            members,
        }
    }

    /// Check if a user is a member of this group.
    pub fn has_member(&self, user_id: Uuid) -> bool {
        self.members.contains(&user_id)
    }
}

/// Whoever a submission, extension or allocation is for.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use coursework_model::{Allocatable, Group};
///
/// let alice = Uuid::now_v7();
/// let bob = Uuid::now_v7();
///
/// assert!(Allocatable::User(alice).includes(alice));
///
/// let group = Allocatable::Group(Group::new("Team 1", vec![alice, bob]));
/// assert!(group.includes(bob));
/// assert!(!group.includes(Uuid::now_v7()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Allocatable {
    /// An individual student
    User(Uuid),

    /// A group of students
    Group(Group),
}

impl Allocatable {
    /// Get the allocatable ID (user or group ID).
    pub fn id(&self) -> Uuid {
        match self {
            Allocatable::User(id) => *id,
            Allocatable::Group(group) => group.id,
        }
    }

    /// Get the hashable key identifying this allocatable.
    pub fn key(&self) -> AllocatableKey {
        match self {
            Allocatable::User(id) => AllocatableKey::User(*id),
            Allocatable::Group(group) => AllocatableKey::Group(group.id),
        }
    }

    /// Check if a user is this allocatable or one of its members.
    pub fn includes(&self, user_id: Uuid) -> bool {
        match self {
            Allocatable::User(id) => *id == user_id,
            Allocatable::Group(group) => group.has_member(user_id),
        }
    }

    /// Check if this allocatable is a group.
    pub fn is_group(&self) -> bool {
        matches!(self, Allocatable::Group(_))
    }
}

/// Compact identity of an allocatable, used for per-allocatable records.
///
/// The string form (`user:<uuid>` / `group:<uuid>`) is used as a map key so
/// record tables serialize to plain JSON objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocatableKey {
    /// An individual student
    User(Uuid),
    /// A group of students
    Group(Uuid),
}

impl fmt::Display for AllocatableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocatableKey::User(id) => write!(f, "user:{}", id),
            AllocatableKey::Group(id) => write!(f, "group:{}", id),
        }
    }
}

/// The user an authorization decision is made for.
///
/// # Examples
///
/// ```
/// use uuid::Uuid;
/// use coursework_model::Actor;
///
/// let actor = Actor::new(Uuid::now_v7(), "Ada Lovelace");
/// assert_eq!(actor.display_name, "Ada Lovelace");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User ID
    pub id: Uuid,

    /// Display name, used in log lines only
    pub display_name: String,
}

impl Actor {
    /// Creates a new actor.
    pub fn new(id: Uuid, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}
