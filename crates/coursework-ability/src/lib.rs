//! # Coursework Ability
//!
//! This crate decides whether an actor may perform an action on a coursework
//! resource, using ordered allow/prevent rules.
//!
//! ## Overview
//!
//! The coursework-ability crate handles:
//! - **Actions**: The verbs rules are registered for
//! - **Resources**: Canonical kinds and type resolution through decorators
//! - **Rules & Rule Sets**: Ordered allow/prevent predicates
//! - **Ability**: First-verdict-wins evaluation with an explanatory message
//! - **Capabilities**: The seam to the host's role system
//! - **Policy**: The concrete rule table for the grading workflow
//!
//! ## Architecture
//!
//! ```text
//! Rule = Action + ResourceKind + Allow|Prevent + predicate
//!
//! can(action, resource):
//!   TypeResolver: "group_submission" → submission
//!   RuleSet (in order):
//!     submission.new.prevent_when_exists        fires → false
//!     submission.new.allow_on_behalf_of_students
//!     ...
//!   no verdict → false
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use uuid::Uuid;
//! use coursework_ability::{Ability, Action, Capability, CapabilitySet, PolicyConfig};
//! use coursework_model::{Actor, Allocatable, Coursework, Submission};
//!
//! let student = Actor::new(Uuid::now_v7(), "Student");
//! let coursework = Arc::new(Coursework::new("Essay 1", Uuid::now_v7()));
//! let submission = Submission::new(coursework, Allocatable::User(student.id), student.id);
//!
//! let config = PolicyConfig::from_env().unwrap_or_default();
//! let capabilities = Arc::new(CapabilitySet::global(&[Capability::Submit]));
//! let ability = Ability::for_coursework(student, capabilities, config);
//!
//! if let Err(err) = ability.require(Action::New, &submission) {
//!     eprintln!("{} ({})", err, err.error_code());
//! }
//! ```
//!
//! ## Messages
//!
//! Predicates may explain themselves through [`Ability::because`] and
//! [`Ability::set_message`]. The message is cleared at the start of each
//! evaluation and holds whatever was written last.

pub mod ability;
pub mod actions;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod policy;
pub mod resolver;
pub mod resources;
pub mod rule;
pub mod ruleset;

// Re-export main types for convenience
pub use ability::Ability;
pub use actions::Action;
pub use capabilities::{Capability, CapabilityChecker, CapabilityGrant, CapabilitySet};
pub use config::{ConfigError, PolicyConfig};
pub use error::{AbilityError, AbilityResult};
pub use policy::coursework_rules;
pub use resolver::TypeResolver;
pub use resources::{Authorizable, Resource, ResourceKind};
pub use rule::{Polarity, Rule};
pub use ruleset::{RuleSet, Target};
