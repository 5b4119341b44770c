//! Rules
//!
//! A rule binds an action and a resource kind to a predicate. An `Allow`
//! rule whose predicate fires grants the action, a `Prevent` rule whose
//! predicate fires denies it; a predicate that does not fire lets evaluation
//! continue with the next rule.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::ability::Ability;
use crate::actions::Action;
use crate::resources::{self, Authorizable, Resource, ResourceKind};

/// What a rule does when its predicate fires.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Grant the action.
    Allow,
    /// Deny the action.
    Prevent,
}

impl Polarity {
    /// Get the string representation of the polarity.
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Allow => "allow",
            Polarity::Prevent => "prevent",
        }
    }
}

type Predicate = Box<dyn Fn(&Ability, &dyn Resource) -> bool + Send + Sync>;

/// A single allow or prevent rule.
///
/// The target kind is taken from the predicate's parameter type, so a rule
/// written against `Submission` only ever sees submissions (unwrapped from
/// any decorator).
///
/// # Example
///
/// ```
/// use coursework_ability::{Action, Polarity, ResourceKind, Rule};
/// use coursework_model::{Submission, SubmissionState};
///
/// let rule = Rule::prevent("submission.edit.prevent_when_finalised", Action::Edit, |ability, submission: &Submission| {
///     submission.state >= SubmissionState::Finalised && ability.because("The submission has been finalised")
/// });
///
/// assert_eq!(rule.polarity(), Polarity::Prevent);
/// assert!(rule.matches(Action::Edit, ResourceKind::Submission));
/// assert!(!rule.matches(Action::Show, ResourceKind::Submission));
/// ```
pub struct Rule {
    name: &'static str,
    action: Action,
    target: ResourceKind,
    polarity: Polarity,
    predicate: Predicate,
}

impl Rule {
    /// Create an allow rule.
    pub fn allow<T, F>(name: &'static str, action: Action, predicate: F) -> Self
    where
        T: Authorizable,
        F: Fn(&Ability, &T) -> bool + Send + Sync + 'static,
    {
        Self::typed(name, action, Polarity::Allow, predicate)
    }

    /// Create a prevent rule.
    pub fn prevent<T, F>(name: &'static str, action: Action, predicate: F) -> Self
    where
        T: Authorizable,
        F: Fn(&Ability, &T) -> bool + Send + Sync + 'static,
    {
        Self::typed(name, action, Polarity::Prevent, predicate)
    }

    fn typed<T, F>(name: &'static str, action: Action, polarity: Polarity, predicate: F) -> Self
    where
        T: Authorizable,
        F: Fn(&Ability, &T) -> bool + Send + Sync + 'static,
    {
        let predicate = move |ability: &Ability, resource: &dyn Resource| match resources::find::<T>(resource) {
            Some(typed) => predicate(ability, typed),
            None => {
                warn!(
                    rule = name,
                    tag = resource.type_tag(),
                    "Resource does not unwrap to the rule's target type"
                );
                false
            }
        };

        Self {
            name,
            action,
            target: T::KIND,
            polarity,
            predicate: Box::new(predicate),
        }
    }

    /// Rule name, unique within a policy.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The action the rule is registered for.
    pub fn action(&self) -> Action {
        self.action
    }

    /// The resource kind the rule is registered for.
    pub fn target(&self) -> ResourceKind {
        self.target
    }

    /// Allow or prevent.
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Check if the rule applies to an action on a resource kind.
    pub fn matches(&self, action: Action, kind: ResourceKind) -> bool {
        self.action == action && self.target == kind
    }

    /// Evaluate the predicate. It may write the ability's message.
    pub fn fires(&self, ability: &Ability, resource: &dyn Resource) -> bool {
        (self.predicate)(ability, resource)
    }

    /// Evaluate the rule.
    ///
    /// Returns `Some(true)` for a firing allow rule, `Some(false)` for a
    /// firing prevent rule and `None` when the predicate does not fire.
    pub fn verdict(&self, ability: &Ability, resource: &dyn Resource) -> Option<bool> {
        if !self.fires(ability, resource) {
            return None;
        }
        Some(self.polarity == Polarity::Allow)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("action", &self.action)
            .field("target", &self.target)
            .field("polarity", &self.polarity)
            .finish_non_exhaustive()
    }
}
