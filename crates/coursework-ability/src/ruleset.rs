//! Ordered rule collections
//!
//! A [`RuleSet`] is a policy: one explicit sequence of rules, evaluated in
//! the order they were registered. Nothing is ever reordered.

use std::marker::PhantomData;
use std::slice;

use crate::ability::Ability;
use crate::actions::Action;
use crate::resources::{Authorizable, ResourceKind};
use crate::rule::Rule;

/// An ordered list of rules.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use uuid::Uuid;
/// use coursework_ability::{Ability, Action, CapabilitySet, RuleSet};
/// use coursework_model::{Actor, Allocatable, Coursework, Submission};
///
/// let mut rules = RuleSet::new();
/// rules
///     .target::<Submission>()
///     .prevent("submission.show.prevent_everything", Action::Show, |ability, _| {
///         ability.because("Nobody may look")
///     })
///     .allow("submission.show.allow_own", Action::Show, |ability, submission| {
///         submission.belongs_to(ability.actor())
///     });
///
/// let student = Actor::new(Uuid::now_v7(), "Student");
/// let coursework = Arc::new(Coursework::new("Essay", Uuid::now_v7()));
/// let submission = Submission::new(coursework, Allocatable::User(student.id), student.id);
///
/// let ability = Ability::new(student, Arc::new(CapabilitySet::new()), rules);
/// assert!(!ability.can(Action::Show, &submission));
/// assert_eq!(ability.last_message(), "Nobody may look");
/// ```
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append an allow rule.
    pub fn allow<T, F>(&mut self, name: &'static str, action: Action, predicate: F) -> &mut Self
    where
        T: Authorizable,
        F: Fn(&Ability, &T) -> bool + Send + Sync + 'static,
    {
        self.push(Rule::allow(name, action, predicate))
    }

    /// Append a prevent rule.
    pub fn prevent<T, F>(&mut self, name: &'static str, action: Action, predicate: F) -> &mut Self
    where
        T: Authorizable,
        F: Fn(&Ability, &T) -> bool + Send + Sync + 'static,
    {
        self.push(Rule::prevent(name, action, predicate))
    }

    /// Append a rule that allows `action` whenever `to` is allowed.
    ///
    /// The other action is evaluated afresh on every call, so later changes
    /// to its rules are picked up.
    pub fn delegate<T>(&mut self, name: &'static str, action: Action, to: Action) -> &mut Self
    where
        T: Authorizable,
    {
        self.allow(name, action, move |ability: &Ability, resource: &T| ability.can(to, resource))
    }

    /// Append a prebuilt rule.
    pub fn push(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Append every rule of another set, keeping its order.
    pub fn extend(&mut self, other: RuleSet) -> &mut Self {
        self.rules.extend(other.rules);
        self
    }

    /// Register rules for one resource type without repeating it.
    pub fn target<T: Authorizable>(&mut self) -> Target<'_, T> {
        Target {
            rules: self,
            _marker: PhantomData,
        }
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate rules in registration order.
    pub fn iter(&self) -> slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Names of the rules for one action and kind, in registration order.
    pub fn names_for(&self, action: Action, kind: ResourceKind) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(action, kind))
            .map(Rule::name)
            .collect()
    }

    /// Find a rule by name.
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name() == name)
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Rule registration for a single resource type.
///
/// Obtained from [`RuleSet::target`]; rules go straight into the parent set.
pub struct Target<'a, T> {
    rules: &'a mut RuleSet,
    _marker: PhantomData<fn(&T)>,
}

impl<T: Authorizable> Target<'_, T> {
    /// Append an allow rule.
    pub fn allow<F>(&mut self, name: &'static str, action: Action, predicate: F) -> &mut Self
    where
        F: Fn(&Ability, &T) -> bool + Send + Sync + 'static,
    {
        self.rules.allow(name, action, predicate);
        self
    }

    /// Append a prevent rule.
    pub fn prevent<F>(&mut self, name: &'static str, action: Action, predicate: F) -> &mut Self
    where
        F: Fn(&Ability, &T) -> bool + Send + Sync + 'static,
    {
        self.rules.prevent(name, action, predicate);
        self
    }

    /// Append a rule that allows `action` whenever `to` is allowed.
    pub fn delegate(&mut self, name: &'static str, action: Action, to: Action) -> &mut Self {
        self.rules.delegate::<T>(name, action, to);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursework_model::{Feedback, Submission};

    #[test]
    fn test_registration_order_is_kept() {
        let mut rules = RuleSet::new();
        rules
            .target::<Submission>()
            .prevent("b", Action::Edit, |_, _| false)
            .allow("a", Action::Edit, |_, _| true)
            .allow("c", Action::Show, |_, _| true);
        rules.allow("d", Action::Edit, |_, _: &Feedback| true);
        rules.target::<Submission>().allow("e", Action::Edit, |_, _| true);

        assert_eq!(rules.len(), 5);
        assert_eq!(rules.names_for(Action::Edit, ResourceKind::Submission), vec!["b", "a", "e"]);
        assert_eq!(rules.names_for(Action::Edit, ResourceKind::Feedback), vec!["d"]);
        assert!(rules.names_for(Action::Publish, ResourceKind::Submission).is_empty());
    }

    #[test]
    fn test_extend_appends_in_order() {
        let mut first = RuleSet::new();
        first.target::<Submission>().allow("one", Action::Show, |_, _| true);
        let mut second = RuleSet::new();
        second
            .target::<Submission>()
            .allow("two", Action::Show, |_, _| true)
            .allow("three", Action::Show, |_, _| true);

        first.extend(second);
        let names: Vec<_> = first.iter().map(Rule::name).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_delegate_registers_allow_rule() {
        let mut rules = RuleSet::new();
        rules.target::<Submission>().delegate("create", Action::Create, Action::New);

        let rule = rules.get("create").unwrap();
        assert_eq!(rule.action(), Action::Create);
        assert_eq!(rule.target(), ResourceKind::Submission);
        assert_eq!(rule.polarity(), crate::rule::Polarity::Allow);
    }

    #[test]
    fn test_empty() {
        let rules = RuleSet::new();
        assert!(rules.is_empty());
        assert!(rules.get("anything").is_none());
        assert_eq!((&rules).into_iter().count(), 0);
    }
}
