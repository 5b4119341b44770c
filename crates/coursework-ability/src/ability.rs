//! The evaluator.
//!
//! An [`Ability`] answers "may this actor do that to this resource?" for one
//! actor and one session, by walking a [`RuleSet`] in registration order
//! until a rule gives a verdict.

use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, instrument, trace, warn};

use coursework_model::{Actor, Coursework};

use crate::actions::Action;
use crate::capabilities::{Capability, CapabilityChecker};
use crate::config::PolicyConfig;
use crate::error::{AbilityError, AbilityResult};
use crate::policy;
use crate::resolver::TypeResolver;
use crate::resources::Resource;
use crate::ruleset::RuleSet;

/// Authorization decisions for one actor.
///
/// # Evaluation
///
/// ```text
/// can(action, resource)
///   ├─ clear message
///   ├─ resolve resource kind (unwrapping decorators)
///   ├─ for each rule matching (action, kind), in order:
///   │     allow fires   → true
///   │     prevent fires → false
///   │     otherwise     → next rule
///   └─ no verdict → false
/// ```
///
/// Predicates may write a message at any point. After the call,
/// [`last_message`](Self::last_message) holds whatever the last predicate
/// that had something to say wrote, which is not necessarily the reason for
/// the final verdict.
///
/// An `Ability` is `Send` but not `Sync`: give each session its own.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chrono::{Duration, Utc};
/// use uuid::Uuid;
/// use coursework_ability::{Ability, Action, Capability, CapabilitySet, PolicyConfig};
/// use coursework_model::{Actor, Allocatable, Coursework, Submission};
///
/// let student = Actor::new(Uuid::now_v7(), "Student");
/// let mut coursework = Coursework::new("Essay", Uuid::now_v7());
/// coursework.deadline = Some(Utc::now() + Duration::days(7));
/// let coursework = Arc::new(coursework);
///
/// let ability = Ability::for_coursework(
///     student.clone(),
///     Arc::new(CapabilitySet::global(&[Capability::Submit])),
///     PolicyConfig::default(),
/// );
///
/// let submission = Submission::new(coursework.clone(), Allocatable::User(student.id), student.id);
/// assert!(ability.can(Action::New, &submission));
/// assert!(ability.can(Action::Create, &submission));
///
/// let mut existing = coursework.as_ref().clone();
/// existing.record_submission(&Allocatable::User(student.id));
/// let submission = Submission::new(Arc::new(existing), Allocatable::User(student.id), student.id);
/// assert!(ability.cannot(Action::New, &submission));
/// assert_eq!(ability.last_message(), "Submission already exists");
/// ```
pub struct Ability {
    actor: Actor,
    capabilities: Arc<dyn CapabilityChecker>,
    config: PolicyConfig,
    now: DateTime<Utc>,
    resolver: TypeResolver,
    rules: RuleSet,
    message: RefCell<String>,
    last_rule: Cell<Option<&'static str>>,
}

impl Ability {
    /// Create an ability evaluating `rules` for `actor`.
    ///
    /// Uses the default site configuration and the current time.
    pub fn new(actor: Actor, capabilities: Arc<dyn CapabilityChecker>, rules: RuleSet) -> Self {
        Self {
            actor,
            capabilities,
            config: PolicyConfig::default(),
            now: Utc::now(),
            resolver: TypeResolver::new(),
            rules,
            message: RefCell::new(String::new()),
            last_rule: Cell::new(None),
        }
    }

    /// Create an ability evaluating the full coursework policy.
    pub fn for_coursework(actor: Actor, capabilities: Arc<dyn CapabilityChecker>, config: PolicyConfig) -> Self {
        Self::new(actor, capabilities, policy::coursework_rules()).with_config(config)
    }

    /// Replace the site configuration.
    pub fn with_config(mut self, config: PolicyConfig) -> Self {
        self.config = config;
        self
    }

    /// Evaluate deadlines as of `now` instead of the creation time.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Check if the actor may perform `action` on `resource`.
    ///
    /// A resource of unknown type is denied, and the error is logged and
    /// kept as the last message. Use [`try_can`](Self::try_can) to get it as
    /// an error instead.
    pub fn can(&self, action: Action, resource: &dyn Resource) -> bool {
        match self.try_can(action, resource) {
            Ok(allowed) => allowed,
            Err(err) => {
                error!(
                    actor = %self.actor.id,
                    action = %action,
                    error = %err,
                    "Could not authorize resource"
                );
                self.set_message(err.to_string());
                false
            }
        }
    }

    /// Check if the actor may not perform `action` on `resource`.
    pub fn cannot(&self, action: Action, resource: &dyn Resource) -> bool {
        !self.can(action, resource)
    }

    /// Like [`can`](Self::can), but surfaces unresolvable resource types.
    ///
    /// # Errors
    ///
    /// Returns [`AbilityError::UnknownResourceType`] if the resource's kind
    /// cannot be resolved.
    #[instrument(level = "trace", skip(self, resource), fields(actor = %self.actor.id))]
    pub fn try_can(&self, action: Action, resource: &dyn Resource) -> AbilityResult<bool> {
        self.message.borrow_mut().clear();
        self.last_rule.set(None);

        let kind = self.resolver.resolve(resource)?;

        for rule in self.rules.iter().filter(|rule| rule.matches(action, kind)) {
            trace!(rule = rule.name(), polarity = rule.polarity().as_str(), "Evaluating rule");

            if let Some(allowed) = rule.verdict(self, resource) {
                self.last_rule.set(Some(rule.name()));
                debug!(
                    actor = %self.actor.id,
                    action = %action,
                    resource = %kind,
                    rule = rule.name(),
                    allowed = allowed,
                    "Authorization decided by rule"
                );
                return Ok(allowed);
            }
        }

        // A delegated evaluation may have recorded its own rule.
        self.last_rule.set(None);
        debug!(
            actor = %self.actor.id,
            action = %action,
            resource = %kind,
            allowed = false,
            "No rule gave a verdict; denying"
        );
        Ok(false)
    }

    /// Require permission, turning a denial into an error.
    ///
    /// # Errors
    ///
    /// Returns [`AbilityError::AccessDenied`] carrying the last message on
    /// denial, or [`AbilityError::UnknownResourceType`] as from
    /// [`try_can`](Self::try_can).
    pub fn require(&self, action: Action, resource: &dyn Resource) -> AbilityResult<()> {
        if self.try_can(action, resource)? {
            return Ok(());
        }
        Err(AbilityError::AccessDenied {
            action,
            resource: self.resolver.resolve(resource)?,
            message: self.last_message(),
        })
    }

    /// Check permission for an action given by name, e.g. `"new"`.
    ///
    /// An unknown action name is denied.
    pub fn can_str(&self, action: &str, resource: &dyn Resource) -> bool {
        match action.parse::<Action>() {
            Ok(action) => self.can(action, resource),
            Err(err) => {
                warn!(actor = %self.actor.id, action = action, "Unknown action requested");
                self.last_rule.set(None);
                self.set_message(err);
                false
            }
        }
    }

    /// The last message written during the most recent evaluation.
    ///
    /// Empty if no predicate wrote one.
    pub fn last_message(&self) -> String {
        self.message.borrow().clone()
    }

    /// Name of the rule that gave the most recent verdict.
    ///
    /// `None` when the most recent evaluation ended without any rule firing.
    pub fn last_rule(&self) -> Option<&'static str> {
        self.last_rule.get()
    }

    /// Overwrite the message. Intended for rule predicates.
    pub fn set_message(&self, message: impl Into<String>) {
        *self.message.borrow_mut() = message.into();
    }

    /// Write the message and return `true`.
    ///
    /// Lets a prevent predicate read as `condition && ability.because("...")`.
    pub fn because(&self, message: impl Into<String>) -> bool {
        self.set_message(message);
        true
    }

    /// The actor decisions are made for.
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// The site configuration.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// The time deadlines are checked against.
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// The rules being evaluated.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Check if the actor holds a capability in the coursework's context.
    pub fn has_capability(&self, capability: Capability, coursework: &Coursework) -> bool {
        let held = self
            .capabilities
            .has_capability(capability, coursework.context_id, &self.actor);
        trace!(capability = capability.as_str(), context = %coursework.context_id, held = held, "Capability check");
        held
    }
}

impl fmt::Debug for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ability")
            .field("actor", &self.actor)
            .field("config", &self.config)
            .field("now", &self.now)
            .field("rules", &self.rules.len())
            .field("message", &self.message)
            .field("last_rule", &self.last_rule)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::CapabilitySet;
    use coursework_model::{Allocatable, Feedback, Submission, SubmissionState};
    use std::any::Any;
    use uuid::Uuid;

    struct Widget;

    impl Resource for Widget {
        fn type_tag(&self) -> &'static str {
            "widget"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn student() -> Actor {
        Actor::new(Uuid::now_v7(), "Student")
    }

    fn submission_for(actor: &Actor) -> Submission {
        let coursework = Arc::new(Coursework::new("Essay", Uuid::now_v7()));
        Submission::new(coursework, Allocatable::User(actor.id), actor.id)
    }

    fn ability(actor: Actor, rules: RuleSet) -> Ability {
        Ability::new(actor, Arc::new(CapabilitySet::new()), rules)
    }

    #[test]
    fn test_no_rules_denies() {
        let actor = student();
        let submission = submission_for(&actor);
        let ability = ability(actor, RuleSet::new());

        assert!(!ability.can(Action::Show, &submission));
        assert!(ability.cannot(Action::Show, &submission));
        assert_eq!(ability.last_message(), "");
        assert_eq!(ability.last_rule(), None);
    }

    #[test]
    fn test_first_verdict_wins() {
        let actor = student();
        let submission = submission_for(&actor);

        let mut rules = RuleSet::new();
        rules
            .target::<Submission>()
            .allow("skip", Action::Show, |_, _| false)
            .allow("first", Action::Show, |_, _| true)
            .prevent("second", Action::Show, |_, _| true);
        let ability = ability(actor, rules);

        assert!(ability.can(Action::Show, &submission));
        assert_eq!(ability.last_rule(), Some("first"));
    }

    #[test]
    fn test_rules_for_other_kinds_are_ignored() {
        let actor = student();
        let submission = submission_for(&actor);

        let mut rules = RuleSet::new();
        rules.allow("feedback", Action::Show, |_, _: &Feedback| true);
        let ability = ability(actor, rules);

        assert!(!ability.can(Action::Show, &submission));
    }

    #[test]
    fn test_message_is_reset_between_calls() {
        let actor = student();
        let submission = submission_for(&actor);

        let mut rules = RuleSet::new();
        rules
            .target::<Submission>()
            .prevent("no_edit", Action::Edit, |ability, _| ability.because("No editing"))
            .allow("show", Action::Show, |_, _| true);
        let ability = ability(actor, rules);

        assert!(!ability.can(Action::Edit, &submission));
        assert_eq!(ability.last_message(), "No editing");

        assert!(ability.can(Action::Show, &submission));
        assert_eq!(ability.last_message(), "");
    }

    #[test]
    fn test_last_message_wins() {
        let actor = student();
        let submission = submission_for(&actor);

        let mut rules = RuleSet::new();
        rules
            .target::<Submission>()
            .allow("informs", Action::Show, |ability, _| {
                ability.set_message("first");
                false
            })
            .allow("informs_again", Action::Show, |ability, _| {
                ability.set_message("second");
                false
            });
        let ability = ability(actor, rules);

        assert!(!ability.can(Action::Show, &submission));
        assert_eq!(ability.last_message(), "second");
        assert_eq!(ability.last_rule(), None);
    }

    #[test]
    fn test_unknown_resource_type() {
        let ability = ability(student(), RuleSet::new());

        assert!(!ability.can(Action::Show, &Widget));
        assert_eq!(ability.last_message(), "Unknown resource type: widget");

        let err = ability.try_can(Action::Show, &Widget).unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_RESOURCE_TYPE");

        let err = ability.require(Action::Show, &Widget).unwrap_err();
        assert!(matches!(err, AbilityError::UnknownResourceType(_)));
    }

    #[test]
    fn test_require() {
        let actor = student();
        let mut submission = submission_for(&actor);

        let mut rules = RuleSet::new();
        rules
            .target::<Submission>()
            .prevent("finalised", Action::Edit, |ability, s| {
                s.state >= SubmissionState::Finalised && ability.because("The submission has been finalised")
            })
            .allow("own", Action::Edit, |ability, s| s.belongs_to(ability.actor()));
        let ability = ability(actor, rules);

        assert!(ability.require(Action::Edit, &submission).is_ok());

        submission.state = SubmissionState::Finalised;
        match ability.require(Action::Edit, &submission) {
            Err(AbilityError::AccessDenied { action, resource, message }) => {
                assert_eq!(action, Action::Edit);
                assert_eq!(resource, crate::resources::ResourceKind::Submission);
                assert_eq!(message, "The submission has been finalised");
            }
            other => panic!("expected AccessDenied, got {:?}", other),
        }
    }

    #[test]
    fn test_can_str() {
        let actor = student();
        let submission = submission_for(&actor);

        let mut rules = RuleSet::new();
        rules.target::<Submission>().allow("show", Action::Show, |_, _| true);
        let ability = ability(actor, rules);

        assert!(ability.can_str("show", &submission));
        assert!(ability.can_str("view", &submission));
        assert!(!ability.can_str("destroy", &submission));
        assert_eq!(ability.last_message(), "unknown action: destroy");
    }

    #[test]
    fn test_delegation_keeps_outer_rule_name() {
        let actor = student();
        let submission = submission_for(&actor);

        let mut rules = RuleSet::new();
        rules
            .target::<Submission>()
            .delegate("create", Action::Create, Action::New)
            .allow("new", Action::New, |_, _| true);
        let ability = ability(actor, rules);

        assert!(ability.can(Action::Create, &submission));
        assert_eq!(ability.last_rule(), Some("create"));
    }

    #[test]
    fn test_at_overrides_clock() {
        let at = Utc::now() - chrono::Duration::days(30);
        let ability = ability(student(), RuleSet::new()).at(at);
        assert_eq!(ability.now(), at);
    }

    #[test]
    fn test_capability_lookup_uses_coursework_context() {
        let actor = student();
        let submission = submission_for(&actor);
        let context = submission.coursework.context_id;

        let checker = move |capability: Capability, context_id: Uuid, _: &Actor| {
            capability == Capability::Publish && context_id == context
        };
        let ability = Ability::new(actor, Arc::new(checker), RuleSet::new());

        assert!(ability.has_capability(Capability::Publish, &submission.coursework));
        assert!(!ability.has_capability(Capability::Submit, &submission.coursework));
        assert!(!ability.has_capability(Capability::Publish, &Coursework::new("Other", Uuid::now_v7())));
    }

    #[test]
    fn test_ability_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Ability>();
    }
}
