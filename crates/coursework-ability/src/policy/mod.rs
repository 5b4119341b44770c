//! # Coursework policy
//!
//! The concrete rule table for the coursework grading workflow, one module
//! per resource type. Each module registers its rules in a single literal
//! sequence; the order within a group is the precedence.
//!
//! Rule names follow `<resource>.<action>.<allow|prevent>_<condition>`.

use tracing::info;

use coursework_model::{Allocatable, Coursework};

use crate::ability::Ability;
use crate::ruleset::RuleSet;

mod allocation;
mod extension;
mod feedback;
mod grading_table;
mod moderation;
mod personal_deadline;
mod plagiarism;
mod submission;

/// Build the full coursework policy.
pub fn coursework_rules() -> RuleSet {
    let mut rules = RuleSet::new();
    submission::register(&mut rules);
    feedback::register(&mut rules);
    moderation::register(&mut rules);
    allocation::register(&mut rules);
    extension::register(&mut rules);
    plagiarism::register(&mut rules);
    personal_deadline::register(&mut rules);
    grading_table::register(&mut rules);

    info!(rules = rules.len(), "Assembled coursework policy");
    rules
}

/// Extensions are switched on for the site and the coursework.
pub(crate) fn extensions_enabled(ability: &Ability, coursework: &Coursework) -> bool {
    ability.config().individual_extensions && coursework.extensions_enabled
}

/// Personal deadlines are switched on for the site and the coursework.
pub(crate) fn personal_deadlines_enabled(ability: &Ability, coursework: &Coursework) -> bool {
    ability.config().personal_deadlines && coursework.personal_deadlines_enabled
}

/// Plagiarism flagging is switched on for the site and the coursework.
pub(crate) fn plagiarism_flagging_enabled(ability: &Ability, coursework: &Coursework) -> bool {
    ability.config().plagiarism_flagging && coursework.plagiarism_flagging_enabled
}

/// Some deadline applies to an allocatable.
pub(crate) fn deadline_applies(ability: &Ability, coursework: &Coursework, allocatable: &Allocatable) -> bool {
    if ability.config().personal_deadlines {
        coursework.deadline_for(allocatable).is_some()
    } else {
        coursework.has_deadline()
    }
}

/// The deadline that applies to an allocatable has passed.
pub(crate) fn deadline_passed(ability: &Ability, coursework: &Coursework, allocatable: &Allocatable) -> bool {
    if ability.config().personal_deadlines {
        coursework.deadline_has_passed_for(allocatable, ability.now())
    } else {
        coursework.deadline.map_or(false, |deadline| deadline < ability.now())
    }
}

/// The allocatable holds an extension that has not run out.
pub(crate) fn has_active_extension(ability: &Ability, coursework: &Coursework, allocatable: &Allocatable) -> bool {
    ability.config().individual_extensions && coursework.has_active_extension(allocatable, ability.now())
}

/// The allocatable may still hand in work.
pub(crate) fn submission_window_open(ability: &Ability, coursework: &Coursework, allocatable: &Allocatable) -> bool {
    !deadline_passed(ability, coursework, allocatable)
        || coursework.allow_late_submissions
        || has_active_extension(ability, coursework, allocatable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Action;
    use crate::capabilities::CapabilitySet;
    use crate::config::PolicyConfig;
    use crate::resources::ResourceKind;
    use chrono::{Duration, Utc};
    use coursework_model::Actor;
    use std::collections::HashSet;
    use std::sync::Arc;
    use uuid::Uuid;

    fn ability(config: PolicyConfig) -> Ability {
        Ability::new(Actor::new(Uuid::now_v7(), "Student"), Arc::new(CapabilitySet::new()), RuleSet::new())
            .with_config(config)
    }

    #[test]
    fn test_rule_names_are_unique() {
        let rules = coursework_rules();
        let names: HashSet<_> = rules.iter().map(|rule| rule.name()).collect();
        assert_eq!(names.len(), rules.len());
    }

    #[test]
    fn test_rule_names_match_their_group() {
        for rule in &coursework_rules() {
            let mut parts = rule.name().split('.');
            let resource = parts.next().unwrap_or_default();
            let action = parts.next().unwrap_or_default();
            assert_eq!(ResourceKind::parse(resource), Some(rule.target()), "{}", rule.name());
            assert_eq!(Action::parse(action), Some(rule.action()), "{}", rule.name());
        }
    }

    #[test]
    fn test_every_kind_has_rules() {
        let rules = coursework_rules();
        for kind in ResourceKind::all() {
            assert!(rules.iter().any(|rule| rule.target() == kind), "no rules for {}", kind);
        }
    }

    #[test]
    fn test_site_switch_overrides_coursework_switch() {
        let mut coursework = Coursework::new("Essay", Uuid::now_v7());
        coursework.extensions_enabled = true;
        coursework.plagiarism_flagging_enabled = true;

        let on = ability(PolicyConfig::default());
        assert!(extensions_enabled(&on, &coursework));
        assert!(plagiarism_flagging_enabled(&on, &coursework));
        assert!(!personal_deadlines_enabled(&on, &coursework));

        let off = ability(PolicyConfig {
            individual_extensions: false,
            plagiarism_flagging: false,
            ..PolicyConfig::default()
        });
        assert!(!extensions_enabled(&off, &coursework));
        assert!(!plagiarism_flagging_enabled(&off, &coursework));
    }

    #[test]
    fn test_submission_window() {
        let now = Utc::now();
        let student = Allocatable::User(Uuid::now_v7());
        let mut coursework = Coursework::new("Essay", Uuid::now_v7());
        coursework.deadline = Some(now - Duration::hours(1));

        let ability = ability(PolicyConfig::default()).at(now);
        assert!(deadline_passed(&ability, &coursework, &student));
        assert!(!submission_window_open(&ability, &coursework, &student));

        coursework.extensions_enabled = true;
        coursework.record_extension(&student, now + Duration::days(1));
        assert!(submission_window_open(&ability, &coursework, &student));

        let no_extensions = ability.with_config(PolicyConfig {
            individual_extensions: false,
            ..PolicyConfig::default()
        });
        assert!(!submission_window_open(&no_extensions, &coursework, &student));

        coursework.allow_late_submissions = true;
        assert!(submission_window_open(&no_extensions, &coursework, &student));
    }

    #[test]
    fn test_deadline_applies() {
        let now = Utc::now();
        let student = Allocatable::User(Uuid::now_v7());
        let mut coursework = Coursework::new("Essay", Uuid::now_v7());
        coursework.personal_deadlines_enabled = true;

        let on = ability(PolicyConfig::default()).at(now);
        assert!(!deadline_applies(&on, &coursework, &student));

        coursework.record_personal_deadline(&student, now + Duration::days(1));
        assert!(deadline_applies(&on, &coursework, &student));

        let off = on.with_config(PolicyConfig {
            personal_deadlines: false,
            ..PolicyConfig::default()
        });
        assert!(!deadline_applies(&off, &coursework, &student));
    }

    #[test]
    fn test_site_switch_ignores_personal_deadline() {
        let now = Utc::now();
        let student = Allocatable::User(Uuid::now_v7());
        let mut coursework = Coursework::new("Essay", Uuid::now_v7());
        coursework.deadline = Some(now - Duration::hours(1));
        coursework.personal_deadlines_enabled = true;
        coursework.record_personal_deadline(&student, now + Duration::days(1));

        let on = ability(PolicyConfig::default()).at(now);
        assert!(!deadline_passed(&on, &coursework, &student));

        let off = on.with_config(PolicyConfig {
            personal_deadlines: false,
            ..PolicyConfig::default()
        });
        assert!(deadline_passed(&off, &coursework, &student));
    }
}
