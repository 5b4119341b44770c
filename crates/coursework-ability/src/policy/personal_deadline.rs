//! Personal deadline rules.
//!
//! Personal deadlines are created and changed through the same form, so
//! there are no `new` rules.

use coursework_model::PersonalDeadline;

use super::{has_active_extension, personal_deadlines_enabled};
use crate::actions::Action;
use crate::capabilities::Capability;
use crate::ruleset::RuleSet;

pub(super) fn register(rules: &mut RuleSet) {
    let mut deadline = rules.target::<PersonalDeadline>();

    deadline
        .prevent("personal_deadline.edit.prevent_when_disabled", Action::Edit, |ability, d| {
            !personal_deadlines_enabled(ability, &d.coursework) && ability.because("Personal deadlines are not enabled")
        })
        .prevent("personal_deadline.edit.prevent_after_finalisation", Action::Edit, |ability, d| {
            d.submission_finalised() && ability.because("The submission has already been finalised")
        })
        .prevent("personal_deadline.edit.prevent_with_active_extension", Action::Edit, |ability, d| {
            has_active_extension(ability, &d.coursework, &d.allocatable)
                && ability.because("An extension has already been granted")
        })
        .allow("personal_deadline.edit.allow_deadline_editors", Action::Edit, |ability, d| {
            ability.has_capability(Capability::EditPersonalDeadline, &d.coursework)
        });

    deadline
        .allow("personal_deadline.show.allow_deadline_editors", Action::Show, |ability, d| {
            ability.has_capability(Capability::EditPersonalDeadline, &d.coursework)
        })
        .allow("personal_deadline.show.allow_own", Action::Show, |ability, d| d.belongs_to(ability.actor()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceKind;

    fn rules() -> RuleSet {
        let mut rules = RuleSet::new();
        register(&mut rules);
        rules
    }

    #[test]
    fn test_edit_rule_order() {
        assert_eq!(
            rules().names_for(Action::Edit, ResourceKind::PersonalDeadline),
            vec![
                "personal_deadline.edit.prevent_when_disabled",
                "personal_deadline.edit.prevent_after_finalisation",
                "personal_deadline.edit.prevent_with_active_extension",
                "personal_deadline.edit.allow_deadline_editors",
            ]
        );
    }

    #[test]
    fn test_no_new_rules() {
        assert!(rules().names_for(Action::New, ResourceKind::PersonalDeadline).is_empty());
    }
}
