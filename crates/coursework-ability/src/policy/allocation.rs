//! Allocation rules.

use coursework_model::Allocation;

use crate::actions::Action;
use crate::capabilities::Capability;
use crate::ruleset::RuleSet;

pub(super) fn register(rules: &mut RuleSet) {
    let mut allocation = rules.target::<Allocation>();

    allocation
        .prevent("allocation.new.prevent_when_disabled", Action::New, |ability, a| {
            !a.coursework.marking.allocation_enabled && ability.because("Allocation is not enabled")
        })
        .prevent("allocation.new.prevent_agreed_stage", Action::New, |ability, a| {
            a.stage.is_agreed() && ability.because("The agreed grade stage cannot be allocated")
        })
        .allow("allocation.new.allow_allocators", Action::New, |ability, a| {
            ability.has_capability(Capability::Allocate, &a.coursework)
        });

    allocation.delegate("allocation.create.allow_when_new_allowed", Action::Create, Action::New);

    allocation
        .allow("allocation.show.allow_allocators", Action::Show, |ability, a| {
            ability.has_capability(Capability::Allocate, &a.coursework)
        })
        .allow("allocation.show.allow_grade_administrators", Action::Show, |ability, a| {
            ability.has_capability(Capability::AdministerGrades, &a.coursework)
        })
        .allow("allocation.show.allow_assessor", Action::Show, |ability, a| a.is_assessor(ability.actor()));

    allocation
        .prevent("allocation.edit.prevent_when_disabled", Action::Edit, |ability, a| {
            !a.coursework.marking.allocation_enabled && ability.because("Allocation is not enabled")
        })
        .prevent("allocation.edit.prevent_after_marking_started", Action::Edit, |ability, a| {
            a.marking_started && ability.because("Marking has already started for this stage")
        })
        .allow("allocation.edit.allow_allocators", Action::Edit, |ability, a| {
            ability.has_capability(Capability::Allocate, &a.coursework)
        });

    allocation.delegate("allocation.update.allow_when_edit_allowed", Action::Update, Action::Edit);
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
    fn test_rule_order() {
        let rules = rules();
        assert_eq!(
            rules.names_for(Action::New, ResourceKind::Allocation),
            vec![
                "allocation.new.prevent_when_disabled",
                "allocation.new.prevent_agreed_stage",
                "allocation.new.allow_allocators",
            ]
        );
        assert_eq!(
            rules.names_for(Action::Edit, ResourceKind::Allocation),
            vec![
                "allocation.edit.prevent_when_disabled",
                "allocation.edit.prevent_after_marking_started",
                "allocation.edit.allow_allocators",
            ]
        );
        assert_eq!(rules.names_for(Action::Update, ResourceKind::Allocation), vec!["allocation.update.allow_when_edit_allowed"]);
    }
}
