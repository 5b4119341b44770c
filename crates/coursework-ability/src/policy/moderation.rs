//! Moderation rules.

use coursework_model::{Moderation, Stage};

use crate::actions::Action;
use crate::capabilities::Capability;
use crate::ruleset::RuleSet;

pub(super) fn register(rules: &mut RuleSet) {
    let mut moderation = rules.target::<Moderation>();

    moderation
        .prevent("moderation.new.prevent_when_disabled", Action::New, |ability, m| {
            !m.submission().coursework.marking.moderation_agreement_enabled
                && ability.because("Moderation agreement is not enabled")
        })
        .prevent("moderation.new.prevent_when_moderated", Action::New, |ability, m| {
            (m.persisted() || m.feedback.has_moderation) && ability.because("The feedback has already been moderated")
        })
        .prevent("moderation.new.prevent_draft_feedback", Action::New, |ability, m| {
            !m.feedback.finalised && ability.because("The feedback has not been finalised")
        })
        .prevent("moderation.new.prevent_when_published", Action::New, |ability, m| {
            m.feedback.is_published() && ability.because("The submission has been published")
        })
        .allow("moderation.new.allow_allocated_moderator", Action::New, |ability, m| {
            m.submission().coursework.marking.allocation_enabled
                && m.submission().is_allocated(ability.actor(), Stage::Moderator)
        })
        .allow("moderation.new.allow_moderators_without_allocation", Action::New, |ability, m| {
            let coursework = &m.submission().coursework;
            !coursework.marking.allocation_enabled && ability.has_capability(Capability::Moderate, coursework)
        });

    moderation.delegate("moderation.create.allow_when_new_allowed", Action::Create, Action::New);

    moderation
        .allow("moderation.show.allow_grade_administrators", Action::Show, |ability, m| {
            ability.has_capability(Capability::AdministerGrades, &m.submission().coursework)
        })
        .allow("moderation.show.allow_grade_viewers", Action::Show, |ability, m| {
            ability.has_capability(Capability::ViewAllGradesAtAllTimes, &m.submission().coursework)
        })
        .allow("moderation.show.allow_moderator", Action::Show, |ability, m| m.moderated_by(ability.actor()))
        .allow("moderation.show.allow_feedback_author", Action::Show, |ability, m| {
            m.feedback.authored_by(ability.actor())
        });

    moderation
        .prevent("moderation.edit.prevent_unsaved", Action::Edit, |ability, m| {
            !m.persisted() && ability.because("The moderation has not been saved yet")
        })
        .prevent("moderation.edit.prevent_when_published", Action::Edit, |ability, m| {
            m.feedback.is_published() && ability.because("The submission has been published")
        })
        .allow("moderation.edit.allow_moderator", Action::Edit, |ability, m| m.moderated_by(ability.actor()))
        .allow("moderation.edit.allow_grade_administrators", Action::Edit, |ability, m| {
            ability.has_capability(Capability::AdministerGrades, &m.submission().coursework)
        });

    moderation.delegate("moderation.update.allow_when_edit_allowed", Action::Update, Action::Edit);
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
    fn test_new_rule_order() {
        assert_eq!(
            rules().names_for(Action::New, ResourceKind::Moderation),
            vec![
                "moderation.new.prevent_when_disabled",
                "moderation.new.prevent_when_moderated",
                "moderation.new.prevent_draft_feedback",
                "moderation.new.prevent_when_published",
                "moderation.new.allow_allocated_moderator",
                "moderation.new.allow_moderators_without_allocation",
            ]
        );
    }

    #[test]
    fn test_edit_prevents_come_first() {
        let names = rules().names_for(Action::Edit, ResourceKind::Moderation);
        assert_eq!(names.len(), 4);
        assert_eq!(&names[..2], ["moderation.edit.prevent_unsaved", "moderation.edit.prevent_when_published"]);
        assert_eq!(rules().names_for(Action::Show, ResourceKind::Moderation).len(), 4);
    }
}
