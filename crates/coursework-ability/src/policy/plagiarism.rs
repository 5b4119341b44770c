//! Plagiarism flag rules.

use coursework_model::{PlagiarismFlag, SubmissionState};

use super::plagiarism_flagging_enabled;
use crate::actions::Action;
use crate::capabilities::Capability;
use crate::ruleset::RuleSet;

pub(super) fn register(rules: &mut RuleSet) {
    let mut flag = rules.target::<PlagiarismFlag>();

    flag.prevent("plagiarism_flag.new.prevent_when_disabled", Action::New, |ability, p| {
        !plagiarism_flagging_enabled(ability, &p.submission.coursework)
            && ability.because("Plagiarism flagging is not enabled")
    })
    .prevent("plagiarism_flag.new.prevent_when_flagged", Action::New, |ability, p| {
        (p.persisted() || p.submission.plagiarism.is_some()) && ability.because("The submission is already flagged")
    })
    .prevent("plagiarism_flag.new.prevent_before_submission", Action::New, |ability, p| {
        p.submission.state < SubmissionState::Submitted && ability.because("The submission has not been submitted")
    })
    .prevent("plagiarism_flag.new.prevent_when_published", Action::New, |ability, p| {
        p.submission.state == SubmissionState::Published && ability.because("The submission has been published")
    })
    .allow("plagiarism_flag.new.allow_flaggers", Action::New, |ability, p| {
        ability.has_capability(Capability::AddPlagiarismFlag, &p.submission.coursework)
    });

    flag.delegate("plagiarism_flag.create.allow_when_new_allowed", Action::Create, Action::New);

    flag.allow("plagiarism_flag.show.allow_flaggers", Action::Show, |ability, p| {
        ability.has_capability(Capability::AddPlagiarismFlag, &p.submission.coursework)
    })
    .allow("plagiarism_flag.show.allow_updaters", Action::Show, |ability, p| {
        ability.has_capability(Capability::UpdatePlagiarismFlag, &p.submission.coursework)
    })
    .allow("plagiarism_flag.show.allow_grade_administrators", Action::Show, |ability, p| {
        ability.has_capability(Capability::AdministerGrades, &p.submission.coursework)
    });

    flag.prevent("plagiarism_flag.edit.prevent_unsaved", Action::Edit, |ability, p| {
        !p.persisted() && ability.because("The plagiarism flag has not been saved yet")
    })
    .prevent("plagiarism_flag.edit.prevent_when_published", Action::Edit, |ability, p| {
        p.submission.state == SubmissionState::Published && ability.because("The submission has been published")
    })
    .allow("plagiarism_flag.edit.allow_updaters", Action::Edit, |ability, p| {
        ability.has_capability(Capability::UpdatePlagiarismFlag, &p.submission.coursework)
    });

    flag.delegate("plagiarism_flag.update.allow_when_edit_allowed", Action::Update, Action::Edit);
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
            rules().names_for(Action::New, ResourceKind::PlagiarismFlag),
            vec![
                "plagiarism_flag.new.prevent_when_disabled",
                "plagiarism_flag.new.prevent_when_flagged",
                "plagiarism_flag.new.prevent_before_submission",
                "plagiarism_flag.new.prevent_when_published",
                "plagiarism_flag.new.allow_flaggers",
            ]
        );
    }

    #[test]
    fn test_edit_rule_order() {
        assert_eq!(
            rules().names_for(Action::Edit, ResourceKind::PlagiarismFlag),
            vec![
                "plagiarism_flag.edit.prevent_unsaved",
                "plagiarism_flag.edit.prevent_when_published",
                "plagiarism_flag.edit.allow_updaters",
            ]
        );
    }
}
