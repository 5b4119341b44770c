//! Feedback rules.
//!
//! Initial stages are marked first, in parallel, by different assessors. The
//! agreed grade comes after every required initial mark is finalised. With
//! allocation on, assessors only mark the stages they were allocated to;
//! with sampling on, later initial stages only mark sampled submissions.

use coursework_model::{Feedback, SubmissionState};

use crate::actions::Action;
use crate::capabilities::Capability;
use crate::ruleset::RuleSet;

pub(super) fn register(rules: &mut RuleSet) {
    let mut feedback = rules.target::<Feedback>();

    // new
    feedback
        .prevent("feedback.new.prevent_when_exists", Action::New, |ability, f| {
            (f.persisted() || f.submission.feedback_for(f.stage).is_some())
                && ability.because("Feedback already exists for this stage")
        })
        .prevent("feedback.new.prevent_before_submission", Action::New, |ability, f| {
            f.submission.state < SubmissionState::Submitted && ability.because("The submission has not been submitted")
        })
        .prevent("feedback.new.prevent_when_published", Action::New, |ability, f| {
            f.is_published() && ability.because("The submission has already been published")
        })
        .prevent("feedback.new.prevent_during_plagiarism_investigation", Action::New, |ability, f| {
            f.submission.under_plagiarism_investigation() && ability.because("A plagiarism investigation is in progress")
        })
        .prevent("feedback.new.prevent_unknown_stage", Action::New, |ability, f| {
            !f.coursework().marking.has_stage(f.stage)
                && ability.because("This stage is not part of the marking workflow")
        })
        .allow("feedback.new.allow_grade_administrators", Action::New, |ability, f| {
            ability.has_capability(Capability::AdministerGrades, f.coursework())
        })
        .prevent("feedback.new.prevent_outside_sample", Action::New, |ability, f| {
            !f.submission.in_sample(f.stage) && ability.because("The submission is not in the sample for this stage")
        })
        .prevent("feedback.new.prevent_second_initial_mark", Action::New, |ability, f| {
            f.is_initial()
                && f.submission.has_marked_other_initial_stage(ability.actor(), f.stage)
                && ability.because("You have already marked this submission")
        })
        .allow("feedback.new.allow_allocated_initial_assessor", Action::New, |ability, f| {
            if !f.is_initial()
                || !f.coursework().marking.allocation_enabled
                || !ability.has_capability(Capability::AddInitialGrade, f.coursework())
            {
                return false;
            }
            if !f.submission.is_allocated(ability.actor(), f.stage) {
                ability.set_message("You are not allocated to this stage");
                return false;
            }
            true
        })
        .allow("feedback.new.allow_initial_assessor_without_allocation", Action::New, |ability, f| {
            f.is_initial()
                && !f.coursework().marking.allocation_enabled
                && ability.has_capability(Capability::AddInitialGrade, f.coursework())
        })
        .prevent("feedback.new.prevent_agreed_before_initial_marking", Action::New, |ability, f| {
            f.is_agreed() && !f.submission.initial_feedback_complete() && ability.because("Initial marking is not complete")
        })
        .allow("feedback.new.allow_agreed_graders", Action::New, |ability, f| {
            f.is_agreed() && ability.has_capability(Capability::AddAgreedGrade, f.coursework())
        })
        .allow("feedback.new.allow_initial_assessors_to_agree", Action::New, |ability, f| {
            f.is_agreed()
                && ability.has_capability(Capability::AddAllocatedAgreedGrade, f.coursework())
                && f.submission.is_initial_assessor(ability.actor())
        });

    feedback.delegate("feedback.create.allow_when_new_allowed", Action::Create, Action::New);

    // show
    feedback
        .allow("feedback.show.allow_grade_administrators", Action::Show, |ability, f| {
            ability.has_capability(Capability::AdministerGrades, f.coursework())
        })
        .allow("feedback.show.allow_grade_viewers", Action::Show, |ability, f| {
            ability.has_capability(Capability::ViewAllGradesAtAllTimes, f.coursework())
        })
        .allow("feedback.show.allow_student_when_published", Action::Show, |ability, f| {
            f.submission.belongs_to(ability.actor()) && f.is_published()
        })
        .prevent("feedback.show.prevent_student_before_release", Action::Show, |ability, f| {
            f.submission.belongs_to(ability.actor()) && ability.because("Feedback has not been released yet")
        })
        .allow("feedback.show.allow_author", Action::Show, |ability, f| f.authored_by(ability.actor()))
        .prevent("feedback.show.prevent_unallocated_assessors", Action::Show, |ability, f| {
            f.coursework().marking.allocation_enabled
                && !f.submission.is_allocated_to_any_stage(ability.actor())
                && ability.because("You are not allocated to this submission")
        })
        .allow("feedback.show.allow_agreed_to_graders", Action::Show, |ability, f| {
            f.is_agreed()
                && (ability.has_capability(Capability::AddAgreedGrade, f.coursework())
                    || f.submission.is_initial_assessor(ability.actor()))
        })
        .allow("feedback.show.allow_initial_to_assessors", Action::Show, |ability, f| {
            let marking = &f.coursework().marking;
            f.is_initial()
                && ability.has_capability(Capability::AddInitialGrade, f.coursework())
                && (!marking.has_multiple_markers()
                    || f.submission.initial_feedback_complete()
                    || !marking.blind_marking)
        });

    // edit
    feedback
        .prevent("feedback.edit.prevent_unsaved", Action::Edit, |ability, f| {
            !f.persisted() && ability.because("The feedback has not been saved yet")
        })
        .prevent("feedback.edit.prevent_when_published", Action::Edit, |ability, f| {
            f.is_published() && ability.because("The feedback has been published")
        })
        .allow("feedback.edit.allow_grade_administrators", Action::Edit, |ability, f| {
            ability.has_capability(Capability::AdministerGrades, f.coursework())
        })
        .prevent("feedback.edit.prevent_initial_after_agreement", Action::Edit, |ability, f| {
            f.is_initial() && f.submission.has_final_feedback() && ability.because("An agreed grade has already been given")
        })
        .prevent("feedback.edit.prevent_after_editing_time", Action::Edit, |ability, f| {
            let expired = f
                .coursework()
                .marking
                .grade_editing_time
                .map_or(false, |seconds| f.age_seconds(ability.now()) > i64::from(seconds));
            f.is_initial() && f.finalised && expired && ability.because("The grade editing time has expired")
        })
        .allow("feedback.edit.allow_own_draft", Action::Edit, |ability, f| {
            f.authored_by(ability.actor()) && !f.finalised
        })
        .allow("feedback.edit.allow_own_initial_mark", Action::Edit, |ability, f| {
            f.is_initial()
                && f.authored_by(ability.actor())
                && ability.has_capability(Capability::EditInitialGrade, f.coursework())
        })
        .allow("feedback.edit.allow_agreed_graders", Action::Edit, |ability, f| {
            f.is_agreed() && ability.has_capability(Capability::EditAgreedGrade, f.coursework())
        })
        .allow("feedback.edit.allow_initial_assessors_to_agree", Action::Edit, |ability, f| {
            f.is_agreed()
                && ability.has_capability(Capability::EditAllocatedAgreedGrade, f.coursework())
                && f.submission.is_initial_assessor(ability.actor())
        });

    feedback.delegate("feedback.update.allow_when_edit_allowed", Action::Update, Action::Edit);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceKind;

    #[test]
    fn test_group_sizes() {
        let mut rules = RuleSet::new();
        register(&mut rules);
        let count = |action| rules.names_for(action, ResourceKind::Feedback).len();

        assert_eq!(count(Action::New), 13);
        assert_eq!(count(Action::Create), 1);
        assert_eq!(count(Action::Show), 8);
        assert_eq!(count(Action::Edit), 9);
        assert_eq!(count(Action::Update), 1);
    }

    #[test]
    fn test_unknown_stage_is_checked_before_administrator_override() {
        let mut rules = RuleSet::new();
        register(&mut rules);
        let names = rules.names_for(Action::New, ResourceKind::Feedback);
        let position = |name: &str| names.iter().position(|n| *n == name);

        assert!(position("feedback.new.prevent_unknown_stage").is_some());
        assert!(position("feedback.new.prevent_unknown_stage") < position("feedback.new.allow_grade_administrators"));
    }

    #[test]
    fn test_administrator_override_precedes_allocation_checks() {
        let mut rules = RuleSet::new();
        register(&mut rules);
        let names = rules.names_for(Action::Show, ResourceKind::Feedback);

        assert_eq!(names[0], "feedback.show.allow_grade_administrators");
        let prevent = names
            .iter()
            .position(|name| *name == "feedback.show.prevent_unallocated_assessors");
        assert!(prevent > Some(0));
    }
}
