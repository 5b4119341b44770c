//! Submission rules.

use coursework_model::{Submission, SubmissionState};

use super::{deadline_applies, deadline_passed, submission_window_open};
use crate::actions::Action;
use crate::capabilities::Capability;
use crate::ruleset::RuleSet;

pub(super) fn register(rules: &mut RuleSet) {
    let mut submission = rules.target::<Submission>();

    // new
    submission
        .prevent("submission.new.prevent_when_exists", Action::New, |ability, s| {
            (s.persisted() || s.coursework.has_submission_for(&s.allocatable))
                && ability.because("Submission already exists")
        })
        .allow("submission.new.allow_on_behalf_of_students", Action::New, |ability, s| {
            ability.has_capability(Capability::SubmitOnBehalfOf, &s.coursework)
        })
        .prevent("submission.new.prevent_for_someone_else", Action::New, |ability, s| {
            !s.belongs_to(ability.actor()) && ability.because("You can only submit for yourself")
        })
        .prevent("submission.new.prevent_before_start", Action::New, |ability, s| {
            !s.coursework.has_started(ability.now()) && ability.because("The coursework has not started yet")
        })
        .allow("submission.new.allow_own_while_open", Action::New, |ability, s| {
            if !s.belongs_to(ability.actor()) || !ability.has_capability(Capability::Submit, &s.coursework) {
                return false;
            }
            if !submission_window_open(ability, &s.coursework, &s.allocatable) {
                ability.set_message("The deadline has passed");
                return false;
            }
            true
        });

    submission.delegate("submission.create.allow_when_new_allowed", Action::Create, Action::New);

    // show
    submission
        .allow("submission.show.allow_own", Action::Show, |ability, s| s.belongs_to(ability.actor()))
        .allow("submission.show.allow_grade_administrators", Action::Show, |ability, s| {
            ability.has_capability(Capability::AdministerGrades, &s.coursework)
        })
        .allow("submission.show.allow_grade_viewers", Action::Show, |ability, s| {
            ability.has_capability(Capability::ViewAllGradesAtAllTimes, &s.coursework)
        })
        .allow("submission.show.allow_allocated_assessors", Action::Show, |ability, s| {
            s.coursework.marking.allocation_enabled && s.is_allocated_to_any_stage(ability.actor())
        })
        .allow("submission.show.allow_initial_assessors_without_allocation", Action::Show, |ability, s| {
            !s.coursework.marking.allocation_enabled
                && ability.has_capability(Capability::AddInitialGrade, &s.coursework)
        })
        .allow("submission.show.allow_agreed_graders_after_initial_marking", Action::Show, |ability, s| {
            s.initial_feedback_complete() && ability.has_capability(Capability::AddAgreedGrade, &s.coursework)
        });

    // edit
    submission
        .prevent("submission.edit.prevent_unsaved", Action::Edit, |ability, s| {
            !s.persisted() && ability.because("The submission has not been saved yet")
        })
        .prevent("submission.edit.prevent_when_finalised", Action::Edit, |ability, s| {
            s.state >= SubmissionState::Finalised && ability.because("The submission has been finalised")
        })
        .prevent("submission.edit.prevent_while_marking", Action::Edit, |ability, s| {
            s.state >= SubmissionState::PartiallyGraded && ability.because("The submission is being marked")
        })
        .allow("submission.edit.allow_on_behalf_of_students", Action::Edit, |ability, s| {
            ability.has_capability(Capability::SubmitOnBehalfOf, &s.coursework)
        })
        .prevent("submission.edit.prevent_for_someone_else", Action::Edit, |ability, s| {
            !s.belongs_to(ability.actor()) && ability.because("You can only edit your own submission")
        })
        .prevent("submission.edit.prevent_after_deadline", Action::Edit, |ability, s| {
            !submission_window_open(ability, &s.coursework, &s.allocatable)
                && ability.because("The deadline has passed")
        })
        .allow("submission.edit.allow_own", Action::Edit, |ability, s| {
            s.belongs_to(ability.actor()) && ability.has_capability(Capability::Submit, &s.coursework)
        });

    submission.delegate("submission.update.allow_when_edit_allowed", Action::Update, Action::Edit);

    // finalise
    submission
        .prevent("submission.finalise.prevent_unsaved", Action::Finalise, |ability, s| {
            !s.persisted() && ability.because("The submission has not been saved yet")
        })
        .prevent("submission.finalise.prevent_when_finalised", Action::Finalise, |ability, s| {
            s.state >= SubmissionState::Finalised && ability.because("The submission has already been finalised")
        })
        .prevent("submission.finalise.prevent_while_marking", Action::Finalise, |ability, s| {
            s.state >= SubmissionState::PartiallyGraded && ability.because("The submission is being marked")
        })
        .prevent("submission.finalise.prevent_without_files", Action::Finalise, |ability, s| {
            !s.has_files && ability.because("There are no files to finalise")
        })
        .allow("submission.finalise.allow_on_behalf_of_students", Action::Finalise, |ability, s| {
            ability.has_capability(Capability::SubmitOnBehalfOf, &s.coursework)
        })
        .prevent("submission.finalise.prevent_early_finalisation", Action::Finalise, |ability, s| {
            !s.coursework.allow_early_finalisation
                && deadline_applies(ability, &s.coursework, &s.allocatable)
                && !deadline_passed(ability, &s.coursework, &s.allocatable)
                && ability.because("Early finalisation is not allowed")
        })
        .allow("submission.finalise.allow_own", Action::Finalise, |ability, s| {
            s.belongs_to(ability.actor()) && ability.has_capability(Capability::Submit, &s.coursework)
        });

    // revert
    submission
        .prevent("submission.revert.prevent_when_not_finalised", Action::Revert, |ability, s| {
            s.state < SubmissionState::Finalised && ability.because("The submission has not been finalised")
        })
        .prevent("submission.revert.prevent_when_published", Action::Revert, |ability, s| {
            s.state == SubmissionState::Published && ability.because("The submission has been published")
        })
        .prevent("submission.revert.prevent_when_marked", Action::Revert, |ability, s| {
            s.has_feedback() && ability.because("The submission has already been marked")
        })
        .allow("submission.revert.allow_reverters", Action::Revert, |ability, s| {
            ability.has_capability(Capability::RevertFinalised, &s.coursework)
        });

    // publish
    submission
        .prevent("submission.publish.prevent_when_published", Action::Publish, |ability, s| {
            s.state == SubmissionState::Published && ability.because("Already published")
        })
        .prevent("submission.publish.prevent_before_fully_graded", Action::Publish, |ability, s| {
            s.state < SubmissionState::FullyGraded && ability.because("The submission has not been fully graded")
        })
        .prevent("submission.publish.prevent_when_plagiarism_blocks", Action::Publish, |ability, s| {
            s.release_blocked_by_plagiarism() && ability.because("Plagiarism investigation prevents release")
        })
        .allow("submission.publish.allow_publishers", Action::Publish, |ability, s| {
            ability.has_capability(Capability::Publish, &s.coursework)
        });

    // view_plagiarism
    submission
        .allow("submission.view_plagiarism.allow_grade_administrators", Action::ViewPlagiarism, |ability, s| {
            ability.has_capability(Capability::AdministerGrades, &s.coursework)
        })
        .allow("submission.view_plagiarism.allow_grade_viewers", Action::ViewPlagiarism, |ability, s| {
            ability.has_capability(Capability::ViewAllGradesAtAllTimes, &s.coursework)
        })
        .allow("submission.view_plagiarism.allow_allocated_assessors", Action::ViewPlagiarism, |ability, s| {
            s.coursework.marking.allocation_enabled && s.is_allocated_to_any_stage(ability.actor())
        })
        .allow(
            "submission.view_plagiarism.allow_initial_assessors_without_allocation",
            Action::ViewPlagiarism,
            |ability, s| {
                !s.coursework.marking.allocation_enabled
                    && ability.has_capability(Capability::AddInitialGrade, &s.coursework)
            },
        )
        .allow("submission.view_plagiarism.allow_own_when_shown", Action::ViewPlagiarism, |ability, s| {
            s.coursework.show_plagiarism_to_students && s.belongs_to(ability.actor())
        });
}
