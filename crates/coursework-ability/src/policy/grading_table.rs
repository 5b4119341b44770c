//! Grading table row rules.

use coursework_model::GradingTableRow;

use crate::actions::Action;
use crate::capabilities::Capability;
use crate::ruleset::RuleSet;

pub(super) fn register(rules: &mut RuleSet) {
    rules
        .target::<GradingTableRow>()
        .allow("grading_table_row.show.allow_grade_administrators", Action::Show, |ability, row| {
            ability.has_capability(Capability::AdministerGrades, &row.coursework)
        })
        .allow("grading_table_row.show.allow_grade_viewers", Action::Show, |ability, row| {
            ability.has_capability(Capability::ViewAllGradesAtAllTimes, &row.coursework)
        })
        .allow("grading_table_row.show.allow_allocated_assessors", Action::Show, |ability, row| {
            row.is_allocated_to_any_stage(ability.actor())
        })
        .prevent("grading_table_row.show.prevent_unallocated_assessors", Action::Show, |ability, row| {
            row.coursework.marking.allocation_enabled && ability.because("You are not allocated to this student")
        })
        .allow("grading_table_row.show.allow_initial_assessors", Action::Show, |ability, row| {
            ability.has_capability(Capability::AddInitialGrade, &row.coursework)
        })
        .allow("grading_table_row.show.allow_agreed_graders", Action::Show, |ability, row| {
            ability.has_capability(Capability::AddAgreedGrade, &row.coursework)
        })
        .allow("grading_table_row.show.allow_moderators", Action::Show, |ability, row| {
            ability.has_capability(Capability::Moderate, &row.coursework)
        });
}
