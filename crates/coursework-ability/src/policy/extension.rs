//! Deadline extension rules.

use coursework_model::DeadlineExtension;

use super::extensions_enabled;
use crate::actions::Action;
use crate::capabilities::Capability;
use crate::ruleset::RuleSet;

pub(super) fn register(rules: &mut RuleSet) {
    let mut extension = rules.target::<DeadlineExtension>();

    extension
        .prevent("deadline_extension.new.prevent_when_disabled", Action::New, |ability, e| {
            !extensions_enabled(ability, &e.coursework) && ability.because("Extensions are not enabled")
        })
        .prevent("deadline_extension.new.prevent_without_deadline", Action::New, |ability, e| {
            !e.coursework.has_deadline() && ability.because("The coursework has no deadline")
        })
        .prevent("deadline_extension.new.prevent_when_exists", Action::New, |ability, e| {
            (e.persisted() || e.coursework.extension_for(&e.allocatable).is_some())
                && ability.because("An extension already exists")
        })
        .prevent("deadline_extension.new.prevent_after_finalisation", Action::New, |ability, e| {
            e.submission_finalised() && ability.because("The submission has already been finalised")
        })
        .allow("deadline_extension.new.allow_granters", Action::New, |ability, e| {
            ability.has_capability(Capability::GrantExtensions, &e.coursework)
        });

    extension.delegate("deadline_extension.create.allow_when_new_allowed", Action::Create, Action::New);

    extension
        .allow("deadline_extension.show.allow_granters", Action::Show, |ability, e| {
            ability.has_capability(Capability::GrantExtensions, &e.coursework)
        })
        .allow("deadline_extension.show.allow_viewers", Action::Show, |ability, e| {
            ability.has_capability(Capability::ViewExtensions, &e.coursework)
        })
        .allow("deadline_extension.show.allow_own", Action::Show, |ability, e| e.belongs_to(ability.actor()));

    extension
        .prevent("deadline_extension.edit.prevent_unsaved", Action::Edit, |ability, e| {
            !e.persisted() && ability.because("The extension has not been saved yet")
        })
        .prevent("deadline_extension.edit.prevent_when_disabled", Action::Edit, |ability, e| {
            !extensions_enabled(ability, &e.coursework) && ability.because("Extensions are not enabled")
        })
        .prevent("deadline_extension.edit.prevent_after_finalisation", Action::Edit, |ability, e| {
            e.submission_finalised() && ability.because("The submission has already been finalised")
        })
        .allow("deadline_extension.edit.allow_granters", Action::Edit, |ability, e| {
            ability.has_capability(Capability::GrantExtensions, &e.coursework)
        });

    extension.delegate("deadline_extension.update.allow_when_edit_allowed", Action::Update, Action::Edit);
}
