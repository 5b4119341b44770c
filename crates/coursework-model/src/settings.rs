//! Marking settings for a coursework
//!
//! This module provides the settings that shape the marking workflow:
//! how many independent markers there are, whether markers are allocated,
//! whether later stages only see a sample, and the moderation agreement.

use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// Marking workflow settings.
///
/// # Examples
///
/// ```
/// use coursework_model::MarkingSettings;
///
/// let settings = MarkingSettings::default();
/// assert!(!settings.has_multiple_markers());
///
/// let double = MarkingSettings::double_marked();
/// assert_eq!(double.initial_stages().len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkingSettings {
    /// Number of independent initial assessors (1 = single marking)
    #[serde(default = "default_assessors")]
    pub number_of_initial_assessors: u8,

    /// Markers are allocated to individual students or groups
    #[serde(default)]
    pub allocation_enabled: bool,

    /// Stages after the first only mark a sample of submissions
    #[serde(default)]
    pub sampling_enabled: bool,

    /// A moderator confirms or disputes finalised marks
    #[serde(default)]
    pub moderation_agreement_enabled: bool,

    /// Seconds after creation during which an assessor may still change a
    /// finalised initial grade (None = no limit)
    #[serde(default)]
    pub grade_editing_time: Option<u32>,

    /// Initial markers cannot see each other's marks until all are in
    #[serde(default)]
    pub blind_marking: bool,
}

fn default_assessors() -> u8 {
    1
}

impl Default for MarkingSettings {
    fn default() -> Self {
        Self {
            number_of_initial_assessors: default_assessors(),
            allocation_enabled: false,
            sampling_enabled: false,
            moderation_agreement_enabled: false,
            grade_editing_time: None,
            blind_marking: false,
        }
    }
}

impl MarkingSettings {
    /// Settings for two independent markers followed by an agreed grade.
    pub fn double_marked() -> Self {
        Self {
            number_of_initial_assessors: 2,
            ..Self::default()
        }
    }

    /// Check if more than one initial assessor marks each submission.
    pub fn has_multiple_markers(&self) -> bool {
        self.number_of_initial_assessors > 1
    }

    /// All initial assessor stages in order.
    pub fn initial_stages(&self) -> Vec<Stage> {
        (1..=self.number_of_initial_assessors.max(1))
            .map(Stage::Assessor)
            .collect()
    }

    /// The stage whose grade is released to the student.
    ///
    /// The agreed grade with multiple markers, the single assessor's
    /// grade otherwise.
    pub fn final_stage(&self) -> Stage {
        if self.has_multiple_markers() {
            Stage::FinalAgreed
        } else {
            Stage::Assessor(1)
        }
    }

    /// Check if a stage exists in this workflow.
    ///
    /// The agreed stage only exists with multiple markers; the moderator
    /// stage only with moderation agreement.
    pub fn has_stage(&self, stage: Stage) -> bool {
        match stage {
            Stage::Assessor(n) => n >= 1 && n <= self.number_of_initial_assessors.max(1),
            Stage::FinalAgreed => self.final_stage() == Stage::FinalAgreed,
            Stage::Moderator => self.moderation_agreement_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marking_settings_default() {
        let settings = MarkingSettings::default();
        assert_eq!(settings.number_of_initial_assessors, 1);
        assert!(!settings.allocation_enabled);
        assert!(!settings.sampling_enabled);
        assert_eq!(settings.initial_stages(), vec![Stage::Assessor(1)]);
    }

    #[test]
    fn test_has_stage() {
        let single = MarkingSettings::default();
        assert!(single.has_stage(Stage::Assessor(1)));
        assert!(!single.has_stage(Stage::Assessor(2)));
        assert!(!single.has_stage(Stage::FinalAgreed));
        assert!(!single.has_stage(Stage::Moderator));

        let mut double = MarkingSettings::double_marked();
        double.moderation_agreement_enabled = true;
        assert!(double.has_stage(Stage::Assessor(2)));
        assert!(double.has_stage(Stage::FinalAgreed));
        assert!(double.has_stage(Stage::Moderator));
    }

    #[test]
    fn test_final_stage() {
        assert_eq!(MarkingSettings::default().final_stage(), Stage::Assessor(1));
        assert_eq!(MarkingSettings::double_marked().final_stage(), Stage::FinalAgreed);
    }

    #[test]
    fn test_marking_settings_deserialize_defaults() {
        let settings: MarkingSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.number_of_initial_assessors, 1);
        assert!(settings.grade_editing_time.is_none());
    }
}
