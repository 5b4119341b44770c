//! Marking stages
//!
//! This module defines the stages a submission passes through when it is
//! marked, from the independent initial assessments to the agreed grade
//! and the optional moderation step.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the marking workflow.
///
/// Stages are ordered: every initial assessor stage comes before the agreed
/// grade stage, which comes before moderation.
///
/// # Identifiers
///
/// - **Assessor(n)**: `assessor_1`, `assessor_2`, ... (initial, independent marks)
/// - **FinalAgreed**: `final_agreed_1` (grade agreed between the initial assessors)
/// - **Moderator**: `moderator` (moderation agreement on an existing mark)
///
/// In single-marker coursework `assessor_1` is the only grading stage and its
/// mark is the final one; there is no agreed stage.
///
/// # Examples
///
/// ```
/// use coursework_model::Stage;
///
/// let stage = Stage::parse("assessor_2").unwrap();
/// assert_eq!(stage, Stage::Assessor(2));
/// assert!(stage.is_initial());
/// assert!(Stage::Assessor(2) < Stage::FinalAgreed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Stage {
    /// Independent initial assessment, numbered from 1.
    Assessor(u8),

    /// Agreed grade reached after the initial assessments.
    FinalAgreed,

    /// Moderation of an existing mark.
    Moderator,
}

impl Stage {
    /// Check if this is one of the independent initial assessor stages.
    pub fn is_initial(&self) -> bool {
        matches!(self, Stage::Assessor(_))
    }

    /// Check if this is the agreed grade stage.
    pub fn is_agreed(&self) -> bool {
        matches!(self, Stage::FinalAgreed)
    }

    /// Check if this is the moderation stage.
    pub fn is_moderation(&self) -> bool {
        matches!(self, Stage::Moderator)
    }

    /// Parse a stage identifier such as `assessor_1` or `final_agreed_1`.
    ///
    /// # Arguments
    ///
    /// * `s` - Stage identifier (case-insensitive)
    ///
    /// # Returns
    ///
    /// `Some(Stage)` if valid, `None` otherwise. Assessor numbers start at 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use coursework_model::Stage;
    ///
    /// assert_eq!(Stage::parse("final_agreed_1"), Some(Stage::FinalAgreed));
    /// assert_eq!(Stage::parse("MODERATOR"), Some(Stage::Moderator));
    /// assert_eq!(Stage::parse("assessor_0"), None);
    /// assert_eq!(Stage::parse("invalid"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        match s.as_str() {
            "final_agreed_1" | "final_agreed" => Some(Self::FinalAgreed),
            "moderator" => Some(Self::Moderator),
            other => {
                let number: u8 = other.strip_prefix("assessor_")?.parse().ok()?;
                (number > 0).then_some(Self::Assessor(number))
            }
        }
    }

    /// Get the stage identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use coursework_model::Stage;
    ///
    /// assert_eq!(Stage::Assessor(1).identifier(), "assessor_1");
    /// assert_eq!(Stage::FinalAgreed.identifier(), "final_agreed_1");
    /// ```
    pub fn identifier(&self) -> String {
        match self {
            Self::Assessor(n) => format!("assessor_{}", n),
            Self::FinalAgreed => "final_agreed_1".to_string(),
            Self::Moderator => "moderator".to_string(),
        }
    }

    /// Get a human-readable display name for the stage.
    pub fn display_name(&self) -> String {
        match self {
            Self::Assessor(n) => format!("Assessor {}", n),
            Self::FinalAgreed => "Agreed grade".to_string(),
            Self::Moderator => "Moderator".to_string(),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}

impl TryFrom<String> for Stage {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Stage::parse(&value).ok_or_else(|| format!("unknown stage identifier: {}", value))
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.identifier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_ordering() {
        assert!(Stage::Assessor(1) < Stage::Assessor(2));
        assert!(Stage::Assessor(3) < Stage::FinalAgreed);
        assert!(Stage::FinalAgreed < Stage::Moderator);
    }

    #[test]
    fn test_stage_parse() {
        assert_eq!(Stage::parse("assessor_1"), Some(Stage::Assessor(1)));
        assert_eq!(Stage::parse("Assessor_3"), Some(Stage::Assessor(3)));
        assert_eq!(Stage::parse("final_agreed_1"), Some(Stage::FinalAgreed));
        assert_eq!(Stage::parse("moderator"), Some(Stage::Moderator));
        assert_eq!(Stage::parse("assessor_"), None);
        assert_eq!(Stage::parse("assessor_0"), None);
        assert_eq!(Stage::parse("reviewer"), None);
    }

    #[test]
    fn test_stage_kinds() {
        assert!(Stage::Assessor(1).is_initial());
        assert!(!Stage::FinalAgreed.is_initial());
        assert!(Stage::FinalAgreed.is_agreed());
        assert!(Stage::Moderator.is_moderation());
    }

    #[test]
    fn test_stage_serializes_as_identifier() {
        let json = serde_json::to_string(&Stage::Assessor(2)).unwrap();
        assert_eq!(json, "\"assessor_2\"");

        let stage: Stage = serde_json::from_str("\"final_agreed_1\"").unwrap();
        assert_eq!(stage, Stage::FinalAgreed);

        assert!(serde_json::from_str::<Stage>("\"nobody\"").is_err());
    }
}
