//! # Actions
//!
//! Defines the verbs an actor can attempt against a coursework resource.
//! Rules are registered per (action, resource type) pair.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Actions that can be attempted on coursework resources.
///
/// - **New**: Open the form for a resource that does not exist yet
/// - **Create**: Save a new resource (allowed whenever `New` is)
/// - **Show**: View a resource
/// - **Edit**: Open an existing resource for changes
/// - **Update**: Save changes (allowed whenever `Edit` is)
/// - **Finalise**: Lock a submission against further changes
/// - **Revert**: Unlock a finalised submission
/// - **Publish**: Release grades to the student
/// - **ViewPlagiarism**: See plagiarism reports for a submission
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Open the form for a new resource.
    New,

    /// Save a new resource.
    Create,

    /// View a resource.
    Show,

    /// Open an existing resource for changes.
    Edit,

    /// Save changes to an existing resource.
    Update,

    /// Lock a submission against further changes.
    Finalise,

    /// Unlock a finalised submission.
    Revert,

    /// Release grades to the student.
    Publish,

    /// See plagiarism reports.
    ViewPlagiarism,
}

impl Action {
    /// Get the string representation of the action.
    ///
    /// # Returns
    ///
    /// A static string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::New => "new",
            Action::Create => "create",
            Action::Show => "show",
            Action::Edit => "edit",
            Action::Update => "update",
            Action::Finalise => "finalise",
            Action::Revert => "revert",
            Action::Publish => "publish",
            Action::ViewPlagiarism => "view_plagiarism",
        }
    }

    /// Parse action from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, supports aliases)
    ///
    /// # Returns
    ///
    /// `Some(Action)` if valid, `None` otherwise
    ///
    /// # Example
    ///
    /// ```
    /// use coursework_ability::actions::Action;
    ///
    /// assert_eq!(Action::parse("new"), Some(Action::New));
    /// assert_eq!(Action::parse("view"), Some(Action::Show)); // Alias
    /// assert_eq!(Action::parse("finalize"), Some(Action::Finalise)); // Alias
    /// assert_eq!(Action::parse("destroy"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "new" => Some(Action::New),
            "create" => Some(Action::Create),
            "show" | "view" => Some(Action::Show),
            "edit" => Some(Action::Edit),
            "update" => Some(Action::Update),
            "finalise" | "finalize" => Some(Action::Finalise),
            "revert" | "unfinalise" | "unfinalize" => Some(Action::Revert),
            "publish" | "release" => Some(Action::Publish),
            "view_plagiarism" => Some(Action::ViewPlagiarism),
            _ => None,
        }
    }

    /// Get all actions.
    pub fn all() -> Vec<Self> {
        vec![
            Action::New,
            Action::Create,
            Action::Show,
            Action::Edit,
            Action::Update,
            Action::Finalise,
            Action::Revert,
            Action::Publish,
            Action::ViewPlagiarism,
        ]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::parse(s).ok_or_else(|| format!("unknown action: {}", s))
    }
}
