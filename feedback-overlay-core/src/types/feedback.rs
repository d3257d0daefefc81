use serde::{Deserialize, Serialize};

/// Longest accepted feedback text, in characters.
pub const MAX_FEEDBACK_CHARS: usize = 1000;

/// Popover quick-form submission status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Active,
    Success,
    Error,
}
