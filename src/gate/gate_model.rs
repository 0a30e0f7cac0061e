use serde::{Deserialize, Serialize};

/// An attempt to leave the editing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitAction {
    Close,
    /// Switch to another category/tab of the same surface.
    ChangeCategory(String),
    NavigateAway(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptChoice {
    /// Drop the edits and run the requested exit.
    Discard,
    /// Cancel the exit and keep editing.
    Stay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The exit ran and the tracker was reset.
    Proceeded(ExitAction),
    /// The form is dirty; a confirmation prompt is now pending.
    Prompted,
    /// The user chose to stay; nothing changed.
    Stayed,
    /// `resolve` was called with no prompt pending.
    NoPrompt,
}

/// Labels shown on the confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptText {
    pub title: String,
    pub description: String,
    pub confirm_text: String,
    pub cancel_text: String,
}

impl Default for PromptText {
    fn default() -> Self {
        Self {
            title: "Unsaved changes".to_string(),
            description: "You have unsaved changes. Do you really want to leave? \
                          Your changes will be lost."
                .to_string(),
            confirm_text: "Leave".to_string(),
            cancel_text: "Stay".to_string(),
        }
    }
}
