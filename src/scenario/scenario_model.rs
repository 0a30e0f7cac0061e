use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    form::form_model::Surface,
    gate::gate_model::PromptChoice,
    snapshot::snapshot_model::{FieldMap, FieldValue},
    tracker::tracker_model::{TrackerConfig, TrackerState},
};

/// A scripted sequence of host events, replayed against one form session.
/// Usually loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    /// Human-readable name
    pub name: String,

    /// Which editing surface to drive
    pub surface: Surface,

    /// Record the form opens on; `None` opens a blank form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<FieldMap>,

    /// Overrides the tracker settings from the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<TrackerConfig>,

    /// Date the save-time validation treats as today (defaults to the clock)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub today: Option<NaiveDate>,

    pub steps: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScenarioStep {
    /// Open the form on `initial`
    Open,

    /// Edit one field
    Change { field: String, value: FieldValue },

    /// Let scheduling cycles pass
    Tick {
        #[serde(default = "default_tick_count")]
        count: u32,
    },

    /// The rich-text editor finished mounting
    DependencyReady,

    /// Close through the confirmation gate
    Close,

    ChangeCategory { category: String },

    NavigateAway { target: String },

    /// Answer the pending prompt
    Choose { choice: PromptChoice },

    /// Validate and save
    Save,

    /// Throw the edits away without asking
    Discard,

    /// Check the session against expectations
    Expect(Expectation),
}

fn default_tick_count() -> u32 { 1 }

/// Expected session properties. Unset fields are not checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Expectation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dirty: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<TrackerState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompting: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,

    /// Number of exits the gate let through so far
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exits: Option<usize>,

    /// Whether the last save passed validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved: Option<bool>,
}

/// Result of one expectation check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpectationResult {
    /// Step the check belongs to (0-indexed)
    pub step_index: usize,

    /// Which property was checked, e.g. "dirty"
    pub check: String,

    pub expected: String,
    pub actual: String,
    pub passed: bool,

    /// Failure message
    pub message: Option<String>,
}

/// Result of replaying a complete scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,

    /// Whether every step ran and every expectation held
    pub passed: bool,

    pub steps_run: usize,

    pub expectation_results: Vec<ExpectationResult>,

    /// Error that stopped the replay early
    pub error: Option<String>,
}
