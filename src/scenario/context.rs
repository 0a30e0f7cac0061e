use crate::{gate::gate::ExitLog, scenario::scenario_model::ExpectationResult};

/// Execution state of a scenario being replayed.
#[derive(Debug, Clone, Default)]
pub struct ScenarioContext {
    /// Current step index (0-based)
    pub current_step: usize,

    /// All expectation results collected so far
    pub expectation_results: Vec<ExpectationResult>,

    /// Exits the gate let through
    pub exits: ExitLog,

    /// Outcome of the most recent save, if any
    pub last_save: Option<Result<(), String>>,
}

impl ScenarioContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, results: Vec<ExpectationResult>) {
        self.expectation_results.extend(results);
    }

    pub fn all_passed(&self) -> bool {
        self.expectation_results.iter().all(|r| r.passed)
    }

    pub fn pass_count(&self) -> usize {
        self.expectation_results.iter().filter(|r| r.passed).count()
    }

    pub fn fail_count(&self) -> usize {
        self.expectation_results.iter().filter(|r| !r.passed).count()
    }
}
