use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::{
    form::session::FormSession,
    gate::gate_model::{ExitAction, GateOutcome},
    scenario::{
        context::ScenarioContext,
        error::ScenarioError,
        scenario_model::{Expectation, ExpectationResult, Scenario, ScenarioResult, ScenarioStep},
    },
    trace::logger::TraceLogger,
    tracker::tracker_model::TrackerConfig,
};

/// Replays a scenario step by step against a fresh form session.
pub struct ScenarioRunner;

impl ScenarioRunner {
    /// Replay `scenario`. `config` applies unless the scenario carries its own.
    pub fn run(scenario: &Scenario, config: &TrackerConfig, tracer: Option<Arc<TraceLogger>>) -> ScenarioResult {
        let config = scenario.config.clone().unwrap_or_else(|| config.clone());
        let mut session = FormSession::new(scenario.surface.schema(), config);
        if let Some(tracer) = tracer {
            session = session.with_tracer(tracer);
        }

        let mut ctx = ScenarioContext::new();

        for (i, step) in scenario.steps.iter().enumerate() {
            ctx.current_step = i;

            if let Err(e) = Self::execute_step(step, i, scenario, &mut session, &mut ctx) {
                return ScenarioResult {
                    scenario_name: scenario.name.clone(),
                    passed: false,
                    steps_run: i + 1,
                    expectation_results: ctx.expectation_results,
                    error: Some(format!("Step {} failed: {}", i, e)),
                };
            }
        }

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            passed: ctx.all_passed(),
            steps_run: scenario.steps.len(),
            expectation_results: ctx.expectation_results,
            error: None,
        }
    }

    fn execute_step(
        step: &ScenarioStep,
        step_index: usize,
        scenario: &Scenario,
        session: &mut FormSession,
        ctx: &mut ScenarioContext,
    ) -> Result<(), ScenarioError> {
        match step {
            ScenarioStep::Open => {
                session.on_open(scenario.initial.as_ref(), Self::today(scenario));
                Ok(())
            }

            ScenarioStep::Change { field, value } => {
                session.on_field_change(field, value.clone());
                Ok(())
            }

            ScenarioStep::Tick { count } => {
                for _ in 0..*count {
                    session.tick();
                }
                Ok(())
            }

            ScenarioStep::DependencyReady => {
                session.mark_dependency_ready();
                Ok(())
            }

            ScenarioStep::Close => {
                session.confirm_close(&mut ctx.exits);
                Ok(())
            }

            ScenarioStep::ChangeCategory { category } => {
                if !session.schema().has_category(category) {
                    return Err(ScenarioError::UnknownCategory {
                        step: step_index,
                        category: category.clone(),
                    });
                }
                session.request_exit(ExitAction::ChangeCategory(category.clone()), &mut ctx.exits);
                Ok(())
            }

            ScenarioStep::NavigateAway { target } => {
                session.request_exit(ExitAction::NavigateAway(target.clone()), &mut ctx.exits);
                Ok(())
            }

            ScenarioStep::Choose { choice } => {
                match session.resolve_prompt(*choice, &mut ctx.exits) {
                    GateOutcome::NoPrompt => Err(ScenarioError::NoPendingPrompt { step: step_index }),
                    _ => Ok(()),
                }
            }

            ScenarioStep::Save => {
                if !session.is_open() {
                    return Err(ScenarioError::NotOpen {
                        step: step_index,
                        action: "save".to_string(),
                    });
                }
                ctx.last_save = Some(session.submit(Self::today(scenario)).map(|_| ()).map_err(|e| e.to_string()));
                Ok(())
            }

            ScenarioStep::Discard => {
                session.on_discard();
                Ok(())
            }

            ScenarioStep::Expect(expectation) => {
                let results = Self::evaluate(expectation, step_index, session, ctx);
                ctx.record(results);
                Ok(())
            }
        }
    }

    /// The scenario's pinned date, or the local clock.
    fn today(scenario: &Scenario) -> NaiveDate {
        scenario.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Compare every property the expectation names against the session.
    fn evaluate(
        expectation: &Expectation,
        step_index: usize,
        session: &FormSession,
        ctx: &ScenarioContext,
    ) -> Vec<ExpectationResult> {
        let mut results = Vec::new();
        let mut check = |name: &str, expected: Option<String>, actual: String| {
            if let Some(expected) = expected {
                let passed = expected == actual;
                let message = if passed {
                    None
                } else {
                    Some(format!("{} is {}, expected {}", name, actual, expected))
                };
                results.push(ExpectationResult {
                    step_index,
                    check: name.to_string(),
                    expected,
                    actual,
                    passed,
                    message,
                });
            }
        };

        check("dirty", expectation.dirty.map(|v| v.to_string()), session.dirty().to_string());
        check(
            "state",
            expectation.state.map(|s| format!("{:?}", s)),
            format!("{:?}", session.state()),
        );
        check(
            "prompting",
            expectation.prompting.map(|v| v.to_string()),
            session.is_prompting().to_string(),
        );
        check("open", expectation.open.map(|v| v.to_string()), session.is_open().to_string());
        check(
            "exits",
            expectation.exits.map(|v| v.to_string()),
            ctx.exits.performed.len().to_string(),
        );

        let saved = match &ctx.last_save {
            Some(Ok(())) => "true".to_string(),
            Some(Err(_)) => "false".to_string(),
            None => "not attempted".to_string(),
        };
        check("saved", expectation.saved.map(|v| v.to_string()), saved);

        results
    }
}
