use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    form::{
        form_model::FormSchema,
        surfaces::format_record,
        validation::{ValidationErrors, validate},
    },
    gate::{
        gate::{ConfirmationGate, ExitHandler},
        gate_model::{ExitAction, GateOutcome, PromptChoice, PromptText},
    },
    snapshot::{
        codec::serialize,
        snapshot_model::{FieldMap, FieldValue, Snapshot},
    },
    trace::logger::TraceLogger,
    tracker::{
        tracker::DirtyTracker,
        tracker_model::{Observation, TrackerConfig, TrackerState},
    },
};

/// One editing surface wired to its own tracker and confirmation gate.
///
/// This is the contract a host form talks to: it reports opens, field edits,
/// saves and exits, and reads back whether there is anything unsaved.
#[derive(Debug)]
pub struct FormSession {
    schema: FormSchema,
    fields: FieldMap,
    tracker: DirtyTracker,
    gate: ConfirmationGate,
    open: bool,
}

impl FormSession {
    pub fn new(schema: FormSchema, config: TrackerConfig) -> Self {
        let tracker = DirtyTracker::new(config).with_label(schema.surface.name());

        FormSession {
            schema,
            fields: FieldMap::new(),
            tracker,
            gate: ConfirmationGate::new(PromptText::default()),
            open: false,
        }
    }

    pub fn with_tracer(mut self, tracer: Arc<TraceLogger>) -> Self {
        self.tracker = self.tracker.with_tracer(tracer);
        self
    }

    pub fn with_prompt(mut self, prompt: PromptText) -> Self {
        self.gate = self.gate.with_prompt(prompt);
        self
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn tracker(&self) -> &DirtyTracker {
        &self.tracker
    }

    pub fn dirty(&self) -> bool {
        self.tracker.dirty()
    }

    pub fn state(&self) -> TrackerState {
        self.tracker.state()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_prompting(&self) -> bool {
        self.gate.is_prompting()
    }

    pub fn prompt(&self) -> Option<&PromptText> {
        self.gate.prompt()
    }

    pub fn current_snapshot(&self) -> Snapshot {
        serialize(&self.fields, self.tracker.config().snapshot_mode)
    }

    // ---------------------------------------------------------------------
    // Host events
    // ---------------------------------------------------------------------

    /// Open on an existing record, or on a blank form when `initial` is `None`.
    /// `today` fills date fields that default to the current date.
    pub fn on_open(&mut self, initial: Option<&FieldMap>, today: NaiveDate) {
        self.fields = match initial {
            Some(record) => format_record(&self.schema, record, today),
            None => self.schema.blank(today),
        };
        self.open = true;

        let opening = self.current_snapshot();
        self.tracker
            .begin_capture(opening, self.schema.capture, self.schema.capture_source);
    }

    pub fn on_field_change(&mut self, key: &str, value: impl Into<FieldValue>) -> Observation {
        self.fields.set(key, value);
        let current = self.current_snapshot();
        self.tracker.observe_change(&current)
    }

    pub fn on_save_success(&mut self) {
        self.teardown();
    }

    pub fn on_discard(&mut self) {
        self.teardown();
    }

    pub fn on_close(&mut self) {
        self.teardown();
    }

    /// Validate and, if the form is acceptable, hand back what is to be saved
    /// and reset. On failure nothing changes.
    pub fn submit(&mut self, today: NaiveDate) -> Result<FieldMap, ValidationErrors> {
        validate(&self.schema, &self.fields, today)?;

        let saved = self.fields.clone();
        self.on_save_success();
        Ok(saved)
    }

    pub fn tick(&mut self) {
        self.tracker.tick();
    }

    pub fn mark_dependency_ready(&mut self) {
        self.tracker.mark_dependency_ready();
    }

    // ---------------------------------------------------------------------
    // Confirmation gate
    // ---------------------------------------------------------------------

    pub fn confirm_close(&mut self, handler: &mut dyn ExitHandler) -> GateOutcome {
        self.request_exit(ExitAction::Close, handler)
    }

    pub fn request_exit(&mut self, action: ExitAction, handler: &mut dyn ExitHandler) -> GateOutcome {
        let outcome = self.gate.request_exit(&mut self.tracker, action, handler);
        self.after_gate(&outcome);
        outcome
    }

    pub fn resolve_prompt(&mut self, choice: PromptChoice, handler: &mut dyn ExitHandler) -> GateOutcome {
        let outcome = self.gate.resolve(&mut self.tracker, choice, handler);
        self.after_gate(&outcome);
        outcome
    }

    fn after_gate(&mut self, outcome: &GateOutcome) {
        // The gate already reset the tracker.
        if let GateOutcome::Proceeded(_) = outcome {
            self.fields.clear();
            self.open = false;
        }
    }

    fn teardown(&mut self) {
        self.gate.dismiss();
        self.tracker.reset();
        self.fields.clear();
        self.open = false;
    }
}
