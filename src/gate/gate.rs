use crate::{
    gate::gate_model::{ExitAction, GateOutcome, PromptChoice, PromptText},
    tracker::tracker::DirtyTracker,
};

/// Carries out an exit once the gate lets it through.
pub trait ExitHandler {
    fn perform(&mut self, action: &ExitAction);
}

impl<F: FnMut(&ExitAction)> ExitHandler for F {
    fn perform(&mut self, action: &ExitAction) {
        self(action)
    }
}

/// Handler that only records what it was asked to do.
#[derive(Debug, Default, Clone)]
pub struct ExitLog {
    pub performed: Vec<ExitAction>,
}

impl ExitHandler for ExitLog {
    fn perform(&mut self, action: &ExitAction) {
        self.performed.push(action.clone());
    }
}

/// Interposes a discard/stay prompt in front of exits from a dirty form.
#[derive(Debug, Default)]
pub struct ConfirmationGate {
    pending: Option<ExitAction>,
    prompt: PromptText,
}

impl ConfirmationGate {
    pub fn new(prompt: PromptText) -> Self {
        ConfirmationGate {
            pending: None,
            prompt,
        }
    }

    pub fn with_prompt(mut self, prompt: PromptText) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn is_prompting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_action(&self) -> Option<&ExitAction> {
        self.pending.as_ref()
    }

    /// The prompt to display, if one is pending.
    pub fn prompt(&self) -> Option<&PromptText> {
        self.pending.as_ref().map(|_| &self.prompt)
    }

    /// Drop a pending prompt without running its exit.
    pub fn dismiss(&mut self) -> Option<ExitAction> {
        self.pending.take()
    }

    /// Try to leave. A dirty tracker defers the exit behind a prompt; a clean
    /// one runs it straight away and resets.
    pub fn request_exit(
        &mut self,
        tracker: &mut DirtyTracker,
        action: ExitAction,
        handler: &mut dyn ExitHandler,
    ) -> GateOutcome {
        if tracker.dirty() {
            Self::log(tracker, "prompt_shown", &action);
            self.pending = Some(action);
            return GateOutcome::Prompted;
        }

        self.proceed(tracker, action, handler)
    }

    /// Answer the pending prompt.
    pub fn resolve(
        &mut self,
        tracker: &mut DirtyTracker,
        choice: PromptChoice,
        handler: &mut dyn ExitHandler,
    ) -> GateOutcome {
        let action = match self.pending.take() {
            Some(a) => a,
            None => return GateOutcome::NoPrompt,
        };

        match choice {
            PromptChoice::Discard => self.proceed(tracker, action, handler),
            PromptChoice::Stay => {
                Self::log(tracker, "stayed", &action);
                GateOutcome::Stayed
            }
        }
    }

    fn proceed(
        &mut self,
        tracker: &mut DirtyTracker,
        action: ExitAction,
        handler: &mut dyn ExitHandler,
    ) -> GateOutcome {
        self.pending = None;
        handler.perform(&action);
        Self::log(tracker, "exit_performed", &action);
        tracker.reset();
        GateOutcome::Proceeded(action)
    }

    // Gate events go through the tracker's tracer so they share its step
    // sequence and form label.
    fn log(tracker: &mut DirtyTracker, name: &str, action: &ExitAction) {
        let dirty = tracker.dirty();
        tracker.record(name, |e| e.with_dirty(dirty).with_exit_action(action));
    }
}
