use std::sync::Arc;

use crate::{
    snapshot::snapshot_model::Snapshot,
    trace::{logger::TraceLogger, trace::TraceEvent},
    tracker::{
        deferred::{CapturePolicy, CaptureSource, CaptureStep, DeferredCapture},
        tracker_model::{IgnoreReason, Observation, TrackerConfig, TrackerState},
    },
};

/// Unsaved-changes tracker for one form instance.
///
/// Holds the baseline snapshot and derives the dirty flag from observed
/// snapshots. Observations are only compared while `Active`; opening,
/// deferred capture and the post-reset drain window all ignore them, which
/// keeps a form from flagging itself dirty while it populates its own fields.
///
/// The host drives time by calling [`DirtyTracker::tick`] once per
/// render/yield cycle.
#[derive(Debug)]
pub struct DirtyTracker {
    state: TrackerState,
    baseline: Snapshot,
    dirty: bool,
    pending: Option<DeferredCapture>,
    drain_remaining: u32,
    config: TrackerConfig,
    label: Option<String>,
    tracer: Option<Arc<TraceLogger>>,
    step: u64,
}

impl DirtyTracker {
    pub fn new(config: TrackerConfig) -> Self {
        DirtyTracker {
            state: TrackerState::Uninitialized,
            baseline: Snapshot::empty(),
            dirty: false,
            pending: None,
            drain_remaining: 0,
            config,
            label: None,
            tracer: None,
            step: 0,
        }
    }

    /// Name used in trace events, usually the surface name.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_tracer(mut self, tracer: Arc<TraceLogger>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_initialized(&self) -> bool {
        self.state == TrackerState::Active
    }

    pub fn is_resetting(&self) -> bool {
        self.state == TrackerState::Resetting
    }

    pub fn baseline(&self) -> &Snapshot {
        &self.baseline
    }

    pub fn has_pending_capture(&self) -> bool {
        self.pending.is_some()
    }

    // ---------------------------------------------------------------------
    // Baseline store
    // ---------------------------------------------------------------------

    /// Commit `snapshot` as the baseline and start comparing.
    pub fn set_baseline(&mut self, snapshot: Snapshot) {
        self.pending = None;
        self.baseline = snapshot;
        self.state = TrackerState::Active;
        self.dirty = false;
        self.drain_remaining = 0;

        let event = self.event("baseline_set").with_baseline(&self.baseline);
        self.trace(event);
    }

    /// Forget the baseline and raise the resetting guard for
    /// `drain_cycles` ticks.
    pub fn reset(&mut self) {
        let cancelled = self.pending.take().is_some();
        self.baseline = Snapshot::empty();
        self.dirty = false;
        self.drain_remaining = self.config.drain_cycles;
        self.state = if self.drain_remaining == 0 {
            TrackerState::Uninitialized
        } else {
            TrackerState::Resetting
        };

        let mut event = self.event("reset");
        if cancelled {
            event = event.with_note("pending capture cancelled");
        }
        self.trace(event);
    }

    // ---------------------------------------------------------------------
    // Reset/guard protocol
    // ---------------------------------------------------------------------

    /// The form opened (or re-opened on new data). Replaces whatever the
    /// tracker held before, including a capture still in flight.
    pub fn begin_capture(&mut self, opening: Snapshot, policy: CapturePolicy, source: CaptureSource) {
        self.pending = None;
        self.baseline = Snapshot::empty();
        self.dirty = false;
        self.drain_remaining = 0;
        self.state = TrackerState::Initializing;

        let event = self
            .event("begin_capture")
            .with_snapshot(&opening)
            .with_decision(format!("{:?}", policy));
        self.trace(event);

        match policy {
            CapturePolicy::Immediate | CapturePolicy::AfterCycles(0) => self.set_baseline(opening),
            CapturePolicy::AfterCycles(cycles) => {
                self.pending = Some(DeferredCapture::after_cycles(opening, cycles, source));
            }
            CapturePolicy::AwaitDependency { cycles } => {
                self.pending = Some(DeferredCapture::await_dependency(opening, cycles, source));
            }
        }
    }

    /// The dependent field (e.g. a rich-text editor) has mounted.
    pub fn mark_dependency_ready(&mut self) {
        let due = self
            .pending
            .as_mut()
            .and_then(DeferredCapture::dependency_ready);

        if let Some(snapshot) = due {
            self.set_baseline(snapshot);
        }
    }

    /// Drop a capture that has not fired yet. Returns whether one was pending.
    pub fn cancel_capture(&mut self) -> bool {
        let cancelled = self.pending.take().is_some();
        if cancelled {
            let event = self.event("capture_cancelled");
            self.trace(event);
        }
        cancelled
    }

    /// One scheduling cycle: fire a due capture, then advance the drain window.
    pub fn tick(&mut self) {
        let timeout = self.config.capture_timeout_cycles;
        let step = match self.pending.as_mut() {
            Some(pending) => pending.advance(timeout),
            None => CaptureStep::Pending,
        };

        match step {
            CaptureStep::Pending => {}
            CaptureStep::Due(snapshot) => self.set_baseline(snapshot),
            CaptureStep::TimedOut(snapshot) => {
                let event = self
                    .event("capture_timeout")
                    .with_note("dependent field never became ready; capturing anyway");
                self.trace(event);
                self.set_baseline(snapshot);
            }
        }

        if self.state == TrackerState::Resetting && self.drain_remaining > 0 {
            self.drain_remaining -= 1;
            if self.drain_remaining == 0 {
                self.state = TrackerState::Uninitialized;
                let event = self.event("drain_complete");
                self.trace(event);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Dirty evaluator
    // ---------------------------------------------------------------------

    /// Compare `current` against the baseline, unless the guard says not to.
    pub fn observe_change(&mut self, current: &Snapshot) -> Observation {
        let observation = match self.state {
            TrackerState::Uninitialized => Observation::Ignored(IgnoreReason::Uninitialized),
            TrackerState::Initializing => {
                if let Some(pending) = self.pending.as_mut() {
                    pending.record_observed(current);
                }
                Observation::Ignored(IgnoreReason::Initializing)
            }
            TrackerState::Resetting => Observation::Ignored(IgnoreReason::Resetting),
            TrackerState::Active => {
                self.dirty = *current != self.baseline;
                Observation::Evaluated { dirty: self.dirty }
            }
        };

        let event = self
            .event("observe")
            .with_snapshot(current)
            .with_decision(observation.decision())
            .with_dirty(self.dirty);
        self.trace(event);

        observation
    }

    /// Log an event raised by a collaborator (the confirmation gate), stamped
    /// with this tracker's step counter, label and state.
    pub fn record(&mut self, name: &str, decorate: impl FnOnce(TraceEvent) -> TraceEvent) {
        let event = decorate(self.event(name));
        self.trace(event);
    }

    fn event(&self, name: &str) -> TraceEvent {
        TraceEvent::now(self.step, self.state, name).with_form(self.label.as_deref())
    }

    fn trace(&mut self, event: TraceEvent) {
        self.step += 1;
        if let Some(tracer) = &self.tracer {
            tracer.log(&event);
        }
    }
}

impl Default for DirtyTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
