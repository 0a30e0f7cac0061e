use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    snapshot::{codec::fingerprint, snapshot_model::Snapshot},
    tracker::tracker_model::TrackerState,
};

/// One line of the JSONL trace. Snapshots are only ever recorded by fingerprint.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub form: Option<String>,
    pub tracker_state: String,
    pub event: String,

    pub decision: Option<String>,
    pub dirty: Option<bool>,

    pub baseline: Option<String>,
    pub snapshot: Option<String>,

    pub exit_action: Option<String>,
    pub note: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u64, state: TrackerState, event: impl ToString) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            step,
            form: None,
            tracker_state: format!("{:?}", state),
            event: event.to_string(),
            decision: None,
            dirty: None,
            baseline: None,
            snapshot: None,
            exit_action: None,
            note: None,
        }
    }

    pub fn with_form(mut self, form: Option<&str>) -> Self {
        self.form = form.map(str::to_string);
        self
    }

    pub fn with_decision(mut self, decision: impl ToString) -> Self {
        self.decision = Some(decision.to_string());
        self
    }

    pub fn with_dirty(mut self, dirty: bool) -> Self {
        self.dirty = Some(dirty);
        self
    }

    pub fn with_baseline(mut self, baseline: &Snapshot) -> Self {
        self.baseline = Some(fingerprint(baseline));
        self
    }

    pub fn with_snapshot(mut self, snapshot: &Snapshot) -> Self {
        self.snapshot = Some(fingerprint(snapshot));
        self
    }

    pub fn with_exit_action(mut self, action: impl std::fmt::Debug) -> Self {
        self.exit_action = Some(format!("{:?}", action));
        self
    }

    pub fn with_note(mut self, note: impl ToString) -> Self {
        self.note = Some(note.to_string());
        self
    }
}
