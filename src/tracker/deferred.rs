use serde::{Deserialize, Serialize};

use crate::snapshot::snapshot_model::Snapshot;

/// When the baseline is taken after a form opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapturePolicy {
    Immediate,
    /// Capture after this many scheduling cycles.
    AfterCycles(u32),
    /// Capture `cycles` ticks after the dependent field reports ready.
    AwaitDependency { cycles: u32 },
}

/// Which snapshot a deferred capture commits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureSource {
    /// The snapshot computed when the form opened.
    #[default]
    Opening,
    /// The last snapshot observed while initializing, so a dependent field's
    /// own normalization ends up in the baseline.
    LatestObserved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStep {
    Pending,
    Due(Snapshot),
    TimedOut(Snapshot),
}

/// A baseline capture scheduled for later.
///
/// Owned by the tracker that scheduled it: it is dropped on reset, re-open
/// or when the tracker itself goes away, so it can never write into a form
/// that is no longer there.
#[derive(Debug, Clone)]
pub struct DeferredCapture {
    opening: Snapshot,
    latest: Option<Snapshot>,
    source: CaptureSource,
    remaining: u32,
    awaiting_dependency: bool,
    waited: u32,
}

impl DeferredCapture {
    pub fn after_cycles(opening: Snapshot, cycles: u32, source: CaptureSource) -> Self {
        DeferredCapture {
            opening,
            latest: None,
            source,
            remaining: cycles,
            awaiting_dependency: false,
            waited: 0,
        }
    }

    pub fn await_dependency(opening: Snapshot, cycles: u32, source: CaptureSource) -> Self {
        DeferredCapture {
            awaiting_dependency: true,
            ..Self::after_cycles(opening, cycles, source)
        }
    }

    /// Start the countdown. Returns the snapshot if the capture is due now.
    pub fn dependency_ready(&mut self) -> Option<Snapshot> {
        if !self.awaiting_dependency {
            return None;
        }
        self.awaiting_dependency = false;

        if self.remaining == 0 {
            Some(self.resolved())
        } else {
            None
        }
    }

    pub fn record_observed(&mut self, snapshot: &Snapshot) {
        if self.source == CaptureSource::LatestObserved {
            self.latest = Some(snapshot.clone());
        }
    }

    /// Advance one scheduling cycle.
    pub fn advance(&mut self, timeout: Option<u32>) -> CaptureStep {
        if self.awaiting_dependency {
            self.waited += 1;
            return match timeout {
                Some(limit) if self.waited >= limit => CaptureStep::TimedOut(self.resolved()),
                _ => CaptureStep::Pending,
            };
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            CaptureStep::Due(self.resolved())
        } else {
            CaptureStep::Pending
        }
    }

    fn resolved(&self) -> Snapshot {
        match (self.source, &self.latest) {
            (CaptureSource::LatestObserved, Some(latest)) => latest.clone(),
            _ => self.opening.clone(),
        }
    }
}
