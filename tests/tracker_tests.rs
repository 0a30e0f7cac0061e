use dirty_tracker::{
    DirtyTracker, Observation, TrackerConfig, TrackerState,
    snapshot::snapshot_model::Snapshot,
    tracker::{
        deferred::{CapturePolicy, CaptureSource},
        tracker_model::IgnoreReason,
    },
};

fn snap(s: &str) -> Snapshot {
    Snapshot::new(s)
}

fn tracker_with(config: TrackerConfig) -> DirtyTracker {
    DirtyTracker::new(config)
}

// =========================================================================
// Dirty evaluation
// =========================================================================

#[test]
fn same_snapshot_as_baseline_is_clean() {
    let mut t = DirtyTracker::default();
    t.set_baseline(snap("B"));

    assert_eq!(t.observe_change(&snap("B")), Observation::Evaluated { dirty: false });
    assert!(!t.dirty());
}

#[test]
fn different_snapshot_is_dirty() {
    let mut t = DirtyTracker::default();
    t.set_baseline(snap("B"));

    assert_eq!(t.observe_change(&snap("S")), Observation::Evaluated { dirty: true });
    assert!(t.dirty());
}

#[test]
fn reverting_an_edit_is_clean_again() {
    let baseline = r#"{"username":"alice","password":""}"#;
    let mut t = DirtyTracker::default();
    t.set_baseline(snap(baseline));

    t.observe_change(&snap(r#"{"username":"alice","password":"x"}"#));
    assert!(t.dirty(), "Typing into password makes the form dirty");

    t.observe_change(&snap(baseline));
    assert!(!t.dirty(), "Clearing the field back restores the baseline");
}

#[test]
fn observe_before_baseline_is_ignored() {
    let mut t = DirtyTracker::default();

    assert_eq!(
        t.observe_change(&snap("anything")),
        Observation::Ignored(IgnoreReason::Uninitialized)
    );
    assert!(!t.dirty());
    assert!(!t.is_initialized());
}

#[test]
fn set_baseline_twice_is_idempotent() {
    let mut t = DirtyTracker::default();
    t.set_baseline(snap("B"));
    t.set_baseline(snap("B"));

    t.observe_change(&snap("B"));
    assert!(!t.dirty());
    assert_eq!(t.state(), TrackerState::Active);
}

#[test]
fn set_baseline_replaces_previous_and_clears_dirty() {
    let mut t = DirtyTracker::default();
    t.set_baseline(snap("A"));
    t.observe_change(&snap("B"));
    assert!(t.dirty());

    t.set_baseline(snap("B"));
    assert!(!t.dirty());
    assert_eq!(t.baseline(), &snap("B"));
    t.observe_change(&snap("B"));
    assert!(!t.dirty());
}

// =========================================================================
// Reset and the drain window
// =========================================================================

#[test]
fn reset_clears_everything() {
    let mut t = DirtyTracker::default();
    t.set_baseline(snap("B"));
    t.observe_change(&snap("S"));
    assert!(t.dirty());

    t.reset();
    assert!(!t.dirty());
    assert!(!t.is_initialized());
    assert!(t.is_resetting());
    assert!(t.baseline().is_empty());
}

#[test]
fn observe_during_resetting_window_is_ignored() {
    let mut t = DirtyTracker::default();
    t.set_baseline(snap("B"));
    t.reset();

    assert_eq!(
        t.observe_change(&snap("S")),
        Observation::Ignored(IgnoreReason::Resetting)
    );
    assert!(!t.dirty());
}

#[test]
fn drain_window_closes_after_one_tick() {
    let mut t = DirtyTracker::default();
    t.set_baseline(snap("B"));
    t.reset();
    assert_eq!(t.state(), TrackerState::Resetting);

    t.tick();
    assert_eq!(t.state(), TrackerState::Uninitialized);
    assert_eq!(
        t.observe_change(&snap("S")),
        Observation::Ignored(IgnoreReason::Uninitialized)
    );
}

#[test]
fn drain_cycles_are_configurable() {
    let mut t = tracker_with(TrackerConfig {
        drain_cycles: 3,
        ..TrackerConfig::default()
    });
    t.reset();

    t.tick();
    t.tick();
    assert_eq!(t.state(), TrackerState::Resetting);
    t.tick();
    assert_eq!(t.state(), TrackerState::Uninitialized);
}

#[test]
fn zero_drain_cycles_skip_the_window() {
    let mut t = tracker_with(TrackerConfig {
        drain_cycles: 0,
        ..TrackerConfig::default()
    });
    t.set_baseline(snap("B"));
    t.reset();

    assert_eq!(t.state(), TrackerState::Uninitialized);
}

#[test]
fn reopen_inside_drain_window_is_not_undone_by_the_drain() {
    let mut t = DirtyTracker::default();
    t.set_baseline(snap("A"));
    t.reset();

    t.begin_capture(snap("B"), CapturePolicy::Immediate, CaptureSource::Opening);
    assert_eq!(t.state(), TrackerState::Active);

    t.tick();
    assert_eq!(t.state(), TrackerState::Active, "Drain must not close a re-opened form");
    t.observe_change(&snap("C"));
    assert!(t.dirty());
}

// =========================================================================
// Deferred capture
// =========================================================================

#[test]
fn two_cycle_capture_ignores_early_changes() {
    let mut t = DirtyTracker::default();
    t.begin_capture(snap("B"), CapturePolicy::AfterCycles(2), CaptureSource::Opening);
    assert_eq!(t.state(), TrackerState::Initializing);

    // cycle 0
    assert_eq!(
        t.observe_change(&snap("normalized")),
        Observation::Ignored(IgnoreReason::Initializing)
    );
    t.tick();

    // cycle 1
    assert_eq!(t.state(), TrackerState::Initializing);
    t.observe_change(&snap("normalized again"));
    assert!(!t.dirty());
    t.tick();

    assert_eq!(t.state(), TrackerState::Active);
    assert_eq!(t.baseline(), &snap("B"));
    assert!(!t.dirty());
}

#[test]
fn reopening_overwrites_pending_capture() {
    let mut t = DirtyTracker::default();
    t.begin_capture(snap("A"), CapturePolicy::AfterCycles(2), CaptureSource::Opening);
    t.tick();

    t.begin_capture(snap("B"), CapturePolicy::AfterCycles(2), CaptureSource::Opening);
    t.tick();
    assert_eq!(t.state(), TrackerState::Initializing, "Countdown restarts on re-open");

    t.tick();
    assert_eq!(t.state(), TrackerState::Active);
    assert_eq!(t.baseline(), &snap("B"), "Previous target's snapshot never lands");
}

#[test]
fn reset_cancels_pending_capture() {
    let mut t = DirtyTracker::default();
    t.begin_capture(snap("B"), CapturePolicy::AfterCycles(2), CaptureSource::Opening);
    t.reset();
    assert!(!t.has_pending_capture());

    t.tick();
    t.tick();
    t.tick();
    assert_eq!(t.state(), TrackerState::Uninitialized);
    assert!(t.baseline().is_empty());
}

#[test]
fn explicit_baseline_supersedes_pending_capture() {
    let mut t = DirtyTracker::default();
    t.begin_capture(snap("A"), CapturePolicy::AfterCycles(2), CaptureSource::Opening);
    t.set_baseline(snap("B"));
    assert!(!t.has_pending_capture());

    t.tick();
    t.tick();
    assert_eq!(t.baseline(), &snap("B"));
}

#[test]
fn cancel_capture_reports_whether_one_was_pending() {
    let mut t = DirtyTracker::default();
    t.begin_capture(snap("A"), CapturePolicy::AfterCycles(1), CaptureSource::Opening);

    assert!(t.cancel_capture());
    assert!(!t.cancel_capture());
    t.tick();
    assert_eq!(t.state(), TrackerState::Initializing);
}

#[test]
fn after_zero_cycles_is_immediate() {
    let mut t = DirtyTracker::default();
    t.begin_capture(snap("A"), CapturePolicy::AfterCycles(0), CaptureSource::Opening);
    assert_eq!(t.state(), TrackerState::Active);
}

// =========================================================================
// Dependent fields
// =========================================================================

#[test]
fn dependency_that_never_mounts_leaves_tracker_inert() {
    let mut t = DirtyTracker::default();
    t.begin_capture(snap("A"), CapturePolicy::AwaitDependency { cycles: 1 }, CaptureSource::Opening);

    for _ in 0..100 {
        t.tick();
    }
    t.observe_change(&snap("edited"));

    assert_eq!(t.state(), TrackerState::Initializing);
    assert!(!t.dirty());
}

#[test]
fn dependency_timeout_captures_anyway() {
    let mut t = tracker_with(TrackerConfig {
        capture_timeout_cycles: Some(5),
        ..TrackerConfig::default()
    });
    t.begin_capture(snap("A"), CapturePolicy::AwaitDependency { cycles: 1 }, CaptureSource::Opening);

    for _ in 0..4 {
        t.tick();
    }
    assert_eq!(t.state(), TrackerState::Initializing);

    t.tick();
    assert_eq!(t.state(), TrackerState::Active);
    assert_eq!(t.baseline(), &snap("A"));
}

#[test]
fn dependency_ready_then_countdown() {
    let mut t = DirtyTracker::default();
    t.begin_capture(snap("A"), CapturePolicy::AwaitDependency { cycles: 1 }, CaptureSource::Opening);

    t.tick();
    assert_eq!(t.state(), TrackerState::Initializing, "Ticks before ready do not count");

    t.mark_dependency_ready();
    assert_eq!(t.state(), TrackerState::Initializing);

    t.tick();
    assert_eq!(t.state(), TrackerState::Active);
}

#[test]
fn dependency_ready_with_no_delay_captures_at_once() {
    let mut t = DirtyTracker::default();
    t.begin_capture(snap("A"), CapturePolicy::AwaitDependency { cycles: 0 }, CaptureSource::Opening);

    t.mark_dependency_ready();
    assert_eq!(t.state(), TrackerState::Active);
}

#[test]
fn latest_observed_source_absorbs_normalization() {
    let opening = snap(r#"{"content":""}"#);
    let normalized = snap(r#"{"content":"<p></p>"}"#);

    let mut t = DirtyTracker::default();
    t.begin_capture(
        opening,
        CapturePolicy::AwaitDependency { cycles: 1 },
        CaptureSource::LatestObserved,
    );
    t.observe_change(&normalized);
    t.mark_dependency_ready();
    t.tick();

    assert_eq!(t.baseline(), &normalized);
    t.observe_change(&normalized);
    assert!(!t.dirty(), "The editor's own normalization is not an edit");
}

#[test]
fn opening_source_keeps_opening_snapshot() {
    let opening = snap(r#"{"content":""}"#);

    let mut t = DirtyTracker::default();
    t.begin_capture(opening.clone(), CapturePolicy::AfterCycles(1), CaptureSource::Opening);
    t.observe_change(&snap(r#"{"content":"<p></p>"}"#));
    t.tick();

    assert_eq!(t.baseline(), &opening);
}
