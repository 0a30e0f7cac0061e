//! Unsaved-changes tracking for form editing surfaces.
//!
//! A [`FormSession`] wraps one editing surface: it serializes the form's
//! fields into snapshots, compares them against a baseline captured when the
//! form opened ([`DirtyTracker`]), and routes exits through a discard/stay
//! prompt while there are unsaved edits ([`ConfirmationGate`]).
//!
//! ```
//! use dirty_tracker::{FormSession, Surface, TrackerConfig};
//! use dirty_tracker::snapshot::snapshot_model::FieldMap;
//!
//! let mut session = FormSession::new(Surface::User.schema(), TrackerConfig::default());
//! let alice = FieldMap::new()
//!     .with("username", "alice")
//!     .with("password", "")
//!     .with("selectedPatients", vec![1u64]);
//!
//! let today = chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
//! session.on_open(Some(&alice), today);
//! session.on_field_change("password", "x");
//! assert!(session.dirty());
//!
//! session.on_field_change("password", "");
//! assert!(!session.dirty());
//! ```

pub mod cli;
pub mod form;
pub mod gate;
pub mod report;
pub mod scenario;
pub mod snapshot;
pub mod trace;
pub mod tracker;

pub use form::{form_model::Surface, session::FormSession};
pub use gate::{
    gate::{ConfirmationGate, ExitHandler, ExitLog},
    gate_model::{ExitAction, GateOutcome, PromptChoice},
};
pub use tracker::{
    tracker::DirtyTracker,
    tracker_model::{Observation, TrackerConfig, TrackerState},
};
