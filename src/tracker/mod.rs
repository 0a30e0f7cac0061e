pub mod deferred;
pub mod tracker;
pub mod tracker_model;
