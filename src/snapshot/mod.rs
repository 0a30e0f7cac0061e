pub mod codec;
pub mod snapshot_model;
