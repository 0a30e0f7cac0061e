pub mod gate;
pub mod gate_model;
