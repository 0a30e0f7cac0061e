pub mod form_model;
pub mod session;
pub mod surfaces;
pub mod validation;
