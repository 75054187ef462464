pub mod client_validation;
pub mod conflict;
