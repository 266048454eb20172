//! Refusal system for reqgate errors

pub mod codes;
pub mod envelope;

pub use codes::RefusalCode;
pub use envelope::RefusalEnvelope;
