//! Append-only ledger of reqgate invocations

pub mod ledger;
pub mod query;
pub mod record;

pub use ledger::append_witness;
pub use record::WitnessRecord;
