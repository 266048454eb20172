//! Manifest checking: syntax, duplicates, constraint sanity, license notes

pub mod checks;
pub mod command;
pub mod report;

pub use checks::{run_checks, CheckOptions};
pub use command::execute_check;
pub use report::{CheckChecks, CheckOutcome, CheckReport, CheckStatus, Finding};
