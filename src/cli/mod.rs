//! Command-line surface

pub mod args;
pub mod exit;

pub use args::{Cli, Command, WitnessCommand};
pub use exit::{CommandResult, ExitCode};
