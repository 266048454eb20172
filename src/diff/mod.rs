//! Deterministic comparison of two manifests

pub mod command;
pub mod compare;

pub use command::execute_diff;
pub use compare::{compare_manifests, DiffEntry, DiffReport};
