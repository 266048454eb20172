//! Ordered listing of manifest entries

pub mod command;

pub use command::{build_listing, execute_list, ListEntry, ListReport};
