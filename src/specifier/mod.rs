//! Requirement specifier grammar: package names, version constraints,
//! environment markers, and constraint satisfiability.

pub mod constraint;
pub mod marker;
pub mod requirement;
pub mod satisfy;
pub mod version;

pub use constraint::{Operator, Specifier};
pub use marker::Marker;
pub use requirement::{normalize_name, parse_requirement, Requirement};
pub use satisfy::{satisfiable, Conflict};
pub use version::Version;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Syntax error in a requirement line. `column` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} (column {column})")]
pub struct ParseError {
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn at(column: usize, message: impl Into<String>) -> Self {
        Self {
            column,
            message: message.into(),
        }
    }

    /// Re-anchor an error raised on a substring that starts at byte `offset`.
    pub fn shifted(mut self, offset: usize) -> Self {
        self.column += offset;
        self
    }
}
