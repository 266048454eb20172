//! Requirements manifest model, parser, and canonical id

pub mod canonical;
pub mod directive;
pub mod load;
pub mod model;
pub mod parser;

pub use canonical::{canonical_entries, compute_manifest_id};
pub use load::load_manifest;
pub use model::{Directive, Entry, Line, LineKind, Manifest};
pub use parser::parse_manifest;
