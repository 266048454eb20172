//! Requirements manifest data model

use crate::specifier::{ParseError, Requirement};

use super::canonical::{canonical_entries, compute_manifest_id};

/// A parsed requirements manifest. Lines are kept in file order; the
/// consuming installer treats that order as significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Display path of the input
    pub source: String,

    /// Every logical line, in file order
    pub lines: Vec<Line>,

    /// `sha256:<hex>` over the canonical requirement entries
    pub manifest_id: String,
}

/// One logical line (continuations already joined).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based physical line where the logical line starts
    pub number: usize,
    pub raw: String,
    pub kind: LineKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment(String),
    Directive(Directive),
    Requirement(Entry),
    Malformed(ParseError),
}

/// A requirement line plus its trailing comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub requirement: Requirement,
    /// Trailing comment text, conventionally the package license
    pub annotation: Option<String>,
}

impl Entry {
    pub fn name(&self) -> &str {
        &self.requirement.name
    }

    pub fn normalized_name(&self) -> String {
        self.requirement.normalized_name()
    }

    pub fn canonical(&self) -> String {
        self.requirement.canonical()
    }
}

/// An installer option line such as `-r other.txt` or `--index-url URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub flag: String,
    pub value: Option<String>,
    pub annotation: Option<String>,
}

impl Manifest {
    pub fn new(source: impl Into<String>, lines: Vec<Line>) -> Self {
        let mut manifest = Self {
            source: source.into(),
            lines,
            manifest_id: String::new(),
        };
        manifest.manifest_id = manifest.recompute_id();
        manifest
    }

    /// Requirement entries with their line numbers, in file order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Entry)> {
        self.lines.iter().filter_map(|line| match &line.kind {
            LineKind::Requirement(entry) => Some((line.number, entry)),
            _ => None,
        })
    }

    pub fn directives(&self) -> impl Iterator<Item = (usize, &Directive)> {
        self.lines.iter().filter_map(|line| match &line.kind {
            LineKind::Directive(directive) => Some((line.number, directive)),
            _ => None,
        })
    }

    pub fn malformed(&self) -> impl Iterator<Item = (&Line, &ParseError)> {
        self.lines.iter().filter_map(|line| match &line.kind {
            LineKind::Malformed(err) => Some((line, err)),
            _ => None,
        })
    }

    pub fn entry_count(&self) -> usize {
        self.entries().count()
    }

    pub fn canonical_entries(&self) -> Vec<String> {
        canonical_entries(self)
    }

    pub fn recompute_id(&self) -> String {
        compute_manifest_id(&self.canonical_entries())
    }
}
