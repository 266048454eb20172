use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::cli::{CommandResult, ExitCode};
use crate::manifest::{load_manifest, Manifest};

/// Report schema version.
pub const LIST_VERSION: &str = "reqgate.list.v0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListEntry {
    pub line: usize,
    pub name: String,
    pub normalized_name: String,
    pub requirement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListReport {
    pub version: String,
    pub source: String,
    pub manifest_id: String,
    pub entries: Vec<ListEntry>,
}

impl ListReport {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("list report serialization cannot fail")
    }

    pub fn to_human(&self) -> String {
        let mut lines = vec![format!("{} ({} entries)", self.source, self.entries.len())];
        for e in &self.entries {
            let mut line = format!("{:>5}  {}", e.line, e.requirement);
            if let Some(a) = &e.annotation {
                line.push_str(&format!("  # {a}"));
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

/// Entries in file order. Malformed lines are left out.
pub fn build_listing(manifest: &Manifest) -> ListReport {
    let entries = manifest
        .entries()
        .map(|(line, entry)| ListEntry {
            line,
            name: entry.name().to_string(),
            normalized_name: entry.normalized_name(),
            requirement: entry.canonical(),
            annotation: entry.annotation.clone(),
        })
        .collect();

    ListReport {
        version: LIST_VERSION.to_string(),
        source: manifest.source.clone(),
        manifest_id: manifest.manifest_id.clone(),
        entries,
    }
}

/// Execute `reqgate list <manifest>`.
pub fn execute_list(path: &Path, json_output: bool) -> CommandResult {
    let manifest = match load_manifest(path) {
        Ok(m) => m,
        Err(envelope) => {
            return CommandResult::new(
                envelope.render("list", json_output),
                ExitCode::Refusal.into(),
                None,
            );
        }
    };

    let report = build_listing(&manifest);
    info!("list {}: {} entries", report.source, report.entries.len());

    let output = if json_output {
        report.to_json()
    } else {
        report.to_human()
    };
    CommandResult::new(output, ExitCode::Success.into(), Some(report.manifest_id))
}
