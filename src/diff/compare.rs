use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::manifest::Manifest;

/// Report schema version.
pub const DIFF_VERSION: &str = "reqgate.diff.v0";

/// A single difference between two manifests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiffEntry {
    pub kind: String,
    pub package: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b_line: Option<usize>,
}

/// Result of comparing two manifests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffReport {
    pub version: String,
    pub outcome: String,
    pub a_manifest_id: String,
    pub b_manifest_id: String,
    pub added: Vec<DiffEntry>,
    pub removed: Vec<DiffEntry>,
    pub changed: Vec<DiffEntry>,
    pub moved: Vec<DiffEntry>,
    pub unchanged: usize,
}

impl DiffReport {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty()
            || !self.removed.is_empty()
            || !self.changed.is_empty()
            || !self.moved.is_empty()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("diff report serialization cannot fail")
    }

    pub fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if self.has_changes() {
            lines.push("reqgate diff: CHANGES".to_string());
        } else {
            lines.push("reqgate diff: NO_CHANGES".to_string());
        }
        lines.push(format!("  a: {}", self.a_manifest_id));
        lines.push(format!("  b: {}", self.b_manifest_id));

        let sections = [
            ("added", '+', &self.added),
            ("removed", '-', &self.removed),
            ("changed", '~', &self.changed),
            ("moved", '>', &self.moved),
        ];
        for (label, sigil, entries) in sections {
            if entries.is_empty() {
                continue;
            }
            lines.push(format!("  {label}: {}", entries.len()));
            for e in entries {
                let text = match (&e.a, &e.b) {
                    (Some(a), Some(b)) if a != b => format!("{a} -> {b}"),
                    (_, Some(b)) => b.clone(),
                    (Some(a), None) => a.clone(),
                    (None, None) => e.package.clone(),
                };
                lines.push(format!("    {sigil} {text}"));
            }
        }
        if self.unchanged > 0 {
            lines.push(format!("  unchanged: {}", self.unchanged));
        }

        lines.join("\n")
    }
}

struct Keyed {
    line: usize,
    canonical: String,
}

/// First occurrence of each normalized name, plus that name order.
fn key_entries(manifest: &Manifest) -> (BTreeMap<String, Keyed>, Vec<String>) {
    let mut map = BTreeMap::new();
    let mut order = Vec::new();
    for (line, entry) in manifest.entries() {
        let name = entry.normalized_name();
        if map.contains_key(&name) {
            continue;
        }
        order.push(name.clone());
        map.insert(
            name,
            Keyed {
                line,
                canonical: entry.canonical(),
            },
        );
    }
    (map, order)
}

/// Names that keep their relative order: longest common subsequence.
fn stable_names(a: &[&String], b: &[&String]) -> HashSet<String> {
    let (n, m) = (a.len(), b.len());
    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[i][j] = if a[i] == b[j] {
                dp[i + 1][j + 1] + 1
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    let mut stable = HashSet::new();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if a[i] == b[j] {
            stable.insert(a[i].clone());
            i += 1;
            j += 1;
        } else if dp[i + 1][j] >= dp[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    stable
}

/// Compare two manifests and produce a deterministic diff report.
pub fn compare_manifests(a: &Manifest, b: &Manifest) -> DiffReport {
    let (a_entries, a_order) = key_entries(a);
    let (b_entries, b_order) = key_entries(b);

    let a_common: Vec<&String> = a_order.iter().filter(|n| b_entries.contains_key(*n)).collect();
    let b_common: Vec<&String> = b_order.iter().filter(|n| a_entries.contains_key(*n)).collect();
    let stable = stable_names(&a_common, &b_common);

    let mut added = Vec::new();
    let mut removed = Vec::new();
    let mut changed = Vec::new();
    let mut moved = Vec::new();
    let mut unchanged = 0usize;

    // Find removed, changed, and moved (BTreeMap keeps name order)
    for (name, a_entry) in &a_entries {
        let Some(b_entry) = b_entries.get(name) else {
            removed.push(DiffEntry {
                kind: "removed".to_string(),
                package: name.clone(),
                a: Some(a_entry.canonical.clone()),
                b: None,
                a_line: Some(a_entry.line),
                b_line: None,
            });
            continue;
        };

        let entry = |kind: &str| DiffEntry {
            kind: kind.to_string(),
            package: name.clone(),
            a: Some(a_entry.canonical.clone()),
            b: Some(b_entry.canonical.clone()),
            a_line: Some(a_entry.line),
            b_line: Some(b_entry.line),
        };

        let same_text = a_entry.canonical == b_entry.canonical;
        let same_place = stable.contains(name);
        if !same_text {
            changed.push(entry("changed"));
        }
        if !same_place {
            moved.push(entry("moved"));
        }
        if same_text && same_place {
            unchanged += 1;
        }
    }

    // Find added (in B but not in A)
    for (name, b_entry) in &b_entries {
        if !a_entries.contains_key(name) {
            added.push(DiffEntry {
                kind: "added".to_string(),
                package: name.clone(),
                a: None,
                b: Some(b_entry.canonical.clone()),
                a_line: None,
                b_line: Some(b_entry.line),
            });
        }
    }

    let outcome = if added.is_empty() && removed.is_empty() && changed.is_empty() && moved.is_empty() {
        "NO_CHANGES"
    } else {
        "CHANGES"
    };

    DiffReport {
        version: DIFF_VERSION.to_string(),
        outcome: outcome.to_string(),
        a_manifest_id: a.manifest_id.clone(),
        b_manifest_id: b.manifest_id.clone(),
        added,
        removed,
        changed,
        moved,
        unchanged,
    }
}
