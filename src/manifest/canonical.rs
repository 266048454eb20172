//! Canonical rendering of manifest entries for deterministic manifest_id computation

use sha2::{Digest, Sha256};

use super::model::Manifest;

/// Canonical one-line form of every requirement entry, in file order.
///
/// Comments, blank lines, directives, whitespace, and name spelling
/// variants do not appear in the output, so they never move the id.
pub fn canonical_entries(manifest: &Manifest) -> Vec<String> {
    manifest.entries().map(|(_, entry)| entry.canonical()).collect()
}

/// `sha256:<hex>` over the canonical entries joined with `\n`.
pub fn compute_manifest_id(canonical: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.join("\n").as_bytes());
    format!("sha256:{}", hex::encode(hasher.finalize()))
}
