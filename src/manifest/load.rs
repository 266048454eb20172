use std::fs;
use std::path::Path;

use log::debug;
use serde_json::json;

use crate::refusal::{RefusalCode, RefusalEnvelope};

use super::model::Manifest;
use super::parser::parse_manifest;

/// Read and parse a manifest file.
///
/// Unreadable input refuses with `E_IO`, non-UTF-8 bytes with `E_BAD_INPUT`.
pub fn load_manifest(path: &Path) -> Result<Manifest, Box<RefusalEnvelope>> {
    let display = path.display().to_string();

    let bytes = fs::read(path).map_err(|e| {
        Box::new(RefusalEnvelope::new(
            RefusalCode::Io,
            Some(format!("Cannot read {display}: {e}")),
            Some(json!({
                "path": display,
                "operation": "read",
                "error": e.to_string(),
            })),
        ))
    })?;

    let text = String::from_utf8(bytes).map_err(|e| {
        let offset = e.utf8_error().valid_up_to();
        Box::new(RefusalEnvelope::new(
            RefusalCode::BadInput,
            Some(format!("{display} is not UTF-8 text")),
            Some(json!({
                "path": display,
                "issue": format!("invalid UTF-8 at byte {offset}"),
                "offset": offset,
            })),
        ))
    })?;

    let manifest = parse_manifest(&display, &text);
    debug!(
        "loaded {display}: {} lines, {} entries",
        manifest.lines.len(),
        manifest.entry_count()
    );
    Ok(manifest)
}
