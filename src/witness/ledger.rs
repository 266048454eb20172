use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use log::debug;

use super::record::WitnessRecord;

/// Append a witness record to the ledger at `path`.
///
/// Witness failures should be warned but must not change domain exit semantics.
pub fn append_witness(path: &Path, record: &WitnessRecord) -> io::Result<()> {
    // Ensure parent directory exists.
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let line = serde_json::to_string(record)?;

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;

    debug!(
        "witness {} {} -> {}",
        record.command,
        record.outcome,
        path.display()
    );
    Ok(())
}
