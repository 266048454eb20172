use std::path::Path;

use log::info;

use crate::cli::CommandResult;
use crate::manifest::load_manifest;

use super::checks::{run_checks, CheckOptions};
use super::report::CheckReport;

/// Execute `reqgate check` on a manifest file.
pub fn execute_check(path: &Path, json_output: bool, options: &CheckOptions) -> CommandResult {
    // Step 1: Read and parse the manifest
    let manifest = match load_manifest(path) {
        Ok(m) => m,
        Err(envelope) => {
            let reason = serde_json::to_value(&envelope.refusal)
                .expect("refusal detail serialization cannot fail");
            let report = CheckReport::refusal(reason);
            return CommandResult::new(report.render(json_output), report.outcome.exit_code(), None);
        }
    };

    // Step 2: Run syntactic checks
    let (checks, findings) = run_checks(&manifest, options);
    let entry_count = manifest.entry_count();

    let report = if findings.is_empty() {
        CheckReport::ok(manifest.source.clone(), manifest.manifest_id.clone(), entry_count, checks)
    } else {
        CheckReport::invalid(
            manifest.source.clone(),
            manifest.manifest_id.clone(),
            entry_count,
            checks,
            findings,
        )
    };

    info!(
        "check {}: {} ({} entries, {} findings)",
        manifest.source,
        report.outcome,
        entry_count,
        report.invalid.len()
    );

    CommandResult::new(
        report.render(json_output),
        report.outcome.exit_code(),
        Some(manifest.manifest_id),
    )
}
