use std::path::Path;

use log::info;

use crate::cli::{CommandResult, ExitCode};
use crate::manifest::load_manifest;

use super::compare::compare_manifests;

/// Execute `reqgate diff <A> <B>`.
///
/// The witness id is B's manifest_id: the manifest under review.
pub fn execute_diff(a_path: &Path, b_path: &Path, json_output: bool) -> CommandResult {
    let a_manifest = match load_manifest(a_path) {
        Ok(m) => m,
        Err(envelope) => {
            return CommandResult::new(
                envelope.render("diff", json_output),
                ExitCode::Refusal.into(),
                None,
            );
        }
    };

    let b_manifest = match load_manifest(b_path) {
        Ok(m) => m,
        Err(envelope) => {
            return CommandResult::new(
                envelope.render("diff", json_output),
                ExitCode::Refusal.into(),
                None,
            );
        }
    };

    let diff = compare_manifests(&a_manifest, &b_manifest);
    info!(
        "diff {} {}: {}",
        a_manifest.source, b_manifest.source, diff.outcome
    );

    let exit_code = if diff.has_changes() {
        ExitCode::Invalid
    } else {
        ExitCode::Success
    };

    let output = if json_output {
        diff.to_json()
    } else {
        diff.to_human()
    };

    CommandResult::new(output, exit_code.into(), Some(b_manifest.manifest_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_pair(a: &str, b: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), a).unwrap();
        fs::write(tmp.path().join("b.txt"), b).unwrap();
        tmp
    }

    #[test]
    fn identical_manifests_exit_0() {
        let tmp = write_pair("mock\n", "mock # BSD\n");
        let result = execute_diff(&tmp.path().join("a.txt"), &tmp.path().join("b.txt"), false);
        assert_eq!(result.exit_code, 0);
        assert!(result.output.contains("NO_CHANGES"));
    }

    #[test]
    fn different_manifests_exit_1() {
        let tmp = write_pair("mock>=1\n", "mock>=2\n");
        let result = execute_diff(&tmp.path().join("a.txt"), &tmp.path().join("b.txt"), false);
        assert_eq!(result.exit_code, 1);
        assert!(result.output.contains("~ mock>=1 -> mock>=2"));
    }

    #[test]
    fn missing_manifest_exit_2() {
        let tmp = write_pair("mock\n", "mock\n");
        let result = execute_diff(Path::new("/nonexistent"), &tmp.path().join("b.txt"), true);
        assert_eq!(result.exit_code, 2);
        let envelope: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(envelope["outcome"], "REFUSAL");
    }

    #[test]
    fn json_output_parses() {
        let tmp = write_pair("mock\n", "mock\nsix\n");
        let result = execute_diff(&tmp.path().join("a.txt"), &tmp.path().join("b.txt"), true);
        assert_eq!(result.exit_code, 1);
        let report: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(report["outcome"], "CHANGES");
        assert_eq!(report["added"].as_array().unwrap().len(), 1);
        assert_eq!(report["b_manifest_id"], result.manifest_id.unwrap());
    }
}
