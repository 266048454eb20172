use std::collections::HashMap;

use crate::manifest::directive;
use crate::manifest::Manifest;
use crate::specifier::satisfiable;

use super::report::{CheckChecks, CheckStatus, Finding};

/// Knobs that switch optional checks on or off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOptions {
    pub require_license: bool,
    pub allow_duplicates: bool,
}

/// Run all syntactic checks on a parsed manifest.
///
/// Returns (checks, findings). If findings is empty, the manifest is OK.
pub fn run_checks(manifest: &Manifest, options: &CheckOptions) -> (CheckChecks, Vec<Finding>) {
    let mut checks = CheckChecks {
        manifest_parse: true, // Already decoded if we got here
        ..Default::default()
    };
    let mut findings = Vec::new();

    // Check 1: every requirement line parses
    let before = findings.len();
    for (line, err) in manifest.malformed() {
        findings.push(
            Finding::new("MALFORMED_REQUIREMENT", line.number)
                .message(err.to_string())
                .actual(line.raw.trim()),
        );
    }
    checks.entries_parse = findings.len() == before;

    // Check 2: installer options are known and complete
    let before = findings.len();
    for (line, d) in manifest.directives() {
        match directive::lookup(&d.flag) {
            None => findings.push(
                Finding::new("UNKNOWN_OPTION", line)
                    .message(format!("unknown option `{}`", d.flag))
                    .actual(d.flag.clone()),
            ),
            Some(spec) if spec.takes_value && d.value.is_none() => findings.push(
                Finding::new("MISSING_OPTION_VALUE", line)
                    .message(format!("`{}` requires a value", d.flag))
                    .actual(d.flag.clone()),
            ),
            Some(_) => {}
        }
    }
    checks.options_known = findings.len() == before;

    // Check 3: no duplicate package names (after normalization)
    if options.allow_duplicates {
        checks.unique_names = CheckStatus::Skipped;
    } else {
        let before = findings.len();
        let mut first_seen: HashMap<String, usize> = HashMap::new();
        for (line, entry) in manifest.entries() {
            let name = entry.normalized_name();
            if let Some(first) = first_seen.get(&name) {
                findings.push(
                    Finding::new("DUPLICATE_PACKAGE", line)
                        .package(name.clone())
                        .message(format!("`{}` is already declared on line {first}", entry.name())),
                );
            } else {
                first_seen.insert(name, line);
            }
        }
        checks.unique_names = CheckStatus::from_pass(findings.len() == before);
    }

    // Check 4: each requirement's constraints admit some version
    let before = findings.len();
    for (line, entry) in manifest.entries() {
        if let Err(conflict) = satisfiable(&entry.requirement.specifiers) {
            findings.push(
                Finding::new("UNSATISFIABLE_CONSTRAINT", line)
                    .package(entry.normalized_name())
                    .message(conflict.to_string()),
            );
        }
    }
    checks.constraints_satisfiable = findings.len() == before;

    // Check 5: license annotations (opt-in)
    if options.require_license {
        let before = findings.len();
        for (line, entry) in manifest.entries() {
            if entry.annotation.is_none() {
                findings.push(
                    Finding::new("MISSING_LICENSE_ANNOTATION", line)
                        .package(entry.normalized_name()),
                );
            }
        }
        checks.license_annotations = CheckStatus::from_pass(findings.len() == before);
    }

    (checks, findings)
}
