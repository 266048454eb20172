use serde_json::{json, Value};

/// Return the compiled-in operator manifest for `--describe`.
pub fn operator_json() -> Value {
    json!({
        "name": "reqgate",
        "schema_version": "operator.v0",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Check ordered requirements manifests before they reach the install gate.",
        "output_mode": "report",
        "subcommands": {
            "check": {
                "description": "Check a manifest: syntax, duplicates, constraints, license notes",
                "output_mode": "report",
                "exit_codes": {
                    "0": "OK",
                    "1": "INVALID",
                    "2": "REFUSAL"
                }
            },
            "list": {
                "description": "List requirement entries in file order",
                "output_mode": "report",
                "exit_codes": {
                    "0": "OK",
                    "2": "REFUSAL"
                }
            },
            "diff": {
                "description": "Deterministically diff two manifests",
                "output_mode": "report",
                "exit_codes": {
                    "0": "NO_CHANGES",
                    "1": "CHANGES",
                    "2": "REFUSAL"
                }
            },
            "witness": {
                "description": "Query witness ledger",
                "output_mode": "report",
                "exit_codes": {
                    "0": "OK"
                }
            }
        },
        "refusal_codes": {
            "E_IO": "Cannot read an input manifest",
            "E_BAD_INPUT": "Input manifest is not UTF-8 text",
            "E_CONFIG": "Config file unreadable or invalid"
        },
        "finding_codes": {
            "MALFORMED_REQUIREMENT": "Line does not parse as a requirement specifier",
            "UNKNOWN_OPTION": "Option line uses an unknown flag",
            "MISSING_OPTION_VALUE": "Option flag requires a value",
            "DUPLICATE_PACKAGE": "Package name already declared on an earlier line",
            "UNSATISFIABLE_CONSTRAINT": "Version constraints of one line exclude every version",
            "MISSING_LICENSE_ANNOTATION": "Requirement has no trailing license comment"
        },
        "global_flags": ["--describe", "--schema", "--version", "--no-witness", "--config", "--verbose"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_manifest_has_required_fields() {
        let op = operator_json();
        assert_eq!(op["name"], "reqgate");
        assert_eq!(op["schema_version"], "operator.v0");
        assert!(op["version"].as_str().is_some());
    }

    #[test]
    fn operator_manifest_has_all_subcommands() {
        let op = operator_json();
        let subs = op["subcommands"].as_object().unwrap();
        for name in ["check", "list", "diff", "witness"] {
            assert!(subs.contains_key(name), "missing {name}");
        }
    }

    #[test]
    fn operator_manifest_has_all_refusal_codes() {
        let op = operator_json();
        let codes = op["refusal_codes"].as_object().unwrap();
        for code in crate::refusal::RefusalCode::ALL {
            assert!(codes.contains_key(code.as_str()), "missing {code}");
        }
    }

    #[test]
    fn operator_manifest_has_exit_codes() {
        let op = operator_json();
        let check = &op["subcommands"]["check"]["exit_codes"];
        assert_eq!(check["0"], "OK");
        assert_eq!(check["1"], "INVALID");
        assert_eq!(check["2"], "REFUSAL");

        let diff = &op["subcommands"]["diff"]["exit_codes"];
        assert_eq!(diff["1"], "CHANGES");
    }
}
