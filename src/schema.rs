use serde_json::{json, Value};

/// Finding codes a check report may carry.
pub const FINDING_CODES: [&str; 6] = [
    "MALFORMED_REQUIREMENT",
    "UNKNOWN_OPTION",
    "MISSING_OPTION_VALUE",
    "DUPLICATE_PACKAGE",
    "UNSATISFIABLE_CONSTRAINT",
    "MISSING_LICENSE_ANNOTATION",
];

/// Return the JSON Schema for reqgate.v0 reports.
pub fn reqgate_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "reqgate.v0",
        "title": "reqgate.v0 check, list, and diff report schema",
        "definitions": {
            "manifest_id": {
                "type": "string",
                "pattern": "^sha256:[a-f0-9]{64}$"
            },
            "check_report": {
                "type": "object",
                "required": ["version", "outcome", "entry_count", "checks", "invalid"],
                "properties": {
                    "version": { "type": "string", "const": "reqgate.check.v0" },
                    "outcome": { "type": "string", "enum": ["OK", "INVALID", "REFUSAL"] },
                    "source": { "type": "string" },
                    "manifest_id": { "$ref": "#/definitions/manifest_id" },
                    "entry_count": { "type": "integer", "minimum": 0 },
                    "checks": { "$ref": "#/definitions/check_checks" },
                    "invalid": {
                        "type": "array",
                        "items": { "$ref": "#/definitions/finding" }
                    },
                    "refusal": { "$ref": "#/definitions/refusal_detail" }
                },
                "additionalProperties": false
            },
            "check_checks": {
                "type": "object",
                "required": [
                    "manifest_parse",
                    "entries_parse",
                    "options_known",
                    "unique_names",
                    "constraints_satisfiable",
                    "license_annotations"
                ],
                "properties": {
                    "manifest_parse": { "type": "boolean" },
                    "entries_parse": { "type": "boolean" },
                    "options_known": { "type": "boolean" },
                    "unique_names": { "type": "string", "enum": ["pass", "fail", "skipped"] },
                    "constraints_satisfiable": { "type": "boolean" },
                    "license_annotations": { "type": "string", "enum": ["pass", "fail", "skipped"] }
                },
                "additionalProperties": false
            },
            "finding": {
                "type": "object",
                "required": ["code", "line"],
                "properties": {
                    "code": { "type": "string", "enum": FINDING_CODES },
                    "line": { "type": "integer", "minimum": 1 },
                    "package": { "type": "string" },
                    "message": { "type": "string" },
                    "actual": { "type": "string" }
                },
                "additionalProperties": false
            },
            "list_report": {
                "type": "object",
                "required": ["version", "source", "manifest_id", "entries"],
                "properties": {
                    "version": { "type": "string", "const": "reqgate.list.v0" },
                    "source": { "type": "string" },
                    "manifest_id": { "$ref": "#/definitions/manifest_id" },
                    "entries": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "required": ["line", "name", "normalized_name", "requirement"],
                            "properties": {
                                "line": { "type": "integer", "minimum": 1 },
                                "name": { "type": "string" },
                                "normalized_name": { "type": "string" },
                                "requirement": { "type": "string" },
                                "annotation": { "type": "string" }
                            },
                            "additionalProperties": false
                        }
                    }
                },
                "additionalProperties": false
            },
            "diff_report": {
                "type": "object",
                "required": [
                    "version", "outcome", "a_manifest_id", "b_manifest_id",
                    "added", "removed", "changed", "moved", "unchanged"
                ],
                "properties": {
                    "version": { "type": "string", "const": "reqgate.diff.v0" },
                    "outcome": { "type": "string", "enum": ["NO_CHANGES", "CHANGES"] },
                    "a_manifest_id": { "$ref": "#/definitions/manifest_id" },
                    "b_manifest_id": { "$ref": "#/definitions/manifest_id" },
                    "added": { "type": "array", "items": { "$ref": "#/definitions/diff_entry" } },
                    "removed": { "type": "array", "items": { "$ref": "#/definitions/diff_entry" } },
                    "changed": { "type": "array", "items": { "$ref": "#/definitions/diff_entry" } },
                    "moved": { "type": "array", "items": { "$ref": "#/definitions/diff_entry" } },
                    "unchanged": { "type": "integer", "minimum": 0 }
                },
                "additionalProperties": false
            },
            "diff_entry": {
                "type": "object",
                "required": ["kind", "package"],
                "properties": {
                    "kind": { "type": "string", "enum": ["added", "removed", "changed", "moved"] },
                    "package": { "type": "string" },
                    "a": { "type": "string" },
                    "b": { "type": "string" },
                    "a_line": { "type": "integer" },
                    "b_line": { "type": "integer" }
                },
                "additionalProperties": false
            },
            "refusal_detail": {
                "type": "object",
                "required": ["code", "message", "next_command"],
                "properties": {
                    "code": { "type": "string", "enum": ["E_IO", "E_BAD_INPUT", "E_CONFIG"] },
                    "message": { "type": "string" },
                    "detail": { "type": "object" },
                    "next_command": { "type": ["string", "null"] }
                },
                "additionalProperties": false
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_has_required_definitions() {
        let s = reqgate_schema();
        let defs = s["definitions"].as_object().unwrap();
        for name in ["check_report", "check_checks", "finding", "list_report", "diff_report", "refusal_detail"] {
            assert!(defs.contains_key(name), "missing {name}");
        }
    }

    #[test]
    fn finding_codes_match_operator_manifest() {
        let op = crate::operator::operator_json();
        let described = op["finding_codes"].as_object().unwrap();
        assert_eq!(described.len(), FINDING_CODES.len());
        for code in FINDING_CODES {
            assert!(described.contains_key(code), "missing {code}");
        }
    }

    #[test]
    fn check_checks_lists_every_field() {
        let s = reqgate_schema();
        let required = s["definitions"]["check_checks"]["required"].as_array().unwrap();
        let value = serde_json::to_value(crate::check::CheckChecks::default()).unwrap();
        assert_eq!(required.len(), value.as_object().unwrap().len());
    }

    #[test]
    fn schema_has_id_and_title() {
        let s = reqgate_schema();
        assert_eq!(s["$id"], "reqgate.v0");
        assert!(s["title"].as_str().is_some());
    }
}
