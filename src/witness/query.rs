use std::fs;
use std::path::Path;

use super::record::WitnessRecord;

/// Read all witness records from the ledger, filtered to reqgate only.
fn read_ledger(path: &Path) -> Vec<WitnessRecord> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    content
        .lines()
        .filter_map(|line| serde_json::from_str::<WitnessRecord>(line).ok())
        .filter(WitnessRecord::is_ours)
        .collect()
}

/// Execute `reqgate witness query`: every reqgate witness record.
pub fn execute_query(path: &Path, json_output: bool) -> String {
    let records = read_ledger(path);
    if records.is_empty() {
        return if json_output {
            "[]".to_string()
        } else {
            "No witness records found.".to_string()
        };
    }

    if json_output {
        serde_json::to_string_pretty(&records).unwrap_or_else(|_| "[]".to_string())
    } else {
        records
            .iter()
            .map(format_record_human)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Execute `reqgate witness last`: the most recent record.
pub fn execute_last(path: &Path, json_output: bool) -> String {
    let records = read_ledger(path);
    match records.last() {
        Some(record) => {
            if json_output {
                serde_json::to_string_pretty(record).unwrap_or_else(|_| "null".to_string())
            } else {
                format_record_human(record)
            }
        }
        None => {
            if json_output {
                "null".to_string()
            } else {
                "No witness records found.".to_string()
            }
        }
    }
}

/// Execute `reqgate witness count`: number of records.
pub fn execute_count(path: &Path, json_output: bool) -> String {
    let records = read_ledger(path);
    if json_output {
        serde_json::json!({"count": records.len()}).to_string()
    } else {
        format!("{} witness record(s)", records.len())
    }
}

fn format_record_human(r: &WitnessRecord) -> String {
    let manifest_id = r.manifest_id.as_deref().unwrap_or("-");
    format!("{} {} {} {}", r.timestamp, r.command, r.outcome, manifest_id)
}
