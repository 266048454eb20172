use std::path::Path;
use std::process::Command;

fn reqgate_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_reqgate"));
    cmd.env_remove("REQGATE_CONFIG");
    cmd
}

/// Create a reqgate command with REQGATE_WITNESS pointing to a temp file.
fn reqgate_cmd_with_witness(ledger_path: &Path) -> Command {
    let mut cmd = reqgate_cmd();
    cmd.env("REQGATE_WITNESS", ledger_path);
    cmd
}

fn read_records(ledger: &Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(ledger)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Witness append
// ---------------------------------------------------------------------------

#[test]
fn check_records_ok_witness() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = tmp.path().join("witness.jsonl");

    let output = reqgate_cmd_with_witness(&ledger)
        .args(["check", "fixtures/manifests/valid.txt", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    let records = read_records(&ledger);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["version"], "witness.v0");
    assert_eq!(record["tool"], "reqgate");
    assert_eq!(record["command"], "check");
    assert_eq!(record["outcome"], "OK");
    assert_eq!(record["manifest_id"], report["manifest_id"]);
    assert!(record["timestamp"].is_string());
}

#[test]
fn outcomes_follow_exit_codes() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = tmp.path().join("witness.jsonl");

    for args in [
        vec!["check", "fixtures/manifests/invalid.txt"],
        vec!["list", "fixtures/manifests/valid.txt"],
        vec!["diff", "fixtures/manifests/valid.txt", "fixtures/manifests/valid.txt"],
        vec!["diff", "fixtures/manifests/valid.txt", "fixtures/manifests/reordered.txt"],
        vec!["check", "/nonexistent/requirements.txt"],
    ] {
        reqgate_cmd_with_witness(&ledger).args(&args).output().unwrap();
    }

    let outcomes: Vec<(String, String)> = read_records(&ledger)
        .iter()
        .map(|r| {
            (
                r["command"].as_str().unwrap().to_string(),
                r["outcome"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    let expected = [
        ("check", "INVALID"),
        ("list", "OK"),
        ("diff", "NO_CHANGES"),
        ("diff", "CHANGES"),
        ("check", "REFUSAL"),
    ];
    assert_eq!(outcomes.len(), expected.len());
    for ((command, outcome), (want_command, want_outcome)) in outcomes.iter().zip(expected) {
        assert_eq!(command, want_command);
        assert_eq!(outcome, want_outcome);
    }
}

#[test]
fn refusal_witness_has_no_manifest_id() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = tmp.path().join("witness.jsonl");

    reqgate_cmd_with_witness(&ledger)
        .args(["list", "/nonexistent/requirements.txt"])
        .output()
        .unwrap();

    let records = read_records(&ledger);
    assert_eq!(records[0]["outcome"], "REFUSAL");
    assert!(records[0]["manifest_id"].is_null());
}

#[test]
fn config_refusal_records_refusal_witness() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = tmp.path().join("witness.jsonl");

    let output = reqgate_cmd_with_witness(&ledger)
        .args(["check", "fixtures/manifests/valid.txt"])
        .args(["--config", "/nonexistent/reqgate.json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("reqgate check: REFUSAL"), "stdout: {stdout}");

    let records = read_records(&ledger);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["command"], "check");
    assert_eq!(records[0]["outcome"], "REFUSAL");
    assert!(records[0]["manifest_id"].is_null());
}

#[test]
fn no_witness_flag_skips_recording() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = tmp.path().join("witness.jsonl");

    let output = reqgate_cmd_with_witness(&ledger)
        .args(["check", "fixtures/manifests/valid.txt", "--no-witness"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(!ledger.exists());
}

#[test]
fn witness_queries_do_not_record() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = tmp.path().join("witness.jsonl");

    reqgate_cmd_with_witness(&ledger)
        .args(["witness", "count"])
        .output()
        .unwrap();
    assert!(!ledger.exists());
}

#[test]
fn unwritable_ledger_keeps_exit_code() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let output = reqgate_cmd_with_witness(&blocker.join("witness.jsonl"))
        .args(["check", "fixtures/manifests/invalid.txt"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("witness append"));
}

#[test]
fn config_witness_path_used_without_env() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = tmp.path().join("from-config.jsonl");
    let config = tmp.path().join("reqgate.json");
    std::fs::write(
        &config,
        serde_json::json!({ "witness_path": ledger }).to_string(),
    )
    .unwrap();

    reqgate_cmd()
        .env_remove("REQGATE_WITNESS")
        .args(["list", "fixtures/manifests/valid.txt"])
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert_eq!(read_records(&ledger).len(), 1);
}

// ---------------------------------------------------------------------------
// Witness query
// ---------------------------------------------------------------------------

#[test]
fn witness_last_and_count_read_ledger() {
    let tmp = tempfile::tempdir().unwrap();
    let ledger = tmp.path().join("witness.jsonl");

    reqgate_cmd_with_witness(&ledger)
        .args(["list", "fixtures/manifests/valid.txt"])
        .output()
        .unwrap();
    reqgate_cmd_with_witness(&ledger)
        .args(["check", "fixtures/manifests/invalid.txt"])
        .output()
        .unwrap();

    let output = reqgate_cmd_with_witness(&ledger)
        .args(["witness", "count", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let count: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(count["count"], 2);

    let output = reqgate_cmd_with_witness(&ledger)
        .args(["witness", "last", "--json"])
        .output()
        .unwrap();
    let last: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(last["command"], "check");
    assert_eq!(last["outcome"], "INVALID");

    let output = reqgate_cmd_with_witness(&ledger)
        .args(["witness", "query", "--json"])
        .output()
        .unwrap();
    let all: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["command"], "list");
}

#[test]
fn witness_query_on_missing_ledger_is_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let output = reqgate_cmd_with_witness(&tmp.path().join("absent.jsonl"))
        .args(["witness", "query"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No witness records found."));
}
