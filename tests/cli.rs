//! E2E tests for the validate, schema and events commands

use std::process::Command;

fn run(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Test that a well-formed report validates
#[test]
fn validate_report() {
    let output = run(&["validate", "-s", "Report", "tests/data/report.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("valid Report"));
}

/// Test that a numeric sizeOnDisk is rejected with its path
#[test]
fn validate_rejects_numeric_size_on_disk() {
    let output = run(&["validate", "-s", "Report", "tests/data/report_invalid.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(!output.status.success(), "Command should fail: {:?}", output);
    assert!(stdout.contains("invalid Report"));
    assert!(stdout.contains("sizeOnDisk"));
}

/// Test the JSON output of a failed validation
#[test]
fn validate_json_output() {
    let output = run(&[
        "validate",
        "--schema",
        "report",
        "tests/data/report_invalid.json",
        "--json",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON output");
    assert_eq!(json["schema"], "Report");
    assert_eq!(json["valid"], false);
    assert_eq!(json["issue_count"], 1);
    assert_eq!(json["issues"][0]["path"], "sizeOnDisk");
}

/// Test that a trade history report validates against both of its parents' fields
#[test]
fn validate_trade_history_report() {
    let output = run(&[
        "validate",
        "-s",
        "TradeHistoryReport",
        "tests/data/trade_history_report.json",
    ]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    // The report alone lacks the history fields
    let output = run(&[
        "validate",
        "-s",
        "TradeHistoryReport",
        "tests/data/report.json",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!output.status.success());
    assert!(stdout.contains("allEvents"));
    assert!(stdout.contains("overview"));
}

/// Test that an unknown schema name is an error
#[test]
fn validate_unknown_schema() {
    let output = run(&["validate", "-s", "NoSuchSchema", "tests/data/report.json"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Unknown schema"));
}

/// Test listing the registered schemas
#[test]
fn schema_list() {
    let output = run(&["schema"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("NumericString"));
    assert!(stdout.contains("ProfitLossEventCacheEntry"));
    assert!(stdout.contains("PagedReportEventsPayload"));
}

/// Test the field table of a record schema
#[test]
fn schema_fields() {
    let output = run(&["schema", "ProfitLossEventCacheEntry"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("eventType"));
    assert!(stdout.contains("costBasis"));
    assert!(!stdout.contains("│ type "));
}

/// Test the JSON Schema output
#[test]
fn schema_json_schema() {
    let output = run(&["schema", "Report", "--format", "json-schema"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON output");
    assert!(json["properties"]["sizeOnDisk"].is_object());
}

/// Test the events table of a trade history report
#[test]
fn events_from_trade_history_report() {
    let output = run(&["events", "-f", "tests/data/trade_history_report.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("2022-01-01"));
    assert!(stdout.contains("trade"));
    assert!(stdout.contains("asset movement"));
    assert!(stdout.contains("0.25 BTC"));
}

/// Test filtering events by kind
#[test]
fn events_filter_by_kind() {
    let output = run(&[
        "events",
        "-f",
        "tests/data/events_payload.json",
        "--kind",
        "defi event",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("defi event"));
    assert!(stdout.contains("12.5 DAI"));
    assert!(!stdout.contains("BTC"));
}

/// Test events CSV output
#[test]
fn events_csv() {
    let output = run(&["events", "-f", "tests/data/events_payload.json", "--csv"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("row_num"));
    assert!(stdout.contains("net_profit_or_loss"));
    assert_eq!(stdout.lines().count(), 3);
}

/// Test that a document with neither events nor entries is rejected
#[test]
fn events_rejects_invalid_document() {
    let output = run(&["events", "-f", "tests/data/report.json"]);
    assert!(!output.status.success());
}
