//! CLI smoke tests for the people-query binary

use std::process::{Command, Stdio};
use tempfile::TempDir;

fn run_people_query(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_people-query"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute people-query")
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be a JSON page")
}

fn last_names(page: &serde_json::Value) -> Vec<String> {
    let mut v: Vec<String> = page["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|p| p["lastName"].as_str().unwrap_or_default().to_string())
        .collect();
    v.sort();
    v
}

#[test]
fn test_cli_help_command() {
    let output = run_people_query(&["--help"]);
    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    for flag in ["--config", "--filter", "--loose", "--sort", "--direction", "--seed"] {
        assert!(stdout.contains(flag), "Should mention {flag}");
    }
}

#[test]
fn test_substring_filter_on_seeded_data() {
    let output = run_people_query(&["--seed", "--filter", "lastName:CONTAINS:ame 1"]);
    let page = stdout_json(&output);
    assert_eq!(last_names(&page), vec!["Lastname 11", "Surname 10"]);
    assert_eq!(page["page_info"]["total_items"], 2);
}

#[test]
fn test_strict_rejects_like_on_number() {
    let output = run_people_query(&["--seed", "--filter", "civilStatus:STARTS_WITH:1"]);
    assert!(!output.status.success(), "strict path should refuse the filter");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Number type doesn't allow like operations."),
        "stderr: {stderr}"
    );
}

#[test]
fn test_loose_accepts_like_on_number() {
    let output = run_people_query(&["--seed", "--loose", "--filter", "civilStatus:STARTS_WITH:1"]);
    let page = stdout_json(&output);
    assert_eq!(page["items"].as_array().map(Vec::len), Some(2));
}

#[test]
fn test_sorted_single_row_page() {
    let output = run_people_query(&[
        "--seed", "--sort", "name", "--sort", "lastName", "--direction", "asc", "--size", "1",
    ]);
    let page = stdout_json(&output);
    assert_eq!(last_names(&page), vec!["Lastname 2"]);
    assert_eq!(page["page_info"]["total_pages"], 5);
}

#[test]
fn test_sort_without_direction_fails() {
    let output = run_people_query(&["--seed", "--sort", "name"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sort direction is required"), "stderr: {stderr}");
}

#[test]
fn test_invalid_filter_syntax_fails() {
    let output = run_people_query(&["--filter", "lastName"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("FIELD:OP:VALUE"), "stderr: {stderr}");
}

#[test]
fn test_request_body_from_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let body = temp_dir.path().join("request.json");
    std::fs::write(
        &body,
        r#"{"page": 0, "size": 10, "filters": [{"field": "birthDate", "value": "1990-01-01", "operation": "LT"}]}"#,
    )
    .expect("Failed to write request");

    let output = run_people_query(&["--seed", "--request", body.to_str().unwrap()]);
    let page = stdout_json(&output);
    assert_eq!(last_names(&page), vec!["Lastname 11", "Lastname 3"]);
}

#[test]
fn test_print_config() {
    let output = run_people_query(&["--print-config"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("query:"), "stdout: {stdout}");
    assert!(stdout.contains("default_page_size"), "stdout: {stdout}");
}

#[test]
fn test_missing_config_file_fails() {
    let output = run_people_query(&["--config", "/nonexistent/config.yaml"]);
    assert!(!output.status.success(), "Should fail with missing config");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"), "stderr: {stderr}");
}

#[test]
fn test_sqlite_file_persists_between_runs() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("people.yaml");
    let yaml = format!(
        r#"
home_dir: "{}"
database:
  url: "sqlite://data/people.db"
  max_conns: 1
modules:
  people:
    max_page_size: 3
"#,
        temp_dir.path().to_string_lossy().replace('\\', "/")
    );
    std::fs::write(&config_path, yaml).expect("Failed to write config");
    let config = config_path.to_str().unwrap();

    let first = stdout_json(&run_people_query(&["--config", config, "--seed"]));
    assert_eq!(first["page_info"]["total_items"], 5);
    // module config caps the page size
    assert_eq!(first["page_info"]["size"], 3);

    let second = stdout_json(&run_people_query(&["--config", config, "--seed"]));
    assert_eq!(second["page_info"]["total_items"], 5);
    assert!(temp_dir.path().join("data/people.db").exists());
}
