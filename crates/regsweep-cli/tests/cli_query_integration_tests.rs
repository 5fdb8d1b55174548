//! CLI query integration tests
//!
//! These tests run the built binary against snapshot and plan files written
//! into a temporary directory.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const SNAPSHOT: &str = r#"
schema_version: 1
keys:
  - path: 'HKLM\SOFTWARE\Vendor'
    values:
      - { name: "", kind: string, data: "Vendor Inc" }
      - { name: Count, kind: dword, data: 255 }
  - path: 'HKLM\SOFTWARE\Vendor\App'
    values:
      - { name: Version, kind: string, data: "1.0" }
      - { name: InstallDate, kind: dword, data: 1 }
  - path: 'HKLM\SOFTWARE\Vendor\Locked'
    inaccessible: true
"#;

fn write_snapshot(temp_dir: &TempDir) -> PathBuf {
    let path = temp_dir.path().join("snapshot.yaml");
    fs::write(&path, SNAPSHOT).unwrap();
    path
}

fn run(temp_dir: &TempDir, args: &[&str]) -> Output {
    let cli_bin = env!("CARGO_BIN_EXE_regsweep-cli");
    Command::new(cli_bin)
        .current_dir(temp_dir.path())
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_cli_query_exports_reg_text_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&temp_dir);

    let output = run(
        &temp_dir,
        &[
            "query",
            "--snapshot",
            snapshot.to_str().unwrap(),
            "--target",
            "HKLM\\SOFTWARE\\Vendor\\App",
        ],
    );

    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout,
        "Windows Registry Editor Version 5.00\r\n\
         \r\n\
         [HKEY_LOCAL_MACHINE\\SOFTWARE\\Vendor\\App]\r\n\
         \"Version\"=\"1.0\"\r\n\
         \"InstallDate\"=dword:00000001\r\n\
         \r\n"
    );
}

#[test]
fn test_cli_query_with_plan_writes_output_and_error_report() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&temp_dir);
    let plan = temp_dir.path().join("plan.yaml");
    fs::write(
        &plan,
        r#"
schema_version: 1
targets:
  - { root: HKLM, path: 'SOFTWARE\Vendor' }
filters:
  - { name: Version }
"#,
    )
    .unwrap();
    let reg = temp_dir.path().join("out.reg");
    let report = temp_dir.path().join("errors.json");

    let output = run(
        &temp_dir,
        &[
            "query",
            "--snapshot",
            snapshot.to_str().unwrap(),
            "--plan",
            plan.to_str().unwrap(),
            "--add-value",
            "InstallDate",
            "--output",
            reg.to_str().unwrap(),
            "--errors",
            report.to_str().unwrap(),
        ],
    );

    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let text = fs::read_to_string(&reg).unwrap();
    assert!(text.contains("\"Version\"=\"1.0\"\r\n\"InstallDate\"=dword:00000001\r\n"));
    assert!(!text.contains("Count"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["error_count"], 2);
    assert_eq!(json["result_count"], 2);
    assert_eq!(json["snapshot_digest"].as_str().unwrap().len(), 64);
    assert_eq!(
        json["errors"][0]["key_path"],
        "HKEY_LOCAL_MACHINE\\SOFTWARE\\Vendor\\Locked"
    );
    assert_eq!(json["errors"][0]["name"], "values");
    assert!(json["session_id"].as_str().is_some());
}

#[test]
fn test_cli_query_unknown_root_fails() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&temp_dir);

    let output = run(
        &temp_dir,
        &[
            "query",
            "--snapshot",
            snapshot.to_str().unwrap(),
            "--target",
            "HKXX\\SOFTWARE",
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: Unknown root key: HKXX"));
}

#[test]
fn test_cli_query_without_targets_fails() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&temp_dir);

    let output = run(
        &temp_dir,
        &["query", "--snapshot", snapshot.to_str().unwrap()],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no query targets"));
}

#[test]
fn test_cli_validate_reports_counts() {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&temp_dir);

    let output = run(
        &temp_dir,
        &["validate", "--snapshot", snapshot.to_str().unwrap()],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("3 keys, 4 values"));
    assert!(stdout.contains("digest: "));
}

#[test]
fn test_cli_validate_rejects_bad_plan() {
    let temp_dir = TempDir::new().unwrap();
    let plan = temp_dir.path().join("plan.yaml");
    fs::write(&plan, "schema_version: 1\nexclude:\n  - { root: HKLM }\n").unwrap();

    let output = run(&temp_dir, &["validate", "--plan", plan.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("blank path"));
}

#[test]
fn test_cli_roots_lists_aliases() {
    let temp_dir = TempDir::new().unwrap();

    let output = run(&temp_dir, &["roots"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 6);
    assert!(stdout.contains("HKEY_LOCAL_MACHINE"));
    assert!(stdout.contains("HKPD"));
}
