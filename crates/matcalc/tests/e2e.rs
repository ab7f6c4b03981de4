//! End-to-end CLI integration tests.

use assert_cmd::Command;
use predicates::prelude::*;
use serde::Deserialize;

fn matcalc() -> Command {
    let mut cmd = Command::cargo_bin("matcalc").expect("binary not found");
    // keep a saved profile in the developer's checkout from leaking in
    let dir = std::env::temp_dir();
    cmd.current_dir(dir);
    cmd
}

#[derive(Debug, Deserialize)]
struct Record {
    algorithm: String,
    n: usize,
    verified: bool,
}

#[test]
fn help_flag() {
    matcalc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Strassen"));
}

#[test]
fn version_flag() {
    matcalc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("matcalc"));
}

#[test]
fn small_run_all_algorithms_table() {
    matcalc()
        .args(["--sizes", "16,33", "--repeats", "1", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    matcalc()
        .args(["--sizes", "16", "--repeats", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("naive"))
        .stdout(predicate::str::contains("blocked"))
        .stdout(predicate::str::contains("strassen"));
}

#[test]
fn json_output_lists_every_run() {
    let output = matcalc()
        .args(["--sizes", "8,20", "--repeats", "1", "--json", "--threshold", "4"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let records: Vec<Record> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records.len(), 6);
    assert!(records.iter().all(|r| r.verified));
    assert_eq!(records[0].algorithm, "naive");
    assert_eq!(records[5].n, 20);
}

#[test]
fn csv_report_written() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("results.csv");
    matcalc()
        .args(["--sizes", "12", "--algo", "strassen", "--repeats", "1", "-q", "-o"])
        .arg(&path)
        .assert()
        .success();
    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("algorithm,n,mean_ms,min_ms,max_ms,rss_kb,estimated_kb,verified")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("strassen,12,"));
    assert!(row.ends_with(",true"));
}

#[test]
fn integer_values_parallel_strassen() {
    matcalc()
        .args([
            "--sizes",
            "64",
            "--algo",
            "strassen",
            "--repeats",
            "1",
            "--values",
            "int",
            "--threshold",
            "8",
            "--parallel",
            "--parallel-threshold",
            "32",
            "-q",
        ])
        .assert()
        .success();
}

#[test]
fn invalid_algo_is_config_error() {
    matcalc()
        .args(["--sizes", "8", "--algo", "winograd"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("unknown algorithm"));
}

#[test]
fn invalid_kernel_is_config_error() {
    matcalc()
        .args(["--sizes", "8", "--kernel", "simd"])
        .assert()
        .code(4);
}

#[test]
fn zero_size_is_config_error() {
    matcalc().args(["--sizes", "0"]).assert().code(4);
}

#[test]
fn expired_timeout_exits_with_timeout_code() {
    matcalc()
        .args(["--sizes", "64", "--timeout", "0ms", "-q"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("timed out"));
}

#[test]
fn oversized_timeout_is_config_error() {
    matcalc()
        .args(["--sizes", "2", "-q", "--timeout", "18000000000000000000s"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("timeout too large"));
}

#[test]
fn memory_limit_sufficient() {
    matcalc()
        .args(["--sizes", "16", "--repeats", "1", "--memory-limit", "1G", "-q"])
        .assert()
        .success();
}

#[test]
fn memory_limit_insufficient() {
    matcalc()
        .args(["--sizes", "2048", "--memory-limit", "1M", "-q"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("memory limit"));
}

#[test]
fn env_var_sizes() {
    let output = matcalc()
        .env("MATCALC_SIZES", "5")
        .args(["--algo", "naive", "--repeats", "1", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let records: Vec<Record> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].n, 5);
}

#[test]
fn calibrate_writes_profile() {
    let tmp = tempfile::TempDir::new().unwrap();
    Command::cargo_bin("matcalc")
        .unwrap()
        .current_dir(tmp.path())
        .args(["--calibrate", "--calibration-size", "64", "--repeats", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Strassen threshold"));

    let profile = tmp.path().join(".matcalc_calibration.json");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(profile).unwrap()).unwrap();
    assert_eq!(json["version"], 1);
    assert!(json["strassen_threshold"].as_u64().unwrap() >= 16);
}
