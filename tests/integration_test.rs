//! Integration tests for the pix-payload CLI.
//!
//! These tests run the actual binary and verify output against expected CSV files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

/// Run the binary with the given input file and return stdout
fn run_cli(input_file: &str) -> String {
    let mut cmd = Command::cargo_bin("pix-payload").unwrap();
    let assert = cmd.arg(input_file).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

/// Normalize CSV for comparison (trim whitespace, drop blank lines)
fn normalize_csv(csv: &str) -> Vec<String> {
    csv.lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

fn assert_matches_expected(sample: &str, expected: &str) {
    let output = run_cli(&test_data_path(sample));
    let expected = fs::read_to_string(test_data_path(expected)).unwrap();

    assert_eq!(normalize_csv(&output), normalize_csv(&expected));
}

#[test]
fn test_sample_a_typical_requests() {
    assert_matches_expected("sample_a.csv", "expected_a.csv");
}

#[test]
fn test_sample_b_fallbacks_and_skips() {
    assert_matches_expected("sample_b_fallbacks.csv", "expected_b.csv");
}

#[test]
fn test_sample_c_whitespace_handling() {
    assert_matches_expected("sample_c_whitespace.csv", "expected_c.csv");
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("pix-payload").unwrap();
    cmd.arg("nonexistent.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("Error")));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("pix-payload").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing input file"));
}

#[test]
fn test_output_has_correct_header() {
    let output = run_cli(&test_data_path("sample_a.csv"));
    assert!(output.starts_with("reference,amount,payload"));
}

#[test]
fn test_header_only_input_produces_header_only_output() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "payee_key,amount,payee_name,payee_city,reference").unwrap();

    let output = run_cli(file.path().to_str().unwrap());
    assert_eq!(normalize_csv(&output), vec!["reference,amount,payload"]);
}

#[test]
fn test_skipped_rows_are_logged() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "payee_key,amount,payee_name,payee_city,reference").unwrap();
    writeln!(file, ",10,Loja,Rio,CARD1").unwrap();

    let mut cmd = Command::cargo_bin("pix-payload").unwrap();
    cmd.env("RUST_LOG", "warn")
        .arg(file.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Invalid request at row 2"))
        .stdout(predicate::str::contains("CARD1").not());
}

#[test]
fn test_every_payload_ends_in_hex_checksum() {
    let output = run_cli(&test_data_path("sample_a.csv"));

    for line in output.lines().skip(1) {
        let payload = line.rsplit(',').next().unwrap();
        let checksum = &payload[payload.len() - 4..];
        assert!(
            checksum.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()),
            "Bad checksum in: {}",
            payload
        );
        assert_eq!(&payload[payload.len() - 8..payload.len() - 4], "6304");
    }
}

const GOLDEN_PAYLOAD: &str = "00020101021126330014br.gov.bcb.pix011111999998888520400005303986\
                              540542.505802BR5914Joao Acao Ltda6009Sao Paulo62110507CARD12363048B06";

#[test]
fn test_verify_prints_decoded_fields() {
    let mut cmd = Command::cargo_bin("pix-payload").unwrap();
    cmd.args(["--verify", GOLDEN_PAYLOAD])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "payee_key,amount,payee_name,payee_city,reference",
        ))
        .stdout(predicate::str::contains(
            "11999998888,42.50,Joao Acao Ltda,Sao Paulo,CARD123",
        ));
}

#[test]
fn test_verify_rejects_tampered_payload() {
    let tampered = GOLDEN_PAYLOAD.replace("42.50", "92.50");

    let mut cmd = Command::cargo_bin("pix-payload").unwrap();
    cmd.args(["--verify", tampered.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Checksum mismatch"));
}

#[test]
fn test_verify_accepts_generated_output() {
    let output = run_cli(&test_data_path("sample_a.csv"));

    for line in output.lines().skip(1) {
        let payload = line.rsplit(',').next().unwrap();
        let mut cmd = Command::cargo_bin("pix-payload").unwrap();
        cmd.args(["--verify", payload]).assert().success();
    }
}

#[test]
fn test_help_prints_usage() {
    let mut cmd = Command::cargo_bin("pix-payload").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--verify <payload>"));
}

#[test]
fn test_short_rows_get_fallback_fields() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "payee_key,amount,payee_name,payee_city,reference").unwrap();
    writeln!(file, "k1,5").unwrap();

    let output = run_cli(file.path().to_str().unwrap());
    assert!(output.contains("54045.005802BR5909PAGAMENTO6006BRASIL62070503***6304"));
}
